// tests/common/mod.rs
//! An in-memory Notion workspace for driving `Session` without the network.

#![allow(dead_code)]

use indexmap::IndexMap;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::Mutex;
use ultimate_notion::{
    AppError, Database, DatabaseId, NotionErrorCode, NotionId, NotionObject, NotionRepository,
    ObjectFilter, Page, PageId, Parent, SearchQuery, User, UserId, UserKind,
};

pub const CONTACTS_DB: &str = "Contacts DB";
pub const BOT_NAME: &str = "Github Unittests";

pub const INTRO_PAGE_ID: &str = "0b9cbd0d-5e2f-4ecb-b4ad-5d0dfed82e2f";
pub const ROOT_PAGE_ID: &str = "a8e7a2c1-2d4f-4e4a-9d7b-1c1f0e2d3a4b";
pub const CONTACTS_DB_ID: &str = "c3e4f5a6-b7c8-4d9e-8f0a-1b2c3d4e5f60";
pub const ARCHIVE_DB_ID: &str = "d4e5f6a7-b8c9-4dae-9f0b-2c3d4e5f6071";
pub const TASKS_DB_ID: &str = "e5f6a7b8-c9da-4ebf-8a1c-3d4e5f607182";
pub const BOT_ID: &str = "f6a7b8c9-daeb-4fc0-9b2d-4e5f60718293";
pub const PERSON_ID: &str = "07b8c9da-ebfc-40d1-8c3e-5f6071829304";

/// Backend calls recorded by [`FakeWorkspace`], keyed by operation name.
#[derive(Default)]
pub struct CallLog(Mutex<HashMap<&'static str, usize>>);

impl CallLog {
    fn record(&self, op: &'static str) {
        *self.0.lock().unwrap().entry(op).or_insert(0) += 1;
    }

    pub fn count(&self, op: &str) -> usize {
        self.0.lock().unwrap().get(op).copied().unwrap_or(0)
    }
}

pub struct FakeWorkspace {
    pub pages: Vec<Page>,
    pub databases: Vec<Database>,
    pub users: Vec<User>,
    pub me: User,
    pub calls: CallLog,
    /// When set, every call fails with this Notion error code.
    pub failure: Mutex<Option<NotionErrorCode>>,
}

impl FakeWorkspace {
    /// A small workspace: a root page holding an intro page and two
    /// contact databases, plus a task database at workspace level.
    pub fn sample() -> Self {
        let root = NotionId::parse(ROOT_PAGE_ID).unwrap();
        let me = user(BOT_ID, BOT_NAME, UserKind::Bot {
            workspace_name: Some("Ultimate Notion".to_string()),
        });
        let person = user(PERSON_ID, "Jane Doe", UserKind::Person {
            email: Some("jane@example.com".to_string()),
        });

        Self {
            pages: vec![
                page(ROOT_PAGE_ID, "Tests", Parent::Workspace),
                page(
                    INTRO_PAGE_ID,
                    "Getting Started",
                    Parent::PageId {
                        page_id: root.clone(),
                    },
                ),
            ],
            databases: vec![
                database(
                    CONTACTS_DB_ID,
                    CONTACTS_DB,
                    Parent::PageId {
                        page_id: root.clone(),
                    },
                ),
                database(
                    ARCHIVE_DB_ID,
                    "Contacts DB Archive",
                    Parent::PageId { page_id: root },
                ),
                database(TASKS_DB_ID, "Tasks", Parent::Workspace),
            ],
            users: vec![me.clone(), person],
            me,
            calls: CallLog::default(),
            failure: Mutex::new(None),
        }
    }

    pub fn fail_with(&self, code: NotionErrorCode) {
        *self.failure.lock().unwrap() = Some(code);
    }

    fn check(&self, op: &'static str) -> Result<(), AppError> {
        self.calls.record(op);
        match self.failure.lock().unwrap().clone() {
            Some(code) => Err(AppError::NotionService {
                message: format!("{} failed", op),
                code,
                status: StatusCode::UNAUTHORIZED,
                request_id: None,
            }),
            None => Ok(()),
        }
    }

    fn not_found(kind: &str, id: &NotionId) -> AppError {
        AppError::NotionService {
            code: NotionErrorCode::ObjectNotFound,
            message: format!("Could not find {} with ID: {}", kind, id.to_hyphenated()),
            status: StatusCode::NOT_FOUND,
            request_id: None,
        }
    }
}

#[async_trait::async_trait]
impl NotionRepository for FakeWorkspace {
    async fn retrieve_page(&self, id: &NotionId) -> Result<Page, AppError> {
        self.check("retrieve_page")?;
        self.pages
            .iter()
            .find(|p| p.id.as_notion_id() == id)
            .cloned()
            .ok_or_else(|| Self::not_found("page", id))
    }

    async fn retrieve_database(&self, id: &NotionId) -> Result<Database, AppError> {
        self.check("retrieve_database")?;
        self.databases
            .iter()
            .find(|db| db.id.as_notion_id() == id)
            .cloned()
            .ok_or_else(|| Self::not_found("database", id))
    }

    async fn retrieve_user(&self, id: &NotionId) -> Result<User, AppError> {
        self.check("retrieve_user")?;
        self.users
            .iter()
            .find(|u| u.id.as_notion_id() == id)
            .cloned()
            .ok_or_else(|| Self::not_found("user", id))
    }

    async fn current_user(&self) -> Result<User, AppError> {
        self.check("current_user")?;
        Ok(self.me.clone())
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.check("list_users")?;
        Ok(self.users.clone())
    }

    /// Case-insensitive substring match on titles, like Notion's search.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<NotionObject>, AppError> {
        self.check("search")?;
        let needle = query.text.as_deref().unwrap_or("").to_lowercase();

        let pages = self.pages.iter().cloned().map(NotionObject::Page);
        let dbs = self.databases.iter().cloned().map(NotionObject::Database);

        Ok(pages
            .chain(dbs)
            .filter(|hit| match query.filter {
                Some(ObjectFilter::Page) => matches!(hit, NotionObject::Page(_)),
                Some(ObjectFilter::Database) => matches!(hit, NotionObject::Database(_)),
                None => true,
            })
            .filter(|hit| hit.title().to_lowercase().contains(&needle))
            .collect())
    }
}

pub fn page(id: &str, title: &str, parent: Parent) -> Page {
    Page {
        id: PageId::parse(id).unwrap(),
        title: title.to_string(),
        url: format!("https://www.notion.so/{}", id.replace('-', "")),
        parent: Some(parent),
        archived: false,
        created_time: None,
        last_edited_time: None,
        properties: IndexMap::new(),
    }
}

pub fn database(id: &str, title: &str, parent: Parent) -> Database {
    Database {
        id: DatabaseId::parse(id).unwrap(),
        title: title.to_string(),
        description: String::new(),
        url: format!("https://www.notion.so/{}", id.replace('-', "")),
        parent: Some(parent),
        archived: false,
        is_inline: false,
        created_time: None,
        last_edited_time: None,
        schema: IndexMap::new(),
    }
}

pub fn user(id: &str, name: &str, kind: UserKind) -> User {
    User {
        id: UserId::parse(id).unwrap(),
        name: Some(name.to_string()),
        avatar_url: None,
        kind,
    }
}
