mod properties;
mod user;

pub use properties::{PropertySchema, PropertyValue};
pub(crate) use properties::plain_text_of;
pub use user::{User, UserKind};

use crate::types::{DatabaseId, NotionId, PageId, PropertyName};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A search hit: Notion search returns pages and databases side by side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "object", rename_all = "snake_case")]
pub enum NotionObject {
    Page(Page),
    Database(Database),
}

impl NotionObject {
    pub fn id(&self) -> NotionId {
        match self {
            NotionObject::Page(page) => NotionId::from(&page.id),
            NotionObject::Database(database) => NotionId::from(&database.id),
        }
    }

    pub fn object_type_name(&self) -> &str {
        match self {
            NotionObject::Page(_) => "page",
            NotionObject::Database(_) => "database",
        }
    }

    pub fn title(&self) -> &str {
        match self {
            NotionObject::Page(page) => page.title(),
            NotionObject::Database(db) => db.title(),
        }
    }

    pub fn parent(&self) -> Option<&Parent> {
        match self {
            NotionObject::Page(page) => page.parent.as_ref(),
            NotionObject::Database(db) => db.parent.as_ref(),
        }
    }

    pub fn into_page(self) -> Option<Page> {
        match self {
            NotionObject::Page(page) => Some(page),
            NotionObject::Database(_) => None,
        }
    }

    pub fn into_database(self) -> Option<Database> {
        match self {
            NotionObject::Database(db) => Some(db),
            NotionObject::Page(_) => None,
        }
    }
}

/// A Notion page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub title: String,
    pub url: String,
    pub parent: Option<Parent>,
    pub archived: bool,
    pub created_time: Option<DateTime<Utc>>,
    pub last_edited_time: Option<DateTime<Utc>>,
    pub properties: IndexMap<PropertyName, PropertyValue>,
}

impl Page {
    /// Plain-text title, "Untitled" when the page has none
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }
}

/// Pages are the same page when their ids match
impl PartialEq for Page {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Page: '{}'>", self.title)
    }
}

/// A Notion database (its schema, not its rows)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    pub id: DatabaseId,
    pub title: String,
    pub description: String,
    pub url: String,
    pub parent: Option<Parent>,
    pub archived: bool,
    pub is_inline: bool,
    pub created_time: Option<DateTime<Utc>>,
    pub last_edited_time: Option<DateTime<Utc>>,
    pub schema: IndexMap<PropertyName, PropertySchema>,
}

impl Database {
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The name of the title column, every database has exactly one
    pub fn title_property(&self) -> Option<&PropertyName> {
        self.schema
            .iter()
            .find(|(_, prop)| prop.kind == "title")
            .map(|(name, _)| name)
    }
}

impl PartialEq for Database {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Database: '{}'>", self.title)
    }
}

/// Where an object lives in the workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Parent {
    PageId { page_id: NotionId },
    DatabaseId { database_id: NotionId },
    BlockId { block_id: NotionId },
    Workspace,
}

impl Parent {
    /// The id of the parent object; `None` for top-level workspace objects
    pub fn id(&self) -> Option<&NotionId> {
        match self {
            Parent::PageId { page_id } => Some(page_id),
            Parent::DatabaseId { database_id } => Some(database_id),
            Parent::BlockId { block_id } => Some(block_id),
            Parent::Workspace => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(id: &str, title: &str) -> Page {
        Page {
            id: PageId::parse(id).unwrap(),
            title: title.to_string(),
            url: String::new(),
            parent: Some(Parent::Workspace),
            archived: false,
            created_time: None,
            last_edited_time: None,
            properties: IndexMap::new(),
        }
    }

    #[test]
    fn pages_compare_by_identity() {
        let a = page("550e8400e29b41d4a716446655440000", "Getting Started");
        let renamed = page("550e8400e29b41d4a716446655440000", "Renamed");
        let other = page("650e8400e29b41d4a716446655440000", "Getting Started");

        assert_eq!(a, renamed);
        assert_ne!(a, other);
        assert_eq!(a.to_string(), "<Page: 'Getting Started'>");
    }

    #[test]
    fn parent_ids() {
        let id = NotionId::parse("550e8400e29b41d4a716446655440000").unwrap();
        assert_eq!(Parent::PageId { page_id: id.clone() }.id(), Some(&id));
        assert_eq!(Parent::Workspace.id(), None);
    }

    #[test]
    fn search_hit_accessors() {
        let hit = NotionObject::Page(page("550e8400e29b41d4a716446655440000", "Notes"));
        assert_eq!(hit.object_type_name(), "page");
        assert_eq!(hit.title(), "Notes");
        assert!(hit.clone().into_database().is_none());
        assert!(hit.into_page().is_some());
    }
}
