// src/api/responses.rs
//! Wire types of the Notion API and their conversion into the domain model.
//!
//! Wire types are lenient: fields Notion may omit default instead of
//! failing, and property payloads are kept as raw JSON.

use crate::error::AppError;
use crate::model::{Database, NotionObject, Page, Parent, PropertySchema, PropertyValue};
use crate::model::{User, UserKind};
use crate::types::{DatabaseId, NotionId, PageId, PropertyName, UserId};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Notion's error envelope, as modelled by notion-client
pub use notion_client::objects::error::Error as NotionError;

/// Generic paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub object: String,
    pub results: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

/// A page as returned by `GET /pages/{id}` and search
#[derive(Debug, Clone, Deserialize)]
pub struct PageObject {
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub parent: Option<Value>,
    #[serde(default)]
    pub archived: bool,
    pub created_time: Option<DateTime<Utc>>,
    pub last_edited_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub properties: IndexMap<String, RawProperty>,
}

/// A database as returned by `GET /databases/{id}` and search
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseObject {
    pub id: String,
    #[serde(default)]
    pub title: Value,
    #[serde(default)]
    pub description: Value,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub parent: Option<Value>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub is_inline: bool,
    pub created_time: Option<DateTime<Utc>>,
    pub last_edited_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub properties: IndexMap<String, RawProperty>,
}

/// A property entry: `{"id": .., "type": "<kind>", "<kind>": payload}`
#[derive(Debug, Clone, Deserialize)]
pub struct RawProperty {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl RawProperty {
    fn take_payload(mut self) -> (String, String, Value) {
        let payload = self.rest.remove(&self.kind).unwrap_or(Value::Null);
        (self.id, self.kind, payload)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserObject {
    pub id: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub person: Option<PersonInfo>,
    pub bot: Option<BotInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonInfo {
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BotInfo {
    pub workspace_name: Option<String>,
}

pub type SearchResponse = PaginatedResponse<Value>;
pub type UserListResponse = PaginatedResponse<UserObject>;

/// Trait for converting wire types to domain types
pub trait ToDomain<T> {
    fn to_domain(self) -> Result<T, AppError>;
}

impl ToDomain<Page> for PageObject {
    fn to_domain(self) -> Result<Page, AppError> {
        let id = PageId::parse(&self.id)?;

        let mut title = None;
        let mut properties = IndexMap::with_capacity(self.properties.len());
        for (name, raw) in self.properties {
            let (prop_id, kind, value) = raw.take_payload();
            if kind == "title" && title.is_none() {
                title = Some(crate::model::plain_text_of(&value));
            }
            properties.insert(
                PropertyName::new(name),
                PropertyValue {
                    id: prop_id,
                    kind,
                    value,
                },
            );
        }

        Ok(Page {
            id,
            title: title.unwrap_or_else(|| "Untitled".to_string()),
            url: self.url,
            parent: self.parent.as_ref().and_then(convert_parent),
            archived: self.archived,
            created_time: self.created_time,
            last_edited_time: self.last_edited_time,
            properties,
        })
    }
}

impl ToDomain<Database> for DatabaseObject {
    fn to_domain(self) -> Result<Database, AppError> {
        let id = DatabaseId::parse(&self.id)?;

        let schema = self
            .properties
            .into_iter()
            .map(|(name, raw)| {
                let (prop_id, kind, config) = raw.take_payload();
                (
                    PropertyName::new(name),
                    PropertySchema {
                        id: prop_id,
                        kind,
                        config,
                    },
                )
            })
            .collect();

        Ok(Database {
            id,
            title: crate::model::plain_text_of(&self.title),
            description: crate::model::plain_text_of(&self.description),
            url: self.url,
            parent: self.parent.as_ref().and_then(convert_parent),
            archived: self.archived,
            is_inline: self.is_inline,
            created_time: self.created_time,
            last_edited_time: self.last_edited_time,
            schema,
        })
    }
}

impl ToDomain<User> for UserObject {
    fn to_domain(self) -> Result<User, AppError> {
        let kind = match self.kind.as_deref() {
            Some("person") => UserKind::Person {
                email: self.person.and_then(|p| p.email),
            },
            Some("bot") => UserKind::Bot {
                workspace_name: self.bot.and_then(|b| b.workspace_name),
            },
            _ => UserKind::Unknown,
        };

        Ok(User {
            id: UserId::parse(&self.id)?,
            name: self.name,
            avatar_url: self.avatar_url,
            kind,
        })
    }
}

/// Batch conversion for user listings
impl UserListResponse {
    pub fn into_domain_users(self) -> Result<Vec<User>, AppError> {
        self.results.into_iter().map(ToDomain::to_domain).collect()
    }
}

/// Batch conversion for search results, skipping object kinds we don't model
impl SearchResponse {
    pub fn into_domain_objects(self) -> Result<Vec<NotionObject>, AppError> {
        let mut objects = Vec::with_capacity(self.results.len());
        for raw in self.results {
            let kind = raw.get("object").and_then(Value::as_str).map(str::to_string);
            match kind.as_deref() {
                Some("page") => {
                    let page: PageObject = serde_json::from_value(raw)?;
                    objects.push(NotionObject::Page(page.to_domain()?));
                }
                Some("database") => {
                    let db: DatabaseObject = serde_json::from_value(raw)?;
                    objects.push(NotionObject::Database(db.to_domain()?));
                }
                other => {
                    log::debug!("Skipping search result of type {:?}", other);
                }
            }
        }
        Ok(objects)
    }
}

/// Converts a parent reference, ignoring kinds this client doesn't know.
fn convert_parent(parent: &Value) -> Option<Parent> {
    let id_at = |key: &str| {
        parent
            .get(key)
            .and_then(Value::as_str)
            .and_then(|s| NotionId::parse(s).ok())
    };

    match parent.get("type").and_then(Value::as_str)? {
        "page_id" => id_at("page_id").map(|page_id| Parent::PageId { page_id }),
        "database_id" => id_at("database_id").map(|database_id| Parent::DatabaseId { database_id }),
        "block_id" => id_at("block_id").map(|block_id| Parent::BlockId { block_id }),
        "workspace" => Some(Parent::Workspace),
        other => {
            log::debug!("Unsupported parent type: {}", other);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_without_title_property_is_untitled() {
        let page: PageObject = serde_json::from_value(json!({
            "object": "page",
            "id": "216cd412-8533-8087-a989-cf37889137c3",
            "parent": {"type": "workspace", "workspace": true},
            "archived": false,
            "properties": {},
            "url": "https://www.notion.so/test-page"
        }))
        .unwrap();

        let page = page.to_domain().unwrap();
        assert_eq!(page.title(), "Untitled");
        assert_eq!(page.parent, Some(Parent::Workspace));
        assert!(page.created_time.is_none());
    }

    #[test]
    fn unknown_parent_type_is_dropped() {
        assert_eq!(convert_parent(&json!({"type": "data_source_id"})), None);
        assert_eq!(convert_parent(&json!({"no_type": true})), None);
    }

    #[test]
    fn user_kinds() {
        let person: UserObject = serde_json::from_value(json!({
            "object": "user",
            "id": "6794760a-1f15-45cd-9c65-0dfe42f5135a",
            "type": "person",
            "name": "Jane",
            "avatar_url": null,
            "person": {"email": "jane@example.com"}
        }))
        .unwrap();
        let partial: UserObject = serde_json::from_value(json!({
            "object": "user",
            "id": "6794760a-1f15-45cd-9c65-0dfe42f5135a"
        }))
        .unwrap();

        let person = person.to_domain().unwrap();
        assert_eq!(person.email(), Some("jane@example.com"));
        assert!(person.is_person());
        assert_eq!(partial.to_domain().unwrap().kind, UserKind::Unknown);
    }
}
