// src/api/mod.rs
//! Notion API interaction: the ability to look things up in a workspace.
//!
//! I/O lives in [`client`], JSON handling in [`parser`] and [`responses`],
//! and [`cache`] decorates any repository with short-lived lookups.

pub mod cache;
pub mod client;
mod pagination;
pub mod parser;
pub mod responses;

use crate::error::AppError;
use crate::model::{Database, NotionObject, Page, User};
use crate::types::NotionId;

/// Which kind of object a search should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectFilter {
    Page,
    Database,
}

impl ObjectFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectFilter::Page => "page",
            ObjectFilter::Database => "database",
        }
    }
}

/// A title search against the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery {
    /// Text to match in titles; `None` lists everything shared with the integration
    pub text: Option<String>,
    pub filter: Option<ObjectFilter>,
}

impl SearchQuery {
    pub fn databases(text: Option<&str>) -> Self {
        Self {
            text: text.map(str::to_string),
            filter: Some(ObjectFilter::Database),
        }
    }

    pub fn pages(text: Option<&str>) -> Self {
        Self {
            text: text.map(str::to_string),
            filter: Some(ObjectFilter::Page),
        }
    }

    /// Request body of `POST /search` without pagination fields.
    pub fn to_body(&self) -> serde_json::Value {
        let mut body = serde_json::json!({});
        if let Some(text) = &self.text {
            body["query"] = serde_json::json!(text);
        }
        if let Some(filter) = &self.filter {
            body["filter"] = serde_json::json!({
                "property": "object",
                "value": filter.as_str(),
            });
        }
        body
    }
}

/// The ability to retrieve objects from a Notion workspace.
///
/// The session depends on this trait, never on HTTP details.
#[async_trait::async_trait]
pub trait NotionRepository: Send + Sync {
    async fn retrieve_page(&self, id: &NotionId) -> Result<Page, AppError>;
    async fn retrieve_database(&self, id: &NotionId) -> Result<Database, AppError>;
    async fn retrieve_user(&self, id: &NotionId) -> Result<User, AppError>;

    /// The bot user behind the integration token.
    async fn current_user(&self) -> Result<User, AppError>;

    /// Every user of the workspace, across all result pages.
    async fn list_users(&self) -> Result<Vec<User>, AppError>;

    /// Every search hit, across all result pages.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<NotionObject>, AppError>;
}

pub use cache::CachedNotionClient;
pub use client::NotionHttpClient;
