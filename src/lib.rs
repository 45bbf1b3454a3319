// src/lib.rs
//! ultimate-notion: a high-level, idiomatic client for the Notion API.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Session**: `Session`, the entry point for all lookups
//! - **Error handling**: `AppError`, `NotionErrorCode`, `ValidationError`
//! - **Configuration**: `SessionConfig`, `CacheSettings`
//! - **Domain model**: `Page`, `Database`, `User`, `NotionObject`, etc.
//! - **Domain types**: `NotionId`, `ObjRef`, `ApiKey`, `SList`, etc.
//! - **API client**: `NotionRepository`, `NotionHttpClient`, `CachedNotionClient`, parsers

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod model;
mod session;
pub mod types;

// --- Session ---
pub use crate::session::Session;

// --- Error Handling ---
pub use crate::error::{AppError, NotionErrorCode};
pub use crate::types::{SingleItemError, ValidationError};

// --- Configuration ---
pub use crate::config::{CacheSettings, SessionConfig};

// --- Domain Model ---
pub use crate::model::{
    Database, NotionObject, Page, Parent, PropertySchema, PropertyValue, User, UserKind,
};

// --- Domain Types ---
pub use crate::types::{
    ApiKey, BaseUrl, DatabaseId, NotionId, ObjRef, PageId, PropertyName, SList, UserId,
};

// --- API Client ---
pub use crate::api::{
    cache::{CachedNotionClient, TtlCache},
    client::{ApiResponse, NotionHttpClient},
    parser::{
        parse_database_response, parse_page_response, parse_search_pagination,
        parse_user_response, parse_users_pagination,
    },
    NotionRepository, ObjectFilter, SearchQuery,
};
