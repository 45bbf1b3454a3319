// src/constants.rs
//! Constants that define how the session talks to Notion.

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// Default endpoint of the public Notion API.
pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

/// API version sent with every request in the `Notion-Version` header.
pub const NOTION_API_VERSION: &str = "2022-06-28";

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100. We use the maximum to minimize
/// round-trips when listing users or walking search results.
pub const NOTION_API_PAGE_SIZE: u32 = 100;

/// Environment variable holding the integration token.
pub const ENV_NOTION_AUTH_TOKEN: &str = "NOTION_AUTH_TOKEN";

/// Per-request timeout.
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

// ---------------------------------------------------------------------------
// Lookup cache
// ---------------------------------------------------------------------------

/// How long a cached page, database, user or search result stays valid.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 30;

/// Maximum number of entries held by each lookup cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing unparseable response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 500;
