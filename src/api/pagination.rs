// src/api/pagination.rs
//! Cursor pagination over Notion list endpoints.

use super::responses::PaginatedResponse;
use crate::constants::NOTION_API_PAGE_SIZE;
use crate::error::AppError;

/// Fetches every page of results by following `next_cursor`.
///
/// `fetch_fn` receives the page size and the cursor of the page to fetch
/// (`None` for the first one). Stops when `has_more` is false or the cursor
/// is missing.
pub async fn fetch_all_pages<T, F, Fut>(mut fetch_fn: F) -> Result<Vec<T>, AppError>
where
    F: FnMut(u32, Option<String>) -> Fut,
    Fut: std::future::Future<Output = Result<PaginatedResponse<T>, AppError>>,
{
    let mut all_items = Vec::new();
    let mut cursor = None;
    let mut pages_fetched = 0u32;

    loop {
        let response = fetch_fn(NOTION_API_PAGE_SIZE, cursor).await?;

        let has_more = response.has_more;
        cursor = response.next_cursor;
        all_items.extend(response.results);
        pages_fetched += 1;

        if !has_more || cursor.is_none() {
            break;
        }
    }

    log::debug!(
        "Fetched {} items over {} page(s)",
        all_items.len(),
        pages_fetched
    );
    Ok(all_items)
}
