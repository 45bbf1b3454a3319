// src/api/parser.rs
//! Turns raw API responses into domain objects or typed errors.

use super::client::ApiResponse;
use super::responses::{
    DatabaseObject, NotionError, PageObject, PaginatedResponse, SearchResponse, ToDomain,
    UserListResponse, UserObject,
};
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{AppError, NotionErrorCode};
use crate::model::{Database, NotionObject, Page, User};
use reqwest::StatusCode;

/// Parse any Notion API response, success or error
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    if result.status.is_success() {
        parse_success(&result.data, &result.url)
    } else {
        parse_error(&result.data, result.status, &result.url)
    }
}

fn parse_success<T>(body: &str, url: &str) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        AppError::MalformedResponse(format!("{} (body: {})", e, preview(body)))
    })
}

/// Maps Notion's error envelope to [`AppError::NotionService`].
fn parse_error<T>(body: &str, status: StatusCode, url: &str) -> Result<T, AppError> {
    if let Ok(notion_error) = serde_json::from_str::<NotionError>(body) {
        log::debug!(
            "Notion error from {}: {} ({})",
            url,
            notion_error.code,
            notion_error.message
        );
        return Err(AppError::NotionService {
            code: NotionErrorCode::from_api_response(&notion_error.code),
            message: notion_error.message,
            status,
            request_id: notion_error.request_id,
        });
    }

    // Fallback to generic error with HTTP status code
    Err(AppError::NotionService {
        code: NotionErrorCode::from_http_status(status.as_u16()),
        message: format!("HTTP {} from {}: {}", status, url, preview(body)),
        status,
        request_id: None,
    })
}

fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let cut: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", cut)
    } else {
        body.to_string()
    }
}

pub fn parse_page_response(result: ApiResponse<String>) -> Result<Page, AppError> {
    let page: PageObject = parse_api_response(result)?;
    page.to_domain()
}

pub fn parse_database_response(result: ApiResponse<String>) -> Result<Database, AppError> {
    let database: DatabaseObject = parse_api_response(result)?;
    database.to_domain()
}

pub fn parse_user_response(result: ApiResponse<String>) -> Result<User, AppError> {
    let user: UserObject = parse_api_response(result)?;
    user.to_domain()
}

/// One page of `GET /users`
pub fn parse_users_pagination(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<User>, AppError> {
    let response: UserListResponse = parse_api_response(result)?;
    let object = response.object.clone();
    let next_cursor = response.next_cursor.clone();
    let has_more = response.has_more;

    Ok(PaginatedResponse {
        object,
        results: response.into_domain_users()?,
        next_cursor,
        has_more,
    })
}

/// One page of `POST /search`
pub fn parse_search_pagination(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<NotionObject>, AppError> {
    let response: SearchResponse = parse_api_response(result)?;
    let object = response.object.clone();
    let next_cursor = response.next_cursor.clone();
    let has_more = response.has_more;

    Ok(PaginatedResponse {
        object,
        results: response.into_domain_objects()?,
        next_cursor,
        has_more,
    })
}
