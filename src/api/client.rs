// src/api/client.rs
//! HTTP client for the Notion API.
//!
//! Handles authentication and request/response plumbing; parsing is left
//! to [`super::parser`].

use super::pagination::fetch_all_pages;
use super::{parser, NotionRepository, SearchQuery};
use crate::config::SessionConfig;
use crate::error::AppError;
use crate::model::{Database, NotionObject, Page, User};
use crate::types::{ApiKey, BaseUrl, NotionId};
use reqwest::{header, Client, Response};
use serde::Serialize;

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: BaseUrl,
}

impl NotionHttpClient {
    /// Creates a new HTTP client with Notion API authentication.
    pub fn new(config: &SessionConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(
                &config.api_key,
                &config.notion_version,
            )?)
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(
        api_key: &ApiKey,
        notion_version: &str,
    ) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_str(notion_version).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid Notion version: {}", e))
            })?,
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    /// Makes a GET request to the specified endpoint (path relative to the base URL).
    pub async fn get(&self, endpoint: &str) -> Result<Response, AppError> {
        let url = self.base_url.endpoint(endpoint);
        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        log::debug!("GET {} -> {}", endpoint, response.status());
        Ok(response)
    }

    /// Makes a GET request with percent-encoded query parameters.
    pub async fn get_with_query(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<Response, AppError> {
        let url = self.base_url.endpoint(endpoint);
        log::debug!("GET {} {:?}", url, query);
        let response = self.client.get(url).query(query).send().await?;
        log::debug!("GET {} -> {}", endpoint, response.status());
        Ok(response)
    }

    /// Makes a POST request with JSON body to the specified endpoint.
    pub async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<Response, AppError> {
        let url = self.base_url.endpoint(endpoint);
        log::debug!("POST {}", url);
        let response = self.client.post(url).json(body).send().await?;
        log::debug!("POST {} -> {}", endpoint, response.status());
        Ok(response)
    }

    async fn get_text(&self, endpoint: &str) -> Result<ApiResponse<String>, AppError> {
        let response = self.get(endpoint).await?;
        extract_response_text(response).await
    }
}

#[async_trait::async_trait]
impl NotionRepository for NotionHttpClient {
    async fn retrieve_page(&self, id: &NotionId) -> Result<Page, AppError> {
        let result = self
            .get_text(&format!("pages/{}", id.to_hyphenated()))
            .await?;
        parser::parse_page_response(result)
    }

    async fn retrieve_database(&self, id: &NotionId) -> Result<Database, AppError> {
        let result = self
            .get_text(&format!("databases/{}", id.to_hyphenated()))
            .await?;
        parser::parse_database_response(result)
    }

    async fn retrieve_user(&self, id: &NotionId) -> Result<User, AppError> {
        let result = self
            .get_text(&format!("users/{}", id.to_hyphenated()))
            .await?;
        parser::parse_user_response(result)
    }

    async fn current_user(&self) -> Result<User, AppError> {
        let result = self.get_text("users/me").await?;
        parser::parse_user_response(result)
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        fetch_all_pages(|page_size, cursor| {
            let client = self.clone();
            async move {
                let mut query = vec![("page_size", page_size.to_string())];
                if let Some(cursor) = cursor {
                    query.push(("start_cursor", cursor));
                }
                let response = client.get_with_query("users", &query).await?;
                let result = extract_response_text(response).await?;
                parser::parse_users_pagination(result)
            }
        })
        .await
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<NotionObject>, AppError> {
        let base_body = query.to_body();
        fetch_all_pages(|page_size, cursor| {
            let client = self.clone();
            let mut body = base_body.clone();
            async move {
                body["page_size"] = serde_json::json!(page_size);
                if let Some(cursor) = cursor {
                    body["start_cursor"] = serde_json::json!(cursor);
                }
                let response = client.post("search", &body).await?;
                let result = extract_response_text(response).await?;
                parser::parse_search_pagination(result)
            }
        })
        .await
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
