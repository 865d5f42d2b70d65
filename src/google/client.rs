//! Authenticated Google REST client.
//!
//! Wraps a `reqwest::Client` with a bearer token, maps Google's error
//! envelope onto `ApiError`, and exposes list endpoints as `PageSource`s so
//! they can be drained by the pager.

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::google::pager::{fetch_all, fetch_all_with, Page, PageSource};
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, warn};

pub const ADMIN_BASE_URL: &str = "https://admin.googleapis.com";
pub const DRIVE_BASE_URL: &str = "https://www.googleapis.com/drive/v3";

/// Query string pairs for a request.
pub type Query = Vec<(&'static str, String)>;

/// Google API HTTP client with OAuth bearer token.
pub struct GoogleClient {
    client: Client,
    access_token: String,
    admin_base: String,
    drive_base: String,
    show_progress: bool,
}

impl GoogleClient {
    /// Create a client for the production endpoints.
    pub fn new(access_token: String, api: &ApiConfig, show_progress: bool) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ApiError::Fatal {
                status: None,
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            access_token,
            admin_base: ADMIN_BASE_URL.to_string(),
            drive_base: DRIVE_BASE_URL.to_string(),
            show_progress,
        })
    }

    pub(crate) fn admin_url(&self, path: &str) -> String {
        format!("{}{}", self.admin_base, path)
    }

    pub(crate) fn drive_url(&self, path: &str) -> String {
        format!("{}{}", self.drive_base, path)
    }

    /// Authenticated GET returning the parsed JSON body.
    pub async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(url)
            .query(query)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = response.status();
        debug!("Response status: {}", status);

        let body = response.text().await?;

        if status.is_success() {
            if body.is_empty() {
                return Ok(Value::Object(serde_json::Map::new()));
            }
            return serde_json::from_str(&body).map_err(|e| ApiError::Decode {
                url: url.to_string(),
                message: e.to_string(),
            });
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate limited by Google API");
        }

        let err = ApiError::from_status(status.as_u16(), extract_error_message(&body, status));
        if err.is_transient() {
            warn!("{}", err);
        } else {
            error!("{}", err);
        }
        Err(err)
    }

    /// Authenticated GET decoded into `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let value = self.get_json(url, query).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// A paginated list endpoint whose items live under `items_field`.
    pub fn list(&self, url: String, query: Query, items_field: &'static str) -> ListCall<'_> {
        ListCall {
            client: self,
            url,
            query,
            items_field,
        }
    }

    /// Drain a list endpoint, showing a spinner unless progress is disabled.
    pub async fn fetch_list<T>(&self, label: &str, call: ListCall<'_>) -> Result<Vec<T>, ApiError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        if !self.show_progress {
            let items: Vec<T> = fetch_all(&call).await?;
            debug!("{}: fetched {} items", label, items.len());
            return Ok(items);
        }

        let spinner = self.spinner(label);
        let result = fetch_all_with::<T, _, _>(&call, |pages, items| {
            spinner.set_message(format!("{}: {} items ({} pages)", label, items, pages));
        })
        .await;
        spinner.finish_and_clear();

        let items: Vec<T> = result?;
        debug!("{}: fetched {} items", label, items.len());
        Ok(items)
    }

    fn spinner(&self, label: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(label.to_string());
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    }
}

/// One list request, re-issued with each continuation token.
pub struct ListCall<'a> {
    client: &'a GoogleClient,
    url: String,
    query: Query,
    items_field: &'static str,
}

#[async_trait]
impl<'a, T> PageSource<T> for ListCall<'a>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch_page(&self, page_token: Option<&str>) -> Result<Page<T>, ApiError> {
        let query = page_query(&self.query, page_token);
        let body = self.client.get_json(&self.url, &query).await?;
        parse_page(&self.url, body, self.items_field)
    }
}

/// Base query plus the continuation token, when there is one.
pub(crate) fn page_query(base: &[(&'static str, String)], page_token: Option<&str>) -> Query {
    let mut query = base.to_vec();
    if let Some(token) = page_token {
        query.push(("pageToken", token.to_string()));
    }
    query
}

/// Split a list response into items and continuation token.
pub(crate) fn parse_page<T: DeserializeOwned>(
    url: &str,
    mut body: Value,
    items_field: &str,
) -> Result<Page<T>, ApiError> {
    let next_page_token = body
        .get("nextPageToken")
        .and_then(|v| v.as_str())
        .map(String::from);

    let items = match body.get_mut(items_field).map(Value::take) {
        Some(Value::Null) | None => Vec::new(),
        Some(raw) => serde_json::from_value(raw).map_err(|e| ApiError::Decode {
            url: url.to_string(),
            message: format!("{}: {}", items_field, e),
        })?,
    };

    Ok(Page::new(items, next_page_token))
}

/// Pull the human-readable message out of Google's error envelope:
/// `{"error": {"code": 403, "message": "..."}}`.
pub(crate) fn extract_error_message(body: &str, status: StatusCode) -> String {
    if let Ok(parsed) = serde_json::from_str::<Value>(body) {
        if let Some(error_obj) = parsed.get("error") {
            if let Some(message) = error_obj.get("message").and_then(|v| v.as_str()) {
                return message.to_string();
            }
            // OAuth endpoints use {"error": "invalid_grant", "error_description": "..."}
            if let Some(code) = error_obj.as_str() {
                let description = parsed
                    .get("error_description")
                    .and_then(|v| v.as_str())
                    .unwrap_or("");
                return format!("{} {}", code, description).trim().to_string();
            }
        }
    }

    if body.trim().is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {}: {}", status, body.trim())
    }
}
