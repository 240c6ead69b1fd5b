//! Remote workspace REST API client.
//!
//! Provides a sync HTTP client authenticated with a bearer integration
//! token. Every request carries the `Notion-Version` header.

mod blocks;
mod database;
mod pages;

use std::time::Duration;

use serde::de::DeserializeOwned;
use ureq::Agent;
use ureq::http::Response;

use crate::error::NotionError;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Default API version header value.
const DEFAULT_API_VERSION: &str = "2022-06-28";

/// Largest page size the API accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Remote workspace REST API client.
pub struct NotionClient {
    agent: Agent,
    base_url: String,
    token: String,
    database_id: String,
    api_version: String,
    page_size: u32,
}

impl NotionClient {
    /// Create a client for one database.
    ///
    /// # Arguments
    /// * `base_url` - API base URL (e.g. `https://api.notion.com/v1`)
    /// * `token` - Integration token
    /// * `database_id` - Collection queried by [`query_database`](Self::query_database)
    #[must_use]
    pub fn new(base_url: &str, token: &str, database_id: &str) -> Self {
        Self {
            agent: build_agent(DEFAULT_TIMEOUT),
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: token.to_owned(),
            database_id: database_id.to_owned(),
            api_version: DEFAULT_API_VERSION.to_owned(),
            page_size: MAX_PAGE_SIZE,
        }
    }

    /// Set the `Notion-Version` header value.
    #[must_use]
    pub fn with_api_version(mut self, api_version: &str) -> Self {
        api_version.clone_into(&mut self.api_version);
        self
    }

    /// Set the number of items requested per page (clamped to 1..=100).
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Set the global HTTP timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.agent = build_agent(timeout_secs);
        self
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

fn build_agent(timeout_secs: u64) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(timeout_secs)))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Turn an error status into [`NotionError::HttpResponse`], otherwise parse the body.
fn read_json<T: DeserializeOwned>(response: Response<ureq::Body>) -> Result<T, NotionError> {
    let status = response.status().as_u16();
    let mut body_reader = response.into_body();

    if status >= 400 {
        let error_body = body_reader
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_owned());
        return Err(NotionError::HttpResponse {
            status,
            body: error_body,
        });
    }

    Ok(body_reader.read_json()?)
}
