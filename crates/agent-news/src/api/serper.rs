//! Serper client for general web search

use crate::config::{DEFAULT_SERPER_BASE_URL, NewsConfig};
use crate::error::{NewsError, Result};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{info, warn};

/// Organic results kept per search
pub const MAX_RESULTS: usize = 4;

/// Message for HTTP 403
pub const FORBIDDEN: &str = "Error: Access forbidden (403). Please verify your Serper API key is valid and has available credits.";

/// Message for HTTP 401
pub const UNAUTHORIZED: &str = "Error: Unauthorized (401). Your Serper API key is invalid.";

/// Message when the payload carries no `organic` field
pub const MISSING_ORGANIC: &str =
    "Error: Could not retrieve search results. Response may be incomplete.";

/// One organic search hit; absent fields are empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganicResult {
    /// Page title
    pub title: String,
    /// Page URL
    pub link: String,
    /// Result snippet
    pub snippet: String,
}

impl OrganicResult {
    /// Parse one entry of the `organic` array
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            title: text("title"),
            link: text("link"),
            snippet: text("snippet"),
        }
    }
}

/// Serper search client
pub struct SerperClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SerperClient {
    /// Create a new Serper client
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key: api_key.into(),
            base_url: DEFAULT_SERPER_BASE_URL.to_string(),
        })
    }

    /// Create a client from the shared configuration
    pub fn from_config(config: &NewsConfig) -> Result<Self> {
        Ok(Self::new(config.serper_api_key.clone(), config.request_timeout)?
            .with_base_url(config.serper_base_url.clone()))
    }

    /// Use a different API root
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Run a web search and return the top organic results
    ///
    /// Status failures are reported as [`NewsError::Api`] carrying the
    /// user-facing message.
    pub async fn search(&self, query: &str) -> Result<Vec<OrganicResult>> {
        info!(query, "Searching the web");

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("X-API-KEY", &self.api_key)
            .json(&json!({ "q": query }))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Search API returned an error status");
            let message = match status {
                StatusCode::FORBIDDEN => FORBIDDEN.to_string(),
                StatusCode::UNAUTHORIZED => UNAUTHORIZED.to_string(),
                other => format!("Error: Search API returned status code {}", other.as_u16()),
            };
            return Err(NewsError::Api(message));
        }

        let body = response.text().await?;
        let data: Value = serde_json::from_str(&body)?;

        let organic = data
            .get("organic")
            .and_then(Value::as_array)
            .ok_or_else(|| NewsError::Api(MISSING_ORGANIC.to_string()))?;

        info!(found = organic.len(), "Web search done");
        Ok(organic
            .iter()
            .take(MAX_RESULTS)
            .map(OrganicResult::from_value)
            .collect())
    }
}
