//! GNews client for recent news articles

use crate::config::{DEFAULT_GNEWS_BASE_URL, NewsConfig};
use crate::error::{NewsError, Result};
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Articles requested per search
pub const MAX_ARTICLES: usize = 5;

/// Width of the search window
pub const WINDOW_DAYS: i64 = 7;

/// Message returned when the payload carries no `articles` field
pub const MISSING_ARTICLES: &str =
    "Error: Could not retrieve news articles. Please check your GNews API key.";

/// A news article with every field the report needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// Headline
    pub title: String,
    /// Article URL
    pub url: String,
    /// Short description
    pub description: String,
    /// Publish time as sent by the API
    pub published_at: String,
    /// Publisher name
    pub source: String,
}

impl Article {
    /// Parse one entry of the `articles` array
    ///
    /// Returns `None` when any field is absent or not a string.
    pub fn from_value(value: &Value) -> Option<Self> {
        let text = |key: &str| value.get(key)?.as_str().map(str::to_string);

        Some(Self {
            title: text("title")?,
            url: text("url")?,
            description: text("description")?,
            published_at: text("publishedAt")?,
            source: value.get("source")?.get("name")?.as_str()?.to_string(),
        })
    }
}

/// GNews search client
///
/// Calls share one per-minute rate limiter.
pub struct GNewsClient {
    client: Client,
    api_key: String,
    base_url: String,
    rate_limiter: SharedRateLimiter,
}

impl GNewsClient {
    /// Create a new GNews client with rate limiting
    ///
    /// # Arguments
    /// * `api_key` - GNews API key
    /// * `rate_limit` - Requests per minute
    /// * `timeout` - Per-request deadline
    pub fn new(api_key: impl Into<String>, rate_limit: u32, timeout: Duration) -> Result<Self> {
        let quota = Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::MIN));
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_GNEWS_BASE_URL.to_string(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    /// Create a client from the shared configuration
    pub fn from_config(config: &NewsConfig) -> Result<Self> {
        Ok(Self::new(
            config.gnews_api_key.clone(),
            config.gnews_rate_limit,
            config.request_timeout,
        )?
        .with_base_url(config.gnews_base_url.clone()))
    }

    /// Use a different API root
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Search articles published in the last seven days, newest first
    pub async fn search(&self, query: &str) -> Result<Vec<Article>> {
        self.search_at(query, Utc::now()).await
    }

    async fn search_at(&self, query: &str, now: DateTime<Utc>) -> Result<Vec<Article>> {
        self.rate_limiter.until_ready().await;

        let (from, to) = window(now);
        let max = MAX_ARTICLES.to_string();
        info!(query, from = %from, to = %to, "Searching news");

        // Errors are stripped of their URL, which carries the key
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("q", query),
                ("lang", "en"),
                ("max", max.as_str()),
                ("sortby", "publishedAt"),
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(reqwest::Error::without_url)?;

        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        let data: Value = serde_json::from_str(&body)?;

        let raw = data
            .get("articles")
            .and_then(Value::as_array)
            .ok_or_else(|| NewsError::Api(MISSING_ARTICLES.to_string()))?;

        let mut articles: Vec<Article> = raw.iter().filter_map(Article::from_value).collect();
        articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        articles.truncate(MAX_ARTICLES);

        debug!(received = raw.len(), kept = articles.len(), "News search done");
        Ok(articles)
    }
}

/// `from`/`to` bounds of the search window in RFC 3339 with a `Z` suffix
fn window(now: DateTime<Utc>) -> (String, String) {
    let from = now - TimeDelta::days(WINDOW_DAYS);
    (
        from.to_rfc3339_opts(SecondsFormat::Secs, true),
        now.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GNewsClient {
        GNewsClient::new("gn-key", 600, Duration::from_secs(5))
            .unwrap()
            .with_base_url(server.uri())
    }

    fn article(title: &str, published: &str) -> Value {
        json!({
            "title": title,
            "url": format!("https://example.com/{title}"),
            "description": "desc",
            "publishedAt": published,
            "source": {"name": "Wire"}
        })
    }

    #[test]
    fn test_window_format() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 30, 5).unwrap();
        let (from, to) = window(now);
        assert_eq!(from, "2025-03-03T12:30:05Z");
        assert_eq!(to, "2025-03-10T12:30:05Z");
    }

    #[test]
    fn test_article_requires_every_field() {
        assert!(Article::from_value(&article("a", "2025-01-01T00:00:00Z")).is_some());

        let mut no_source = article("a", "2025-01-01T00:00:00Z");
        no_source["source"] = json!({});
        assert!(Article::from_value(&no_source).is_none());

        let mut no_description = article("a", "2025-01-01T00:00:00Z");
        no_description.as_object_mut().unwrap().remove("description");
        assert!(Article::from_value(&no_description).is_none());
    }

    #[tokio::test]
    async fn test_search_sends_expected_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "rust lang"))
            .and(query_param("lang", "en"))
            .and(query_param("max", "5"))
            .and(query_param("sortby", "publishedAt"))
            .and(query_param("apikey", "gn-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"articles": []})))
            .expect(1)
            .mount(&server)
            .await;

        let articles = client_for(&server).search("rust lang").await.unwrap();
        assert!(articles.is_empty());
    }

    #[tokio::test]
    async fn test_sorted_newest_first_and_capped() {
        let server = MockServer::start().await;
        let payload = json!({"articles": [
            article("old", "2025-01-01T00:00:00Z"),
            article("newest", "2025-01-07T00:00:00Z"),
            article("mid", "2025-01-04T00:00:00Z"),
            article("d", "2025-01-02T00:00:00Z"),
            article("e", "2025-01-03T00:00:00Z"),
            article("f", "2025-01-05T00:00:00Z"),
        ]});
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload))
            .mount(&server)
            .await;

        let articles = client_for(&server).search("x").await.unwrap();
        let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["newest", "f", "mid", "e", "d"]);
    }

    #[tokio::test]
    async fn test_missing_articles_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"errors": ["bad key"]})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).search("x").await.unwrap_err();
        assert!(matches!(err, NewsError::Api(ref m) if m == MISSING_ARTICLES));
    }

    #[tokio::test]
    async fn test_invalid_json_and_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "garbled"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("q", "denied"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(matches!(
            client.search("garbled").await.unwrap_err(),
            NewsError::Json(_)
        ));

        let err = client.search("denied").await.unwrap_err();
        assert!(matches!(err, NewsError::Http(_)));
        assert!(!err.to_string().contains("gn-key"));
    }
}
