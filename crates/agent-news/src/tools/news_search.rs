//! Tool for searching recent news articles

use agent_core::Result as AgentResult;
use agent_tools::Tool;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use super::{QueryParams, block, query_schema};
use crate::api::{Article, GNewsClient};
use crate::error::NewsError;

/// Reply when the search matched nothing
pub const NO_ARTICLES: &str = "No news articles found for the given query.";

/// Reply when the payload could not be decoded
pub const INVALID_JSON: &str = "Error: Invalid JSON response from news API";

/// Searches GNews for articles from the last seven days
pub struct NewsSearchTool {
    client: Arc<GNewsClient>,
}

impl NewsSearchTool {
    /// Create a new news search tool
    pub fn new(client: Arc<GNewsClient>) -> Self {
        Self { client }
    }

    /// Search and render the result as text; never fails
    pub async fn search(&self, query: &str) -> String {
        match self.client.search(query).await {
            Ok(articles) if articles.is_empty() => NO_ARTICLES.to_string(),
            Ok(articles) => articles
                .iter()
                .map(render_article)
                .collect::<Vec<_>>()
                .join("\n"),
            Err(err) => {
                warn!(query, error = %err, "News search failed");
                describe_error(err)
            }
        }
    }
}

fn render_article(article: &Article) -> String {
    block(&[
        format!("Title: {}", article.title),
        format!("Link: {}", article.url),
        format!("Description: {}", article.description),
        format!("Published: {}", article.published_at),
        format!("Source: {}", article.source),
    ])
}

fn describe_error(err: NewsError) -> String {
    match err {
        NewsError::Api(message) => message,
        NewsError::Json(_) => INVALID_JSON.to_string(),
        NewsError::Http(e) => format!("Error making request: {e}"),
        other => format!("Error making request: {other}"),
    }
}

#[async_trait]
impl Tool for NewsSearchTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params = QueryParams::parse(params)?;
        Ok(Value::String(self.search(&params.query).await))
    }

    fn name(&self) -> &str {
        "search_news"
    }

    fn description(&self) -> &str {
        "Search for recent news articles from the last 7 days on a given topic"
    }

    fn input_schema(&self) -> Value {
        query_schema("The search query for finding news articles")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::gnews::MISSING_ARTICLES;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn tool_with(template: ResponseTemplate) -> (MockServer, NewsSearchTool) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(template)
            .mount(&server)
            .await;
        let client = GNewsClient::new("k", 600, Duration::from_secs(5))
            .unwrap()
            .with_base_url(server.uri());
        (server, NewsSearchTool::new(Arc::new(client)))
    }

    #[tokio::test]
    async fn test_renders_articles() {
        let (_server, tool) = tool_with(ResponseTemplate::new(200).set_body_json(json!({
            "articles": [
                {
                    "title": "Older",
                    "url": "https://a.example/1",
                    "description": "first",
                    "publishedAt": "2025-01-01T08:00:00Z",
                    "source": {"name": "Wire"}
                },
                {
                    "title": "Newer",
                    "url": "https://a.example/2",
                    "description": "second",
                    "publishedAt": "2025-01-02T08:00:00Z",
                    "source": {"name": "Daily"}
                },
                {"title": "Broken"}
            ]
        })))
        .await;

        let out = tool.execute(json!({"query": "ai"})).await.unwrap();
        assert_eq!(
            out.as_str().unwrap(),
            "Title: Newer\nLink: https://a.example/2\nDescription: second\n\
             Published: 2025-01-02T08:00:00Z\nSource: Daily\n\n-----------------\n\
             Title: Older\nLink: https://a.example/1\nDescription: first\n\
             Published: 2025-01-01T08:00:00Z\nSource: Wire\n\n-----------------"
        );
    }

    #[tokio::test]
    async fn test_error_texts() {
        let (_s, tool) =
            tool_with(ResponseTemplate::new(200).set_body_json(json!({"articles": []}))).await;
        assert_eq!(tool.search("q").await, NO_ARTICLES);

        let (_s, tool) = tool_with(ResponseTemplate::new(200).set_body_json(json!({}))).await;
        assert_eq!(tool.search("q").await, MISSING_ARTICLES);

        let (_s, tool) = tool_with(ResponseTemplate::new(200).set_body_string("{oops")).await;
        assert_eq!(tool.search("q").await, INVALID_JSON);

        let (_s, tool) = tool_with(ResponseTemplate::new(403)).await;
        let out = tool.search("q").await;
        assert!(out.starts_with("Error making request: "), "{out}");
        assert!(out.contains("403"));
    }

    #[tokio::test]
    async fn test_invalid_params() {
        let (_s, tool) = tool_with(ResponseTemplate::new(200)).await;
        let err = tool.execute(json!({})).await.unwrap_err();
        assert!(err.to_string().contains("Invalid parameters"));
        assert_eq!(tool.name(), "search_news");
    }
}
