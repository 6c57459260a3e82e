//! Tool for general web search

use agent_core::Result as AgentResult;
use agent_tools::Tool;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use super::{QueryParams, block, query_schema};
use crate::api::{OrganicResult, SerperClient};
use crate::error::NewsError;

/// Reply when the payload could not be decoded
pub const INVALID_JSON: &str = "Error: Invalid JSON response from search API";

/// Searches the web through Serper
pub struct WebSearchTool {
    client: Arc<SerperClient>,
}

impl WebSearchTool {
    /// Create a new web search tool
    pub fn new(client: Arc<SerperClient>) -> Self {
        Self { client }
    }

    /// Search and render the result as text; never fails
    pub async fn search(&self, query: &str) -> String {
        match self.client.search(query).await {
            Ok(results) => results
                .iter()
                .map(render_result)
                .collect::<Vec<_>>()
                .join("\n"),
            Err(err) => {
                warn!(query, error = %err, "Web search failed");
                match err {
                    NewsError::Api(message) => message,
                    NewsError::Json(_) => INVALID_JSON.to_string(),
                    NewsError::Http(e) => format!("Error making search request: {e}"),
                    other => format!("Error making search request: {other}"),
                }
            }
        }
    }
}

fn render_result(result: &OrganicResult) -> String {
    block(&[
        format!("Title: {}", result.title),
        format!("Link: {}", result.link),
        format!("Snippet: {}", result.snippet),
    ])
}

#[async_trait]
impl Tool for WebSearchTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params = QueryParams::parse(params)?;
        Ok(Value::String(self.search(&params.query).await))
    }

    fn name(&self) -> &str {
        "search_internet"
    }

    fn description(&self) -> &str {
        "Search the internet about a given topic and return relevant results"
    }

    fn input_schema(&self) -> Value {
        query_schema("The search query for finding information on the internet")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::serper::{FORBIDDEN, MISSING_ORGANIC};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn tool_with(template: ResponseTemplate) -> (MockServer, WebSearchTool) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(template)
            .mount(&server)
            .await;
        let client = SerperClient::new("k", Duration::from_secs(5))
            .unwrap()
            .with_base_url(server.uri());
        (server, WebSearchTool::new(Arc::new(client)))
    }

    #[tokio::test]
    async fn test_renders_results() {
        let (_s, tool) = tool_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic": [
                {"title": "Rust", "link": "https://rust-lang.org", "snippet": "A language"},
                {"link": "https://doc.rust-lang.org"}
            ]
        })))
        .await;

        let out = tool.execute(json!({"query": "rust"})).await.unwrap();
        assert_eq!(
            out.as_str().unwrap(),
            "Title: Rust\nLink: https://rust-lang.org\nSnippet: A language\n\n-----------------\n\
             Title: \nLink: https://doc.rust-lang.org\nSnippet: \n\n-----------------"
        );
    }

    #[tokio::test]
    async fn test_error_texts() {
        let (_s, tool) = tool_with(ResponseTemplate::new(403)).await;
        assert_eq!(tool.search("q").await, FORBIDDEN);

        let (_s, tool) = tool_with(ResponseTemplate::new(200).set_body_string("nope")).await;
        assert_eq!(tool.search("q").await, INVALID_JSON);

        let (_s, tool) = tool_with(ResponseTemplate::new(200).set_body_json(json!({}))).await;
        assert_eq!(tool.search("q").await, MISSING_ORGANIC);
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let client = SerperClient::new("k", Duration::from_secs(5))
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let tool = WebSearchTool::new(Arc::new(client));

        let out = tool.search("q").await;
        assert!(out.starts_with("Error making search request: "), "{out}");
    }
}
