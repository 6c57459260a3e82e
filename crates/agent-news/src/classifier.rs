//! Query classification: news or general
//!
//! A single low-temperature completion decides whether a query is about
//! current events. Any failure falls back to [`Category::General`].

use agent_core::{Agent, Context};
use agent_runtime::{AgentRuntime, SimpleAgent, SimpleConfig};
use async_trait::async_trait;
use minijinja::Environment;
use std::fmt;
use tracing::{debug, info, warn};

use crate::error::Result;

/// Routing category of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Time-sensitive, current events
    News,
    /// Conceptual, historical, definitional or how-to
    General,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::News => "news",
            Self::General => "general",
        })
    }
}

/// Decides the category of a query
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify `query`; never fails
    async fn classify(&self, query: &str) -> Category;
}

const PROMPT: &str = "\
Classify the following user query into exactly one category.

Query: \"{{ query }}\"

Categories:
- news: the query asks about current events or time-sensitive information. \
Signals include words such as latest, breaking, today, this week, recent developments, \
or references to ongoing events.
- general: the query asks about concepts, history, definitions, explanations or how to do something.

Reply with a single word: news or general.";

/// Map a free-text reply onto a category
///
/// "news" is checked before "general", so a reply containing both is news.
/// Anything else is general.
pub fn parse_category(reply: &str) -> Category {
    let normalized = reply.trim().to_lowercase();
    if normalized.contains("news") {
        Category::News
    } else {
        Category::General
    }
}

/// Render the classification prompt for `query`
pub fn classification_prompt(query: &str) -> Result<String> {
    let env = Environment::new();
    Ok(env.render_str(
        PROMPT,
        minijinja::value::Value::from_serialize(serde_json::json!({ "query": query })),
    )?)
}

/// LLM-backed classifier
pub struct QueryClassifier {
    agent: SimpleAgent,
}

impl QueryClassifier {
    /// Agent name used in logs
    pub const NAME: &'static str = "query-classifier";

    /// Create a classifier sharing the runtime's provider and model
    pub fn new(runtime: &AgentRuntime) -> Self {
        let config = SimpleConfig {
            temperature: 0.0,
            max_tokens: 10,
            ..runtime.simple_config()
        };
        Self {
            agent: runtime.create_simple_agent(config, Self::NAME),
        }
    }
}

#[async_trait]
impl Classifier for QueryClassifier {
    async fn classify(&self, query: &str) -> Category {
        let prompt = match classification_prompt(query) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!(error = %e, "Could not build classification prompt, defaulting to general");
                return Category::General;
            }
        };

        match self.agent.process(prompt, &mut Context::new()).await {
            Ok(reply) => {
                let category = parse_category(&reply);
                debug!(reply = %reply.trim(), "Classifier replied");
                info!(%category, "Query classified");
                category
            }
            Err(e) => {
                warn!(error = %e, "Classification failed, defaulting to general");
                Category::General
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_llm::LLMError;
    use agent_runtime::testing::{ScriptedProvider, text_reply};
    use std::sync::Arc;

    type Replies = Vec<agent_llm::Result<agent_llm::CompletionResponse>>;

    fn build(replies: Replies) -> (Arc<ScriptedProvider>, QueryClassifier) {
        let provider = Arc::new(ScriptedProvider::new(replies));
        let runtime = AgentRuntime::builder()
            .provider(provider.clone())
            .build()
            .unwrap();
        (provider, QueryClassifier::new(&runtime))
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category("News."), Category::News);
        assert_eq!(parse_category(" NEWS "), Category::News);
        assert_eq!(parse_category("general"), Category::General);
        assert_eq!(parse_category("I'm not sure"), Category::General);
        assert_eq!(parse_category(""), Category::General);
        assert_eq!(parse_category("general news"), Category::News);
    }

    #[test]
    fn test_prompt_embeds_query() {
        let prompt = classification_prompt("What is quantum computing?").unwrap();
        assert!(prompt.contains("Query: \"What is quantum computing?\""));
        assert!(prompt.contains("breaking"));
        assert!(prompt.ends_with("Reply with a single word: news or general."));
    }

    #[tokio::test]
    async fn test_classify_uses_single_low_temperature_call() {
        let (provider, classifier) = build(vec![Ok(text_reply("news"))]);

        let category = classifier.classify("Latest AI headlines today").await;

        assert_eq!(category, Category::News);
        assert_eq!(provider.calls(), 1);
        let request = &provider.requests()[0];
        assert_eq!(request.temperature, Some(0.0));
        assert_eq!(request.max_tokens, 10);
        assert_eq!(request.messages.len(), 1);
        assert!(
            request.messages[0]
                .text()
                .unwrap_or_default()
                .contains("Latest AI headlines today")
        );
    }

    #[tokio::test]
    async fn test_backend_error_defaults_to_general() {
        for error in [
            LLMError::Timeout("slow".to_string()),
            LLMError::AuthenticationFailed,
        ] {
            let (provider, classifier) = build(vec![Err(error)]);
            assert_eq!(classifier.classify("Breaking news").await, Category::General);
            assert_eq!(provider.calls(), 1);
        }
    }

    #[test]
    fn test_category_display() {
        assert_eq!(Category::News.to_string(), "news");
        assert_eq!(Category::General.to_string(), "general");
    }
}
