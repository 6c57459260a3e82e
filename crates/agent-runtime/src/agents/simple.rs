//! Simple agent implementation (LLM only, no tools)

use crate::executor::{DEFAULT_MODEL, map_llm_error};
use agent_core::{Agent, Context, Result};
use agent_llm::{CompletionRequest, LLMProvider, Message};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Configuration for a simple agent
#[derive(Debug, Clone)]
pub struct SimpleConfig {
    /// Model to use
    pub model: String,

    /// Optional system prompt
    pub system_prompt: Option<String>,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Temperature for sampling
    pub temperature: f32,
}

impl Default for SimpleConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            system_prompt: None,
            max_tokens: 1024,
            temperature: 0.7,
        }
    }
}

/// An agent that makes a single completion call per input
///
/// Suited to short structured replies such as classification.
pub struct SimpleAgent {
    provider: Arc<dyn LLMProvider>,
    config: SimpleConfig,
    name: String,
}

impl SimpleAgent {
    /// Create a new simple agent
    pub fn new(provider: Arc<dyn LLMProvider>, config: SimpleConfig, name: String) -> Self {
        Self {
            provider,
            config,
            name,
        }
    }

    /// Get the agent's configuration
    pub fn config(&self) -> &SimpleConfig {
        &self.config
    }
}

#[async_trait]
impl Agent for SimpleAgent {
    async fn process(&self, input: String, _context: &mut Context) -> Result<String> {
        let mut builder = CompletionRequest::builder(&self.config.model)
            .add_message(Message::user(input))
            .max_tokens(self.config.max_tokens)
            .temperature(self.config.temperature);
        if let Some(system) = &self.config.system_prompt {
            builder = builder.system(system.clone());
        }

        let response = self
            .provider
            .complete(builder.build())
            .await
            .map_err(map_llm_error)?;

        debug!(agent = %self.name, tokens = response.usage.total(), "Simple agent replied");

        Ok(response.message.text().unwrap_or_default().to_string())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedProvider, text_reply};
    use agent_llm::LLMError;

    #[test]
    fn test_simple_config_default() {
        let config = SimpleConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.system_prompt.is_none());
        assert_eq!(config.max_tokens, 1024);
    }

    #[tokio::test]
    async fn test_single_call() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(text_reply("news"))]));
        let config = SimpleConfig {
            temperature: 0.0,
            max_tokens: 10,
            ..SimpleConfig::default()
        };
        let agent = SimpleAgent::new(provider.clone(), config, "classifier".to_string());

        let reply = agent
            .process("Latest on elections".to_string(), &mut Context::new())
            .await
            .unwrap();

        assert_eq!(reply, "news");
        assert_eq!(agent.name(), "classifier");
        let request = &provider.requests()[0];
        assert_eq!(request.max_tokens, 10);
        assert_eq!(request.temperature, Some(0.0));
        assert!(request.system.is_none());
    }

    #[tokio::test]
    async fn test_timeout_propagates() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(LLMError::Timeout(
            "slow".to_string(),
        ))]));
        let agent = SimpleAgent::new(provider, SimpleConfig::default(), "c".to_string());

        let err = agent
            .process("q".to_string(), &mut Context::new())
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }
}
