//! Wiring of the news research crew
//!
//! Builds the provider, search clients, tools, runtime, classifier and
//! pipeline factory from one [`NewsConfig`].

use agent_llm::providers::{OpenAIConfig, OpenAIProvider};
use agent_runtime::{AgentRuntime, map_llm_error};
use agent_tools::ToolRegistry;
use std::sync::Arc;
use tracing::info;

use crate::api::{GNewsClient, SerperClient};
use crate::classifier::QueryClassifier;
use crate::config::NewsConfig;
use crate::error::Result;
use crate::orchestrator::Orchestrator;
use crate::pipeline::CrewPipelineFactory;
use crate::tools::{NewsSearchTool, WebSearchTool};

/// Registry holding both search tools
pub fn build_tool_registry(config: &NewsConfig) -> Result<ToolRegistry> {
    let gnews = Arc::new(GNewsClient::from_config(config)?);
    let serper = Arc::new(SerperClient::from_config(config)?);

    Ok(ToolRegistry::new()
        .with_tool(Arc::new(NewsSearchTool::new(gnews)))
        .with_tool(Arc::new(WebSearchTool::new(serper))))
}

/// Runtime over the configured model and both search tools
pub fn build_runtime(config: &NewsConfig) -> Result<AgentRuntime> {
    let provider = OpenAIProvider::with_config(
        OpenAIConfig::new(config.groq_api_key.clone())
            .with_api_base(config.api_base.clone())
            .with_timeout_duration(config.request_timeout),
    )
    .map_err(map_llm_error)?;

    let runtime = AgentRuntime::builder()
        .provider(Arc::new(provider))
        .tool_registry(Arc::new(build_tool_registry(config)?))
        .default_model(config.model.clone())
        .default_max_iterations(config.max_iterations)
        .build()?;

    info!(
        model = %config.model,
        tools = ?runtime.tools().names(),
        "News crew runtime ready"
    );
    Ok(runtime)
}

/// Orchestrator wired from `config`
pub fn build_orchestrator(config: Arc<NewsConfig>) -> Result<Orchestrator> {
    let runtime = build_runtime(&config)?;
    let classifier = Arc::new(QueryClassifier::new(&runtime));
    let factory = Arc::new(CrewPipelineFactory::new(runtime));

    Ok(Orchestrator::new(classifier, factory)
        .with_max_attempts(config.max_attempts)
        .with_retry_pause(config.retry_pause))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{SEARCH_INTERNET, SEARCH_NEWS};
    use agent_llm::LLMProvider;
    use std::time::Duration;

    fn config() -> NewsConfig {
        NewsConfig::builder()
            .groq_api_key("gsk-test")
            .gnews_api_key("gn-test")
            .serper_api_key("sp-test")
            .model("llama-3.1-8b-instant")
            .max_iterations(5)
            .max_attempts(0)
            .request_timeout(Duration::from_secs(10))
            .build()
            .unwrap()
    }

    #[test]
    fn test_registry_has_both_tools() {
        let registry = build_tool_registry(&config()).unwrap();
        assert_eq!(registry.names(), [SEARCH_INTERNET, SEARCH_NEWS]);
    }

    #[test]
    fn test_runtime_uses_config() {
        let runtime = build_runtime(&config()).unwrap();
        assert_eq!(runtime.config().default_model, "llama-3.1-8b-instant");
        assert_eq!(runtime.config().default_max_iterations, 5);
        assert_eq!(runtime.provider().name(), "groq");
    }

    #[test]
    fn test_orchestrator_budget() {
        let orchestrator = build_orchestrator(Arc::new(config())).unwrap();
        assert_eq!(orchestrator.max_attempts(), 1);
    }
}
