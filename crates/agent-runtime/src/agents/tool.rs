//! Tool agent implementation (wraps AgentExecutor)

use crate::executor::{AgentExecutor, ExecutorEventHandler};
use agent_core::{Agent, Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// An agent that uses the LLM loop with tool execution
pub struct ToolAgent {
    executor: AgentExecutor,
    name: String,
}

impl ToolAgent {
    /// Create a new tool agent
    pub fn new(executor: AgentExecutor, name: String) -> Self {
        Self { executor, name }
    }

    /// Get a reference to the underlying executor
    pub fn executor(&self) -> &AgentExecutor {
        &self.executor
    }

    /// Run a task, reporting executor events to `handler`
    pub async fn run_with_handler(
        &self,
        input: String,
        context: &Context,
        handler: Arc<dyn ExecutorEventHandler>,
    ) -> Result<String> {
        info!(
            agent = %self.name,
            attempt = ?context.attempt(),
            pipeline = ?context.pipeline(),
            "Tool agent started"
        );
        self.executor.run_with_handler(input, handler).await
    }
}

#[async_trait]
impl Agent for ToolAgent {
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        info!(agent = %self.name, attempt = ?context.attempt(), "Tool agent started");
        self.executor.run(input).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ExecutorConfig;
    use crate::testing::{ScriptedProvider, text_reply};
    use agent_tools::ToolRegistry;

    #[tokio::test]
    async fn test_process_delegates_to_executor() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(text_reply("Report"))]));
        let executor = AgentExecutor::new(
            provider.clone(),
            Arc::new(ToolRegistry::new()),
            ExecutorConfig::default(),
        );
        let agent = ToolAgent::new(executor, "News Researcher".to_string());

        let mut context = Context::new().with_attempt(1);
        let out = agent.process("Research AI".to_string(), &mut context).await;

        assert_eq!(out.unwrap(), "Report");
        assert_eq!(agent.name(), "News Researcher");
        assert_eq!(provider.calls(), 1);
        assert!(provider.requests()[0].tools.is_none());
    }

    #[tokio::test]
    async fn test_run_with_handler_reports_events() {
        use std::sync::Mutex;

        #[derive(Default)]
        struct Done(Mutex<Vec<String>>);

        #[async_trait]
        impl ExecutorEventHandler for Done {
            async fn on_complete(&self, result: &str) {
                self.0.lock().unwrap().push(result.to_string());
            }
        }

        let provider = Arc::new(ScriptedProvider::new(vec![Ok(text_reply("Answer"))]));
        let agent = ToolAgent::new(
            AgentExecutor::new(provider, Arc::new(ToolRegistry::new()), ExecutorConfig::default()),
            "News Researcher".to_string(),
        );
        let handler = Arc::new(Done::default());
        let context = Context::new().with_attempt(2).with_pipeline("general inquiry");

        let out = agent
            .run_with_handler("Why is the sky blue?".to_string(), &context, handler.clone())
            .await
            .unwrap();

        assert_eq!(out, "Answer");
        assert_eq!(*handler.0.lock().unwrap(), ["Answer"]);
    }
}
