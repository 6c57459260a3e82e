//! Agent executor for running agent loops
//!
//! The AgentExecutor drives one task to completion:
//! 1. Call the LLM with the conversation so far and the available tools
//! 2. If it asks for tools, run them and append their output
//! 3. Repeat until the model ends its turn or the iteration cap is hit

use agent_core::{Error, Result};
use agent_llm::{
    CompletionRequest, ContentBlock, LLMError, LLMProvider, Message, StopReason, ToolDefinition,
};
use agent_tools::{ToolRegistry, render_output};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Default model for new executors
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Event handler for agent execution events
///
/// Every hook has an empty default so handlers only override what they need.
#[async_trait]
pub trait ExecutorEventHandler: Send + Sync {
    /// Called at the top of every loop iteration (1-based)
    async fn on_iteration(&self, _iteration: usize, _max_iterations: usize) {}

    /// Called when a tool execution starts
    async fn on_tool_start(&self, _id: &str, _name: &str, _input: &Value) {}

    /// Called when a tool execution completes
    async fn on_tool_done(
        &self,
        _id: &str,
        _name: &str,
        _result: std::result::Result<&str, &str>,
        _duration_ms: u64,
    ) {
    }

    /// Called with the final answer
    async fn on_complete(&self, _result: &str) {}

    /// Called when the run fails
    async fn on_error(&self, _error: &str) {}
}

/// No-op event handler for when events are not needed
pub struct NoOpEventHandler;

#[async_trait]
impl ExecutorEventHandler for NoOpEventHandler {}

/// Configuration for agent execution
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum number of LLM calls for one task
    pub max_iterations: usize,

    /// Model to use
    pub model: String,

    /// System prompt
    pub system_prompt: Option<String>,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Temperature
    pub temperature: Option<f32>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 8,
            model: DEFAULT_MODEL.to_string(),
            system_prompt: None,
            max_tokens: agent_llm::completion::DEFAULT_MAX_TOKENS,
            temperature: Some(0.7),
        }
    }
}

/// Convert a provider error into the agent error space
///
/// The timeout class survives the conversion so callers can decide whether
/// to retry.
pub fn map_llm_error(err: LLMError) -> Error {
    if err.is_timeout() {
        Error::Timeout(err.to_string())
    } else {
        Error::ProcessingFailed(err.to_string())
    }
}

fn preview(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Executes an agent loop: LLM → tool calls → execution → loop back
pub struct AgentExecutor {
    provider: Arc<dyn LLMProvider>,
    tool_registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
    event_handler: Arc<dyn ExecutorEventHandler>,
}

impl AgentExecutor {
    /// Create a new agent executor
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        tool_registry: Arc<ToolRegistry>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            provider,
            tool_registry,
            config,
            event_handler: Arc::new(NoOpEventHandler),
        }
    }

    /// Set the default event handler
    pub fn with_event_handler(mut self, handler: Arc<dyn ExecutorEventHandler>) -> Self {
        self.event_handler = handler;
        self
    }

    /// Executor configuration
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Run a task with the default event handler
    pub async fn run(&self, user_message: String) -> Result<String> {
        self.run_with_handler(user_message, self.event_handler.clone())
            .await
    }

    /// Run a task, reporting events to `handler`
    pub async fn run_with_handler(
        &self,
        user_message: String,
        handler: Arc<dyn ExecutorEventHandler>,
    ) -> Result<String> {
        let result = self
            .run_loop(vec![Message::user(user_message)], handler.as_ref())
            .await;

        match &result {
            Ok(text) => handler.on_complete(text).await,
            Err(e) => handler.on_error(&e.to_string()).await,
        }

        result
    }

    async fn run_loop(
        &self,
        mut conversation: Vec<Message>,
        handler: &dyn ExecutorEventHandler,
    ) -> Result<String> {
        let tools = self.build_tool_definitions();
        let max_iterations = self.config.max_iterations.max(1);

        for iteration in 1..=max_iterations {
            handler.on_iteration(iteration, max_iterations).await;
            info!(
                iteration,
                max_iterations,
                model = %self.config.model,
                tool_count = tools.len(),
                "Agent iteration started"
            );

            let mut builder = CompletionRequest::builder(&self.config.model)
                .messages(conversation.clone())
                .max_tokens(self.config.max_tokens)
                .tools(tools.clone());
            if let Some(system) = &self.config.system_prompt {
                builder = builder.system(system.clone());
            }
            if let Some(temperature) = self.config.temperature {
                builder = builder.temperature(temperature);
            }

            let response = self
                .provider
                .complete(builder.build())
                .await
                .map_err(map_llm_error)?;

            info!(
                stop_reason = ?response.stop_reason,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                "LLM response received"
            );

            let text = response.message.text().unwrap_or_default().to_string();
            debug!(response_preview = %preview(&text, 300), "LLM response content preview");

            match response.stop_reason {
                StopReason::ToolUse if response.message.has_tool_uses() => {
                    let results = self.execute_tools(&response.message, handler).await;
                    conversation.push(response.message);
                    conversation.extend(results);
                }
                StopReason::ToolUse => {
                    warn!("Tool use requested without any tool calls");
                    return Self::final_text(text);
                }
                StopReason::MaxTokens => {
                    warn!("Hit max tokens in LLM response");
                    return Self::final_text(text);
                }
                StopReason::EndTurn | StopReason::StopSequence => {
                    info!(iteration, response_length = text.len(), "Agent completed");
                    return Self::final_text(text);
                }
            }
        }

        warn!(max_iterations, "Max iterations reached, stopping");
        Err(Error::ProcessingFailed(format!(
            "no final answer after {max_iterations} iterations"
        )))
    }

    fn final_text(text: String) -> Result<String> {
        if text.trim().is_empty() {
            Err(Error::ProcessingFailed(
                "model returned an empty answer".to_string(),
            ))
        } else {
            Ok(text)
        }
    }

    /// Tool definitions advertised to the model
    fn build_tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tool_registry
            .list_tools()
            .iter()
            .map(|tool| ToolDefinition::new(tool.name(), tool.description(), tool.input_schema()))
            .collect()
    }

    /// Run every tool call in `message`, in order
    ///
    /// Failures become error results the model can read; they never abort
    /// the loop.
    async fn execute_tools(
        &self,
        message: &Message,
        handler: &dyn ExecutorEventHandler,
    ) -> Vec<Message> {
        let mut results = Vec::new();

        for block in message.tool_uses() {
            let ContentBlock::ToolUse { id, name, input } = block else {
                continue;
            };

            info!(
                tool_name = %name,
                tool_id = %id,
                input_preview = %preview(&input.to_string(), 500),
                "Executing tool"
            );
            handler.on_tool_start(id, name, input).await;

            let started = Instant::now();
            let outcome = match self.tool_registry.get(name) {
                Some(tool) => tool
                    .execute(input.clone())
                    .await
                    .map(|value| render_output(&value))
                    .map_err(|e| e.to_string()),
                None => Err(format!("Tool not found: {name}")),
            };
            let duration_ms = started.elapsed().as_millis() as u64;

            match outcome {
                Ok(output) => {
                    info!(
                        tool_name = %name,
                        duration_ms,
                        result_length = output.len(),
                        "Tool execution succeeded"
                    );
                    handler
                        .on_tool_done(id, name, Ok(&output), duration_ms)
                        .await;
                    results.push(Message::tool_result(id.clone(), output));
                }
                Err(error) => {
                    warn!(tool_name = %name, duration_ms, %error, "Tool execution failed");
                    handler
                        .on_tool_done(id, name, Err(&error), duration_ms)
                        .await;
                    results.push(Message::tool_error(id.clone(), format!("Error: {error}")));
                }
            }
        }

        results
    }
}

/// Builder for AgentExecutor
pub struct AgentExecutorBuilder {
    provider: Option<Arc<dyn LLMProvider>>,
    tool_registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
    event_handler: Option<Arc<dyn ExecutorEventHandler>>,
}

impl AgentExecutorBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            provider: None,
            tool_registry: Arc::new(ToolRegistry::new()),
            config: ExecutorConfig::default(),
            event_handler: None,
        }
    }

    /// Set the LLM provider
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the tool registry
    pub fn tool_registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.tool_registry = registry;
        self
    }

    /// Set the full configuration
    pub fn config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set maximum iterations
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the system prompt
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Set temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    /// Set the default event handler
    pub fn event_handler(mut self, handler: Arc<dyn ExecutorEventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    /// Build the executor
    pub fn build(self) -> Result<AgentExecutor> {
        let provider = self
            .provider
            .ok_or_else(|| Error::InitializationFailed("Provider not set".to_string()))?;

        let executor = AgentExecutor::new(provider, self.tool_registry, self.config);
        Ok(match self.event_handler {
            Some(handler) => executor.with_event_handler(handler),
            None => executor,
        })
    }
}

impl Default for AgentExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
