//! Agent runtime for the news research crew
//!
//! This crate provides the runtime infrastructure for executing agents:
//! the AgentExecutor tool-calling loop, AgentRuntime for sharing the
//! provider and tools, and concrete agent implementations.

pub mod agents;
pub mod executor;
pub mod runtime;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export key types
pub use agents::{SimpleAgent, SimpleConfig, ToolAgent};
pub use executor::{
    AgentExecutor, AgentExecutorBuilder, ExecutorConfig, ExecutorEventHandler, NoOpEventHandler,
    map_llm_error,
};
pub use runtime::{AgentRuntime, AgentRuntimeBuilder, RuntimeConfig};
