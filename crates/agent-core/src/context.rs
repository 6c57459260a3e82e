//! Execution context for agents
//!
//! Per-attempt metadata handed down from the orchestrator so agents can tag
//! their logs with the attempt they belong to.

use serde_json::{Value, json};
use std::collections::HashMap;

/// Well-known context keys
pub mod keys {
    /// 1-based attempt number within an orchestrator run
    pub const ATTEMPT: &str = "attempt";
    /// Label of the pipeline being run
    pub const PIPELINE: &str = "pipeline";
}

/// Context passed to agents during execution
///
/// # Example
///
/// ```
/// use agent_core::Context;
///
/// let ctx = Context::new()
///     .with_attempt(2)
///     .with_pipeline("news research");
///
/// assert_eq!(ctx.attempt(), Some(2));
/// assert_eq!(ctx.pipeline(), Some("news research"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    data: HashMap<String, Value>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attempt number
    pub fn with_attempt(mut self, attempt: usize) -> Self {
        self.insert(keys::ATTEMPT, json!(attempt));
        self
    }

    /// Set the pipeline label
    pub fn with_pipeline(mut self, label: impl Into<String>) -> Self {
        self.insert(keys::PIPELINE, json!(label.into()));
        self
    }

    /// Attempt number, if set
    pub fn attempt(&self) -> Option<usize> {
        self.get(keys::ATTEMPT)
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
    }

    /// Pipeline label, if set
    pub fn pipeline(&self) -> Option<&str> {
        self.get(keys::PIPELINE).and_then(Value::as_str)
    }

    /// Insert a value into the context
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.data.insert(key.into(), value);
    }

    /// Get a value from the context
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Number of entries in the context
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the context is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
