//! Per-attempt capture of agent diagnostics
//!
//! The orchestrator hands a fresh [`LogCapture`] to every attempt and shows
//! the collected text to the caller whether the attempt succeeds or not.

use agent_runtime::ExecutorEventHandler;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Mutex, PoisonError};

const PREVIEW_CHARS: usize = 200;

/// Thread-safe line buffer fed by executor events
#[derive(Debug, Default)]
pub struct LogCapture {
    lines: Mutex<Vec<String>>,
}

impl LogCapture {
    /// Create an empty capture
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line
    pub fn line(&self, line: impl Into<String>) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.into());
    }

    /// Captured lines, in order
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Captured text, one line per entry
    pub fn text(&self) -> String {
        self.lines().join("\n")
    }
}

fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        out.push_str("...");
    }
    out
}

#[async_trait]
impl ExecutorEventHandler for LogCapture {
    async fn on_iteration(&self, iteration: usize, max_iterations: usize) {
        self.line(format!("[step {iteration}/{max_iterations}] thinking"));
    }

    async fn on_tool_start(&self, _id: &str, name: &str, input: &Value) {
        self.line(format!("Using tool: {name} {input}"));
    }

    async fn on_tool_done(
        &self,
        _id: &str,
        name: &str,
        result: std::result::Result<&str, &str>,
        duration_ms: u64,
    ) {
        match result {
            Ok(output) => self.line(format!(
                "Tool {name} returned in {duration_ms}ms: {}",
                preview(output)
            )),
            Err(error) => self.line(format!("Tool {name} failed in {duration_ms}ms: {error}")),
        }
    }

    async fn on_complete(&self, result: &str) {
        self.line(format!("Final answer ({} chars)", result.chars().count()));
    }

    async fn on_error(&self, error: &str) {
        self.line(format!("Error: {error}"));
    }
}
