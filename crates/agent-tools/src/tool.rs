//! Tool trait definition

use agent_core::Result;
use async_trait::async_trait;
use serde_json::Value;

/// A function the LLM can call
///
/// Implementations should report recoverable problems (bad API key, empty
/// result set) inside their output so the model can read them, and reserve
/// `Err` for malformed input.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with arguments matching [`Tool::input_schema`]
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Unique name, as the model will reference it
    fn name(&self) -> &str;

    /// When the model should reach for this tool
    fn description(&self) -> &str;

    /// JSON Schema of the arguments object
    ///
    /// ```
    /// use serde_json::json;
    ///
    /// let schema = json!({
    ///     "type": "object",
    ///     "properties": { "query": { "type": "string" } },
    ///     "required": ["query"]
    /// });
    /// assert_eq!(schema["required"][0], "query");
    /// ```
    fn input_schema(&self) -> Value;
}

/// Text the model sees for a tool output
///
/// Strings pass through untouched; anything else is rendered as JSON.
pub fn render_output(output: &Value) -> String {
    match output {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_output() {
        assert_eq!(render_output(&json!("Title: x")), "Title: x");
        assert_eq!(render_output(&json!({"n": 1})), r#"{"n":1}"#);
    }
}
