//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// Trait for LLM providers
///
/// Implementations must report transport deadlines as
/// [`LLMError::Timeout`](crate::LLMError::Timeout) so callers can tell
/// transient failures apart from persistent ones.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion from the LLM
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Get the provider name (e.g., "openai", "groq")
    fn name(&self) -> &str;
}
