//! LLM provider trait definition

use crate::{ChatRequest, ChatResponse, Result};
use async_trait::async_trait;

/// Trait for LLM providers
///
/// Implementations of this trait provide access to different LLM services
/// (e.g., OpenAI, Ollama, LM Studio).
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion from the LLM
    ///
    /// # Arguments
    ///
    /// * `request` - The chat request with messages and parameters
    ///
    /// # Returns
    ///
    /// The completion response with the assistant's text and usage metadata
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Get the provider name (e.g., "openai")
    fn name(&self) -> &str;
}
