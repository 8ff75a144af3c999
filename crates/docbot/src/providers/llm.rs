//! LLM provider trait for generating answers

use async_trait::async_trait;

use crate::error::Result;
use crate::generation::ContextDescriptor;

/// Trait for answer generation
///
/// Implementations:
/// - `PlaceholderLlm`: fixed reply echoing the request, no model involved
/// - `OllamaLlm`: local Ollama server
/// - `OpenAiLlm`: OpenAI-compatible chat completions
/// - `AnthropicLlm`: Anthropic messages API
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Produce an answer for the given context
    async fn generate(&self, context: &ContextDescriptor) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;

    /// Whether the credentials this backend needs are present
    fn has_credentials(&self) -> bool {
        true
    }
}
