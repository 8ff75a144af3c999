//! Answer-generation providers
//!
//! Every backend sits behind the `LlmProvider` trait; `build_provider` picks
//! one from configuration.

pub mod anthropic;
pub mod llm;
pub mod ollama;
pub mod openai;
pub mod placeholder;

pub use anthropic::AnthropicLlm;
pub use llm::LlmProvider;
pub use ollama::OllamaLlm;
pub use openai::OpenAiLlm;
pub use placeholder::PlaceholderLlm;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Response};

use crate::config::{LlmConfig, ProviderKind};
use crate::error::{Error, Result};

/// Instantiate the configured provider.
///
/// Missing credentials are not an error here; `/health` reports them and the
/// provider fails individual calls instead.
pub fn build_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>> {
    let provider: Arc<dyn LlmProvider> = match config.provider {
        ProviderKind::Placeholder => Arc::new(PlaceholderLlm::new()),
        ProviderKind::Ollama => Arc::new(OllamaLlm::new(config)?),
        ProviderKind::OpenAi => Arc::new(OpenAiLlm::new(config)?),
        ProviderKind::Anthropic => Arc::new(AnthropicLlm::new(config)?),
    };

    if !provider.has_credentials() {
        tracing::warn!(
            "No credentials configured for provider '{}'; generation requests will fail",
            config.provider
        );
    }

    Ok(provider)
}

pub(crate) fn build_http_client(config: &LlmConfig) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(config.timeout_secs))
        .pool_max_idle_per_host(5)
        .build()
        .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Turn a non-2xx reply into `GenerationFailed` with status and body
pub(crate) async fn check_status(provider: &str, response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    Err(Error::generation(format!(
        "{} returned HTTP {}: {}",
        provider, status, text
    )))
}
