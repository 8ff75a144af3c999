//! Anthropic messages API provider

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::generation::{ContextDescriptor, PromptBuilder};

use super::llm::LlmProvider;
use super::{build_http_client, check_status};

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicLlm {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    max_excerpt_chars: usize,
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Deserialize)]
struct AnthropicContent {
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicLlm {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config)?,
            base_url: config.base_url().to_string(),
            api_key: config.api_key().map(str::to_string),
            model: config.model_name().to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            max_excerpt_chars: config.max_excerpt_chars,
        })
    }
}

#[async_trait]
impl LlmProvider for AnthropicLlm {
    async fn generate(&self, context: &ContextDescriptor) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::generation("ANTHROPIC_API_KEY is not configured"))?;

        let body = AnthropicRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: PromptBuilder::system_prompt(),
            messages: vec![AnthropicMessage {
                role: "user",
                content: PromptBuilder::build(context, self.max_excerpt_chars),
            }],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::generation(format!("Anthropic request failed: {}", e)))?;

        let response = check_status("Anthropic", response).await?;

        let data: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| Error::generation(format!("Failed to parse Anthropic response: {}", e)))?;

        let text: String = data
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect();

        if text.is_empty() {
            return Err(Error::generation("Anthropic response contained no text"));
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }
}
