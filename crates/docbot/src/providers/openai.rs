//! OpenAI-compatible chat completions provider

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::generation::{ContextDescriptor, PromptBuilder};

use super::llm::LlmProvider;
use super::{build_http_client, check_status};

pub struct OpenAiLlm {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    max_excerpt_chars: usize,
}

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

impl OpenAiLlm {
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
impl LlmProvider for OpenAiLlm {
    async fn generate(&self, context: &ContextDescriptor) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::generation("OPENAI_API_KEY is not configured"))?;

        let body = OpenAiRequest {
            model: &self.model,
            messages: vec![
                OpenAiMessage {
                    role: "system".to_string(),
                    content: PromptBuilder::system_prompt().to_string(),
                },
                OpenAiMessage {
                    role: "user".to_string(),
                    content: PromptBuilder::build(context, self.max_excerpt_chars),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::generation(format!("OpenAI request failed: {}", e)))?;

        let response = check_status("OpenAI", response).await?;

        let data: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| Error::generation(format!("Failed to parse OpenAI response: {}", e)))?;

        data.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::generation("OpenAI response contained no choices"))
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }
}
