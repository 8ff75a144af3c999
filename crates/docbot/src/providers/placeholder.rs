//! Placeholder provider
//!
//! Answers without any model so the API contract can be exercised before a
//! backend is attached.

use async_trait::async_trait;

use crate::error::Result;
use crate::generation::{ContextDescriptor, RequestKind};

use super::llm::LlmProvider;

#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderLlm;

impl PlaceholderLlm {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LlmProvider for PlaceholderLlm {
    async fn generate(&self, context: &ContextDescriptor) -> Result<String> {
        let answer = match context.kind() {
            RequestKind::Chat => {
                let file_context = match context.document_count() {
                    0 => String::new(),
                    n => format!(" (Context: {} document(s) uploaded)", n),
                };
                format!(
                    "You asked: '{}'{}\n\nThis is a placeholder response. \
                     I'm ready to help you with your documents once the LLM integration is complete!",
                    context.message(),
                    file_context
                )
            }
            RequestKind::Query => format!(
                "You asked: '{}'. This is a placeholder response. LLM integration coming soon!",
                context.message()
            ),
        };
        Ok(answer)
    }

    fn name(&self) -> &str {
        "placeholder"
    }

    fn model(&self) -> &str {
        "placeholder"
    }
}
