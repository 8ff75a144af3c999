use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ReferencePolicy;
use crate::error::{Error, Result};
use crate::generation::ContextDescriptor;
use crate::providers::LlmProvider;
use crate::storage::DocumentRegistry;
use crate::types::{ChatRequest, ChatResponse, Document};

/// Answers a message in the context of previously uploaded documents
#[derive(Clone)]
pub struct ConversationService {
    registry: Arc<DocumentRegistry>,
    provider: Arc<dyn LlmProvider>,
    policy: ReferencePolicy,
    timeout: Duration,
}

impl ConversationService {
    pub fn new(
        registry: Arc<DocumentRegistry>,
        provider: Arc<dyn LlmProvider>,
        policy: ReferencePolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            registry,
            provider,
            policy,
            timeout,
        }
    }

    /// Validate, resolve references, and ask the provider
    pub async fn converse(&self, request: &ChatRequest) -> Result<ChatResponse> {
        if request.message.trim().is_empty() {
            return Err(Error::EmptyMessage);
        }

        let (documents, missing) = self.resolve(&request.files);

        if !missing.is_empty() {
            match self.policy {
                ReferencePolicy::Strict => {
                    return Err(Error::UnknownDocumentReference { missing });
                }
                ReferencePolicy::Lenient => {
                    tracing::debug!("Ignoring {} unknown document reference(s)", missing.len());
                }
            }
        }

        tracing::info!(
            "Chat: {} chars, {} document(s) resolved",
            request.message.len(),
            documents.len()
        );

        let context = ContextDescriptor::chat(request.message.clone(), documents, missing.len());
        let response =
            super::generate_with_timeout(self.provider.as_ref(), &context, self.timeout).await?;

        Ok(ChatResponse { response })
    }

    /// Split requested names into registered documents and unknown names.
    ///
    /// Each name is looked up once; request order is preserved.
    fn resolve(&self, names: &[String]) -> (Vec<Arc<Document>>, Vec<String>) {
        let mut seen = HashSet::new();
        let mut documents = Vec::new();
        let mut missing = Vec::new();

        for name in names {
            if !seen.insert(name.as_str()) {
                continue;
            }
            match self.registry.get(name) {
                Some(doc) => documents.push(doc),
                None => missing.push(name.clone()),
            }
        }

        (documents, missing)
    }
}
