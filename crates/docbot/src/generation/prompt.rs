//! Context descriptors and prompt templates

use std::sync::Arc;

use crate::types::Document;

/// Which endpoint produced a context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Message with optional document references
    Chat,
    /// Bare query, never carries documents
    Query,
}

/// Everything the answer generator gets to see for one request
#[derive(Debug, Clone)]
pub struct ContextDescriptor {
    kind: RequestKind,
    message: String,
    documents: Vec<Arc<Document>>,
    missing: usize,
}

impl ContextDescriptor {
    /// Context for a chat message and the documents it resolved to
    pub fn chat(message: impl Into<String>, documents: Vec<Arc<Document>>, missing: usize) -> Self {
        Self {
            kind: RequestKind::Chat,
            message: message.into(),
            documents,
            missing,
        }
    }

    /// Context for a free-text query
    pub fn query(text: impl Into<String>) -> Self {
        Self {
            kind: RequestKind::Query,
            message: text.into(),
            documents: Vec::new(),
            missing: 0,
        }
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// The user's message or query text
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Documents that resolved against the registry
    pub fn documents(&self) -> &[Arc<Document>] {
        &self.documents
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Referenced names that were not found
    pub fn missing_count(&self) -> usize {
        self.missing
    }
}

/// Prompt builder for chat and query requests
pub struct PromptBuilder;

impl PromptBuilder {
    /// System instructions shared by every provider
    pub fn system_prompt() -> &'static str {
        "You are DocBot, an assistant that answers questions about documents the user has uploaded. \
         When document content is provided, base your answer on it and say so when the answer is not there. \
         Be concise."
    }

    /// Render the user turn for a context
    pub fn build(context: &ContextDescriptor, max_excerpt_chars: usize) -> String {
        match context.kind() {
            RequestKind::Query => format!("QUESTION: {}", context.message()),
            RequestKind::Chat if context.documents().is_empty() => {
                format!("MESSAGE: {}", context.message())
            }
            RequestKind::Chat => format!(
                "DOCUMENTS ({count}):\n\n{documents}\nMESSAGE: {message}",
                count = context.document_count(),
                documents = Self::build_documents(context.documents(), max_excerpt_chars),
                message = context.message()
            ),
        }
    }

    fn build_documents(documents: &[Arc<Document>], max_excerpt_chars: usize) -> String {
        let mut out = String::new();

        for (i, doc) in documents.iter().enumerate() {
            out.push_str(&format!(
                "[{}] {} ({} bytes, {})\n",
                i + 1,
                doc.identity(),
                doc.size(),
                doc.content_type().unwrap_or("unknown type")
            ));

            match doc.text() {
                Some(text) if !text.trim().is_empty() => {
                    out.push_str("Content:\n");
                    out.push_str(&truncate_chars(text, max_excerpt_chars));
                    out.push_str("\n\n---\n\n");
                }
                Some(_) => out.push_str("(empty document)\n\n---\n\n"),
                None => out.push_str("(binary content not shown)\n\n---\n\n"),
            }
        }

        out
    }
}

/// Truncate to at most `max_chars` characters, marking the cut
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
