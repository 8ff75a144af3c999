//! In-memory document registry
//!
//! Owns every uploaded document for the lifetime of the process. A single
//! `RwLock` guards the map and the listing order together; documents are
//! immutable `Arc`s replaced whole, so a reader sees either the previous or
//! the new version of an entry.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::types::{Document, DocumentSummary};

/// Transient mapping from document identity to document
pub struct DocumentRegistry {
    inner: RwLock<RegistryInner>,
    max_documents: usize,
}

#[derive(Default)]
struct RegistryInner {
    documents: HashMap<String, Arc<Document>>,
    /// Identities in first-insertion order
    order: Vec<String>,
}

impl DocumentRegistry {
    /// Create an empty registry holding at most `max_documents` entries
    pub fn new(max_documents: usize) -> Self {
        Self {
            inner: RwLock::new(RegistryInner::default()),
            max_documents,
        }
    }

    /// Store or replace the document under `identity`.
    ///
    /// Replacing an existing identity always succeeds and keeps its listing
    /// position. A new identity is rejected once the registry is full.
    pub fn put(
        &self,
        identity: impl Into<String>,
        content: impl Into<Bytes>,
        content_type: Option<String>,
    ) -> Result<Arc<Document>> {
        let doc = Arc::new(Document::new(identity, content, content_type));
        let mut inner = self.inner.write();

        if inner.documents.contains_key(doc.identity()) {
            inner
                .documents
                .insert(doc.identity().to_string(), Arc::clone(&doc));
            tracing::debug!("Replaced document '{}' ({} bytes)", doc.identity(), doc.size());
            return Ok(doc);
        }

        if inner.documents.len() >= self.max_documents {
            return Err(Error::TooManyDocuments {
                limit: self.max_documents,
            });
        }

        inner.order.push(doc.identity().to_string());
        inner
            .documents
            .insert(doc.identity().to_string(), Arc::clone(&doc));
        Ok(doc)
    }

    /// Look up a document by identity
    pub fn get(&self, identity: &str) -> Option<Arc<Document>> {
        self.inner.read().documents.get(identity).cloned()
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.inner.read().documents.contains_key(identity)
    }

    /// Snapshot of `(name, size)` in insertion order
    pub fn list(&self) -> Vec<DocumentSummary> {
        let inner = self.inner.read();
        inner
            .order
            .iter()
            .filter_map(|identity| inner.documents.get(identity))
            .map(|doc| doc.summary())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of stored document sizes
    pub fn total_bytes(&self) -> usize {
        self.inner
            .read()
            .documents
            .values()
            .map(|doc| doc.size())
            .sum()
    }
}

impl Default for DocumentRegistry {
    fn default() -> Self {
        Self::new(crate::config::LimitsConfig::default().max_documents)
    }
}
