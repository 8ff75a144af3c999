//! Upload validation and admission into the registry

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::LimitsConfig;
use crate::error::{Error, Result};
use crate::storage::DocumentRegistry;

/// Reference to an admitted document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReceipt {
    /// Identity the document is stored under
    pub identity: String,
    /// Stored size in bytes
    pub size: usize,
}

/// Validates uploads and writes them to the registry.
///
/// Admission is all-or-nothing: the registry is only touched after the whole
/// payload has been read and every check has passed.
#[derive(Clone)]
pub struct IngestionService {
    registry: Arc<DocumentRegistry>,
    max_upload_bytes: usize,
}

impl IngestionService {
    pub fn new(registry: Arc<DocumentRegistry>, max_upload_bytes: usize) -> Self {
        Self {
            registry,
            max_upload_bytes,
        }
    }

    pub fn from_limits(registry: Arc<DocumentRegistry>, limits: &LimitsConfig) -> Self {
        Self::new(registry, limits.max_upload_bytes())
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Admit a fully buffered upload
    pub fn ingest(
        &self,
        filename: &str,
        data: impl Into<Bytes>,
        content_type: Option<String>,
    ) -> Result<IngestReceipt> {
        self.check_filename(filename)?;
        let data = data.into();
        self.check_size(filename, data.len())?;
        self.admit(filename, data, content_type)
    }

    /// Admit an upload read from a fallible chunk stream.
    ///
    /// The size limit is checked as chunks arrive, so an oversized upload is
    /// rejected without buffering all of it. A read error fails the upload
    /// with the error it converts into and leaves the registry unchanged.
    pub async fn ingest_stream<S, E>(
        &self,
        filename: &str,
        stream: S,
        content_type: Option<String>,
    ) -> Result<IngestReceipt>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        E: Into<Error>,
    {
        self.check_filename(filename)?;

        let mut stream = std::pin::pin!(stream);
        let mut buffer = BytesMut::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                let e: Error = e.into();
                tracing::warn!("Failed to read upload '{}': {}", filename, e);
                e
            })?;
            self.check_size(filename, buffer.len() + chunk.len())?;
            buffer.extend_from_slice(&chunk);
        }

        self.admit(filename, buffer.freeze(), content_type)
    }

    fn check_filename(&self, filename: &str) -> Result<()> {
        if filename.trim().is_empty() {
            return Err(Error::EmptyFilename);
        }
        Ok(())
    }

    fn check_size(&self, filename: &str, size: usize) -> Result<()> {
        if size > self.max_upload_bytes {
            tracing::warn!(
                "Rejected upload '{}': more than {} bytes",
                filename,
                self.max_upload_bytes
            );
            return Err(Error::PayloadTooLarge {
                filename: Some(filename.to_string()),
                limit: self.max_upload_bytes,
            });
        }
        Ok(())
    }

    fn admit(&self, filename: &str, data: Bytes, content_type: Option<String>) -> Result<IngestReceipt> {
        let doc = self.registry.put(filename, data, content_type)?;

        tracing::info!(
            "Stored document '{}' ({} bytes, {}); registry holds {} document(s), {} bytes",
            doc.identity(),
            doc.size(),
            doc.content_type().unwrap_or("unknown type"),
            self.registry.len(),
            self.registry.total_bytes()
        );

        Ok(IngestReceipt {
            identity: doc.identity().to_string(),
            size: doc.size(),
        })
    }
}
