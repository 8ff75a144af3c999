//! Error types for the DocBot service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for DocBot operations
pub type Result<T> = std::result::Result<T, Error>;

/// DocBot service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Chat message is empty or whitespace
    #[error("Message cannot be empty")]
    EmptyMessage,

    /// Query text is empty or whitespace
    #[error("Query cannot be empty")]
    EmptyQuery,

    /// Upload carried no usable filename
    #[error("Filename cannot be empty")]
    EmptyFilename,

    /// Multipart upload without a file field
    #[error("No file provided in upload")]
    MissingFile,

    /// Malformed request that is not covered by a more specific variant
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Upload exceeds the configured size limit. `filename` is `None` when
    /// the body was cut off before a file field was reached.
    #[error("{} exceeds the upload limit of {limit} bytes", upload_label(.filename))]
    PayloadTooLarge {
        filename: Option<String>,
        limit: usize,
    },

    /// Registry already holds the configured maximum of documents
    #[error("Document limit of {limit} reached")]
    TooManyDocuments { limit: usize },

    /// Chat referenced documents that are not registered (strict policy)
    #[error("Unknown document reference(s): {}", missing.join(", "))]
    UnknownDocumentReference { missing: Vec<String> },

    /// Reading the uploaded payload failed
    #[error("Error uploading file: {0}")]
    IngestionFailed(String),

    /// The answer-generation backend failed
    #[error("Answer generation failed: {0}")]
    GenerationFailed(String),

    /// Generation did not finish before its deadline
    #[error("Answer generation cancelled after {0}s")]
    Cancelled(u64),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

fn upload_label(filename: &Option<String>) -> String {
    match filename {
        Some(name) => format!("File '{}'", name),
        None => "Upload".to_string(),
    }
}

impl Error {
    /// Create an ingestion error
    pub fn ingestion(message: impl Into<String>) -> Self {
        Self::IngestionFailed(message.into())
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::GenerationFailed(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// True for errors caused by the client's input
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::EmptyMessage
                | Error::EmptyQuery
                | Error::EmptyFilename
                | Error::MissingFile
                | Error::InvalidRequest(_)
        )
    }

    /// HTTP status and machine-readable kind
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            _ if self.is_validation() => (StatusCode::BAD_REQUEST, "validation_error"),
            Error::PayloadTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large"),
            Error::TooManyDocuments { .. } => (StatusCode::CONFLICT, "too_many_documents"),
            Error::UnknownDocumentReference { .. } => (StatusCode::NOT_FOUND, "unknown_document"),
            Error::IngestionFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ingestion_failed"),
            Error::GenerationFailed(_) => (StatusCode::BAD_GATEWAY, "generation_failed"),
            Error::Cancelled(_) => (StatusCode::GATEWAY_TIMEOUT, "cancelled"),
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(error_type, "{}", message);
        } else {
            tracing::debug!(error_type, "{}", message);
        }

        // `detail` is what the web client reads
        let body = Json(json!({
            "detail": message,
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_map_to_bad_request() {
        for err in [Error::EmptyMessage, Error::EmptyQuery, Error::EmptyFilename, Error::MissingFile] {
            assert!(err.is_validation());
            assert_eq!(err.status().0, StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_status_mapping() {
        let too_large = Error::PayloadTooLarge {
            filename: Some("big.bin".to_string()),
            limit: 10,
        };
        assert_eq!(too_large.status().0, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            too_large.to_string(),
            "File 'big.bin' exceeds the upload limit of 10 bytes"
        );
        assert_eq!(
            Error::TooManyDocuments { limit: 1 }.status().0,
            StatusCode::CONFLICT
        );
        assert_eq!(Error::ingestion("disk").status().0, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(Error::generation("down").status().0, StatusCode::BAD_GATEWAY);
        assert_eq!(Error::Cancelled(5).status().0, StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_oversized_body_without_filename() {
        let err = Error::PayloadTooLarge {
            filename: None,
            limit: 64,
        };
        assert_eq!(err.to_string(), "Upload exceeds the upload limit of 64 bytes");
    }

    #[test]
    fn test_unknown_reference_message_lists_names() {
        let err = Error::UnknownDocumentReference {
            missing: vec!["a.txt".to_string(), "b.pdf".to_string()],
        };
        assert_eq!(err.to_string(), "Unknown document reference(s): a.txt, b.pdf");
    }
}
