//! Response types for the HTTP API

use serde::{Deserialize, Serialize};

use super::document::DocumentSummary;

/// Reply to a chat request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Reply to a free-text query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub response: String,
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Identity the document is stored under
    pub filename: String,
    /// Stored size in bytes
    pub size: usize,
    /// Human-readable status
    pub message: String,
}

impl UploadResponse {
    pub const SUCCESS_MESSAGE: &'static str = "File uploaded successfully";

    pub fn success(filename: impl Into<String>, size: usize) -> Self {
        Self {
            filename: filename.into(),
            size,
            message: Self::SUCCESS_MESSAGE.to_string(),
        }
    }
}

/// Document listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentSummary>,
}

/// Root banner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerResponse {
    pub message: String,
}

/// Service health and backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "healthy" when the process answers
    pub status: String,
    /// Configured generation provider
    pub provider: String,
    /// Configured model name
    pub model: String,
    /// Whether the provider's credentials are present
    pub credentials_configured: bool,
    /// Documents currently registered
    pub documents: usize,
}
