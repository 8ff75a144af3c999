//! Core types for the DocBot service

pub mod document;
pub mod query;
pub mod response;

pub use document::{Document, DocumentSummary};
pub use query::{ChatRequest, QueryRequest};
pub use response::{
    BannerResponse, ChatResponse, DocumentListResponse, HealthResponse, QueryResponse,
    UploadResponse,
};
