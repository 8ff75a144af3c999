//! docbot: backend for a document question-answering assistant
//!
//! Clients upload documents into an in-memory registry, list them, and ask
//! questions either about selected documents (`/api/chat`) or as free text
//! (`/api/query`). Answers come from a pluggable `LlmProvider`; the default
//! placeholder provider replies without any external service.

pub mod chat;
pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod server;
pub mod storage;
pub mod types;

pub use config::{DocbotConfig, ProviderKind, ReferencePolicy};
pub use error::{Error, Result};
pub use server::{build_router, state::AppState, DocbotServer};
pub use storage::DocumentRegistry;
pub use types::{
    document::{Document, DocumentSummary},
    query::{ChatRequest, QueryRequest},
    response::{ChatResponse, QueryResponse, UploadResponse},
};
