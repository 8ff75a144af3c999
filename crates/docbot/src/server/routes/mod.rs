//! API routes for the DocBot server

pub mod chat;
pub mod documents;
pub mod query;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use crate::server::state::AppState;

/// Allowance for multipart boundaries and headers on top of the file limit
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat::chat))
        // Upload - body limit sized from the configured file limit
        .route(
            "/upload",
            post(upload::upload_file)
                .layer(DefaultBodyLimit::max(max_upload_size.saturating_add(MULTIPART_OVERHEAD))),
        )
        .route("/documents", get(documents::list_documents))
        .route("/query", post(query::query))
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "docbot",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Document upload registry with chat and query endpoints",
        "endpoints": {
            "GET /health": "Service status and provider configuration",
            "POST /api/chat": "Ask about uploaded documents",
            "POST /api/upload": "Upload a document (multipart field 'file')",
            "GET /api/documents": "List uploaded documents",
            "POST /api/query": "Ask a free-text question"
        }
    }))
}
