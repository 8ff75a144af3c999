//! Document listing endpoint

use axum::{extract::State, Json};

use crate::server::state::AppState;
use crate::types::DocumentListResponse;

/// GET /api/documents - List stored documents in upload order
pub async fn list_documents(State(state): State<AppState>) -> Json<DocumentListResponse> {
    Json(DocumentListResponse {
        documents: state.registry().list(),
    })
}
