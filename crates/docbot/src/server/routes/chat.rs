//! Chat endpoint

use axum::extract::State;

use crate::error::Result;
use crate::server::extract::Json;
use crate::server::state::AppState;
use crate::types::{ChatRequest, ChatResponse};

/// POST /api/chat - Answer a message about uploaded documents
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let reply = state.conversation().converse(&request).await?;
    Ok(Json(reply))
}
