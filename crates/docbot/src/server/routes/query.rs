//! Query endpoint

use axum::extract::State;
use std::time::Instant;

use crate::error::Result;
use crate::server::extract::Json;
use crate::server::state::AppState;
use crate::types::{QueryRequest, QueryResponse};

/// POST /api/query - Answer a free-text query
pub async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    let start = Instant::now();
    let reply = state.query().query(&request).await?;

    tracing::info!("Query completed in {}ms", start.elapsed().as_millis());

    Ok(Json(reply))
}
