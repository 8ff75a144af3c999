//! Document upload endpoint

use axum::extract::State;
use futures::TryStreamExt;

use crate::error::{Error, Result};
use crate::server::extract::{multipart_error, Json, Multipart};
use crate::server::state::AppState;
use crate::types::UploadResponse;

/// Multipart form field carrying the document
pub const FILE_FIELD: &str = "file";

/// POST /api/upload - Store one document under its filename
pub async fn upload_file(
    State(state): State<AppState>,
    Multipart(mut multipart): Multipart,
) -> Result<Json<UploadResponse>> {
    let limit = state.ingestion().max_upload_bytes();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, None, limit))?
    {
        let is_file = field.name() == Some(FILE_FIELD) || field.file_name().is_some();
        if !is_file {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let chunks = field.map_err(|e| multipart_error(e, Some(&filename), limit));

        let receipt = state
            .ingestion()
            .ingest_stream(&filename, chunks, content_type)
            .await?;

        return Ok(Json(UploadResponse::success(receipt.identity, receipt.size)));
    }

    Err(Error::MissingFile)
}
