//! Request extractors whose rejections use the service error body
//!
//! axum's own `Json` and `Multipart` reject with plain-text responses; these
//! wrappers convert every rejection into an [`Error`] instead.

use axum::async_trait;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Error;

/// JSON body extractor and response
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        axum::Json::<T>::from_request(req, state)
            .await
            .map(|axum::Json(value)| Json(value))
            .map_err(Into::into)
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => Error::InvalidRequest(
                "Content-Type must be 'application/json'".to_string(),
            ),
            other => Error::InvalidRequest(other.body_text()),
        }
    }
}

/// Multipart form extractor
pub struct Multipart(pub axum::extract::Multipart);

#[async_trait]
impl<S> FromRequest<S> for Multipart
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        axum::extract::Multipart::from_request(req, state)
            .await
            .map(Multipart)
            .map_err(Into::into)
    }
}

impl From<MultipartRejection> for Error {
    fn from(rejection: MultipartRejection) -> Self {
        match rejection {
            MultipartRejection::InvalidBoundary(_) => Error::InvalidRequest(
                "Expected a multipart/form-data body with a boundary".to_string(),
            ),
            other => Error::InvalidRequest(other.body_text()),
        }
    }
}

/// Map a failure while reading multipart data.
///
/// Body-limit hits become `PayloadTooLarge`; anything else is an ingestion
/// failure.
pub fn multipart_error(err: MultipartError, filename: Option<&str>, limit: usize) -> Error {
    tracing::warn!("Failed to read multipart body: {}", err);
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return Error::PayloadTooLarge {
            filename: filename.map(str::to_string),
            limit,
        };
    }
    Error::ingestion(err.body_text())
}
