use std::any::Any;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::infer::ApiError;
use crate::relay::dto::ChatReply;

/// The only failure text a caller ever sees.
pub const FAILURE_REPLY: &str = "เกิดข้อผิดพลาดจาก AI";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Bad Request: {0}")]
    BadRequest(Box<str>),
    #[error(transparent)]
    Upstream(#[from] ApiError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Stable name of the failure kind, for logs only.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::BadRequest(_) => "invalid_request",
            Error::Upstream(ApiError::RequestFailed(_)) => "upstream_unavailable",
            Error::Upstream(ApiError::Timeout(_)) => "upstream_timeout",
            Error::Upstream(ApiError::ErrorResponse { .. }) => "upstream_status",
            Error::Upstream(ApiError::ParseFailed(_) | ApiError::MissingContent) => {
                "upstream_malformed"
            }
            Error::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ChatReply::from(FAILURE_REPLY)),
        )
            .into_response()
    }
}

/// Used by the panic-catching layer so a panicking handler still answers with the
/// failure envelope.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    let error = Error::from(anyhow::anyhow!("Handler panicked: {}", detail));
    tracing::error!(kind = error.kind(), "{}", error);
    error.into_response()
}
