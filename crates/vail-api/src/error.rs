//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error body carries a machine-readable `code` and a human `detail`;
//! parameter errors also name the offending `field`.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("invalid {field} parameter: {detail}")]
  InvalidParameter { field: &'static str, detail: String },

  #[error("unavailable: {0}")]
  Unavailable(String),

  #[error("timed out: {0}")]
  Timeout(String),

  #[error("internal error: {0}")]
  Internal(String),
}

impl From<vail_core::Error> for ApiError {
  fn from(err: vail_core::Error) -> Self {
    use vail_core::Error as E;
    match err {
      E::NotFound(_) => Self::NotFound("user not found".into()),
      E::InvalidParameter { field, detail } => Self::InvalidParameter { field, detail },
      E::StorageTransient(_) | E::Upstream(_) => Self::Unavailable(err.to_string()),
      E::DeadlineExceeded(_) => Self::Timeout(err.to_string()),
      E::SchemaConfiguration(_) => Self::Internal(err.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::NotFound(detail) => (
        StatusCode::NOT_FOUND,
        json!({ "code": "USER_NOT_FOUND", "detail": detail }),
      ),
      ApiError::InvalidParameter { field, detail } => (
        StatusCode::BAD_REQUEST,
        json!({ "code": "QUERY_PARAMETER_INVALID", "field": field, "detail": detail }),
      ),
      ApiError::Unavailable(detail) => (
        StatusCode::SERVICE_UNAVAILABLE,
        json!({ "code": "SERVICE_UNAVAILABLE", "detail": detail }),
      ),
      ApiError::Timeout(detail) => (
        StatusCode::GATEWAY_TIMEOUT,
        json!({ "code": "QUERY_TIMEOUT", "detail": detail }),
      ),
      ApiError::Internal(detail) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "code": "INTERNAL_ERROR", "detail": detail }),
      ),
    };

    if status.is_server_error() {
      warn!(%status, error = %self, "request failed");
    }
    (status, Json(body)).into_response()
  }
}
