//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! | Variant | Status | Body |
//! |---------|--------|------|
//! | `NotFound` | 404 | none |
//! | `Validation` | 400 | `[{"property":..,"message":..}]` |
//! | `Decode` | 400 | parser diagnostic |
//! | `InvalidPatchValue` | 400 | `"<value> is not a valid interest"` |
//! | `PayloadTooLarge` | 413 | none |
//! | `UnreadableBody`, `Store` | 500 | none |

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use driver_core::validate::ConstraintViolation;
use serde_json::error::Category;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found")]
  NotFound,

  #[error("{} constraint violation(s) in {context}", violations.len())]
  Validation {
    context:    &'static str,
    violations: Vec<ConstraintViolation>,
  },

  #[error("malformed request: {0}")]
  Decode(String),

  #[error("{0} is not a valid interest")]
  InvalidPatchValue(String),

  #[error("request body too large")]
  PayloadTooLarge,

  #[error("unreadable request body: {0}")]
  UnreadableBody(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    ApiError::Store(Box::new(e))
  }
}

impl From<serde_json::Error> for ApiError {
  fn from(e: serde_json::Error) -> Self {
    match e.classify() {
      Category::Syntax | Category::Data | Category::Eof => {
        ApiError::Decode(e.to_string())
      }
      Category::Io => ApiError::UnreadableBody(e.to_string()),
    }
  }
}

impl From<driver_core::Error> for ApiError {
  fn from(e: driver_core::Error) -> Self {
    match e {
      driver_core::Error::InvalidInterest(value) => {
        ApiError::InvalidPatchValue(value)
      }
      other => ApiError::Decode(other.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
      ApiError::Validation {
        context,
        violations,
      } => {
        let violations: Vec<_> = violations
          .into_iter()
          .map(|v| v.strip_context(context))
          .collect();
        (StatusCode::BAD_REQUEST, Json(violations)).into_response()
      }
      ApiError::Decode(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
      e @ ApiError::InvalidPatchValue(_) => {
        (StatusCode::BAD_REQUEST, e.to_string()).into_response()
      }
      ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE.into_response(),
      e @ (ApiError::UnreadableBody(_) | ApiError::Store(_)) => {
        tracing::warn!(error = %e, "request failed");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
      }
    }
  }
}
