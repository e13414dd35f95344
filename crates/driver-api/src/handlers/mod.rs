pub mod html;
pub mod mutation;
pub mod query;
pub mod stream;

use axum::{
  Json,
  http::header,
  response::{IntoResponse, Response},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{dispatch::HAL_JSON, error::ApiError};

/// Validation context for records arriving through `POST`.
pub(crate) const CREATE_CONTEXT: &str = "create.driver";
/// Validation context for records arriving through `PUT` or `PATCH`.
pub(crate) const UPDATE_CONTEXT: &str = "update.driver";

/// A JSON body labelled as `application/hal+json`.
pub(crate) fn hal_response<T: Serialize>(body: T) -> Response {
  ([(header::CONTENT_TYPE, HAL_JSON)], Json(body)).into_response()
}

pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
  Ok(serde_json::from_slice(body)?)
}
