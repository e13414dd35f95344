//! Read handlers for the hypermedia JSON representation.
//!
//! An empty result is answered with 204, never 404.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use driver_core::{
  driver::DriverId,
  store::{Criteria, DriverStore},
};

use crate::{AppState, error::ApiError, handlers::hal_response, hateoas::Assembler};

/// `GET /{id}`
pub async fn find_by_id<S>(
  state: &AppState<S>,
  assembler: &Assembler,
  id: DriverId,
) -> Result<Response, ApiError>
where
  S: DriverStore + Clone + 'static,
{
  let found = state
    .store
    .find_by_id(id.clone())
    .await
    .map_err(ApiError::store)?;
  tracing::debug!(%id, found = found.is_some(), "find_by_id");

  Ok(match found {
    Some(driver) => hal_response(assembler.to_model(driver)),
    None => StatusCode::NO_CONTENT.into_response(),
  })
}

/// `GET /[?email=..|?nachname=..]`
///
/// An email search answers with a single record; every other search answers
/// with a list.
pub async fn find<S>(
  state: &AppState<S>,
  assembler: &Assembler,
  params: Vec<(String, String)>,
) -> Result<Response, ApiError>
where
  S: DriverStore + Clone + 'static,
{
  let criteria = Criteria::from_params(params);
  let found = state.store.find(&criteria).await.map_err(ApiError::store)?;
  tracing::debug!(?criteria, count = found.len(), "find");

  let mut models: Vec<_> =
    found.into_iter().map(|d| assembler.to_model(d)).collect();

  if criteria.is_single()
    && let Some(model) = models.pop()
  {
    return Ok(hal_response(model));
  }
  if models.is_empty() {
    return Ok(StatusCode::NO_CONTENT.into_response());
  }
  Ok(hal_response(models))
}
