//! Write handlers: create, full replace, patch, and the two deletes.
//!
//! | Method | Path | Success | Failure |
//! |--------|------|---------|---------|
//! | `POST` | `/` | 201 + `Location` | 400 |
//! | `PUT` | `/{id}` | 204 | 400, 404 |
//! | `PATCH` | `/{id}` | 204 | 400, 404 |
//! | `DELETE` | `/{id}` | 204 | |
//! | `DELETE` | `/?email=` | 204 | 404 without `email` |

use axum::{
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use driver_core::{
  driver::{Driver, DriverId},
  patch::{self, PatchOperation},
  store::{DriverStore, EMAIL_KEY},
};

use crate::{
  AppState,
  error::ApiError,
  handlers::{CREATE_CONTEXT, UPDATE_CONTEXT, decode},
  hateoas::Assembler,
};

fn validated(driver: Driver, context: &'static str) -> Result<Driver, ApiError> {
  driver
    .check(context)
    .map_err(|violations| ApiError::Validation {
      context,
      violations,
    })?;
  Ok(driver)
}

/// `POST /`; any id in the payload is discarded by the store.
pub async fn create<S>(
  state: &AppState<S>,
  assembler: &Assembler,
  body: &[u8],
) -> Result<Response, ApiError>
where
  S: DriverStore + Clone + 'static,
{
  let driver = validated(decode(body)?, CREATE_CONTEXT)?;
  let created = state.store.create(driver).await.map_err(ApiError::store)?;

  let Some(id) = created.id else {
    return Err(ApiError::Store("store returned a record without an id".into()));
  };
  tracing::debug!(%id, "created driver");

  Ok(
    (StatusCode::CREATED, [(header::LOCATION, assembler.location(&id))])
      .into_response(),
  )
}

/// `PUT /{id}`; the path id wins over any id in the payload.
pub async fn update<S>(
  state: &AppState<S>,
  id: DriverId,
  body: &[u8],
) -> Result<Response, ApiError>
where
  S: DriverStore + Clone + 'static,
{
  let driver = validated(decode(body)?, UPDATE_CONTEXT)?;
  replace(state, id, driver).await
}

/// `PATCH /{id}` with a JSON array of operations.
pub async fn patch<S>(
  state: &AppState<S>,
  id: DriverId,
  body: &[u8],
) -> Result<Response, ApiError>
where
  S: DriverStore + Clone + 'static,
{
  let operations: Vec<PatchOperation> = decode(body)?;

  let current = state
    .store
    .find_by_id(id.clone())
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound)?;

  let patched = validated(patch::apply(current, &operations)?, UPDATE_CONTEXT)?;
  replace(state, id, patched).await
}

async fn replace<S>(
  state: &AppState<S>,
  id: DriverId,
  driver: Driver,
) -> Result<Response, ApiError>
where
  S: DriverStore + Clone + 'static,
{
  state
    .store
    .update(id.clone(), driver)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound)?;
  tracing::debug!(%id, "updated driver");
  Ok(StatusCode::NO_CONTENT.into_response())
}

/// `DELETE /{id}`; deleting an absent id still succeeds.
pub async fn delete_by_id<S>(
  state: &AppState<S>,
  id: DriverId,
) -> Result<Response, ApiError>
where
  S: DriverStore + Clone + 'static,
{
  state
    .store
    .delete_by_id(id.clone())
    .await
    .map_err(ApiError::store)?;
  tracing::debug!(%id, "deleted driver");
  Ok(StatusCode::NO_CONTENT.into_response())
}

/// `DELETE /?email=<email>`
pub async fn delete_by_email<S>(
  state: &AppState<S>,
  params: Vec<(String, String)>,
) -> Result<Response, ApiError>
where
  S: DriverStore + Clone + 'static,
{
  let email = params
    .into_iter()
    .find_map(|(key, value)| (key == EMAIL_KEY).then_some(value))
    .ok_or(ApiError::NotFound)?;

  state
    .store
    .delete_by_email(email.clone())
    .await
    .map_err(ApiError::store)?;
  tracing::debug!(%email, "deleted driver by email");
  Ok(StatusCode::NO_CONTENT.into_response())
}
