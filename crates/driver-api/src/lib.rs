//! HTTP layer for the driver resource.
//!
//! Exposes an axum [`Router`] backed by any [`DriverStore`]. Every request
//! under the root goes through one dispatcher that picks a handler from the
//! [`dispatch::ROUTES`] table by negotiated representation, method, and path.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/drivers", driver_api::router(state))
//! ```

pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod hateoas;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  body::Body,
  extract::{OriginalUri, Path, Query, Request, State},
  http::{StatusCode, Uri},
  response::{IntoResponse, Response},
  routing::any,
};
use bytes::Bytes;
use driver_core::store::DriverStore;
use http_body_util::LengthLimitError;
use serde::Deserialize;

use dispatch::{Route, Target};
use handlers::{html, mutation, query, stream};
use hateoas::Assembler;

/// Largest accepted request body.
pub const BODY_LIMIT: usize = 1024 * 1024;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Which [`DriverStore`] the server runs against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
  #[default]
  Sqlite,
  Mock,
}

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// Origin prepended to `Location` headers and `self` links.
  #[serde(default)]
  pub base_url:   String,
  #[serde(default)]
  pub backend:    Backend,
  pub store_path: PathBuf,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: DriverStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] serving the resource root and its members.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: DriverStore + Clone + 'static,
{
  Router::new()
    .route("/",          any(collection_handler::<S>))
    .route("/{segment}", any(member_handler::<S>))
    .with_state(state)
}

async fn collection_handler<S>(
  State(state): State<AppState<S>>,
  OriginalUri(original): OriginalUri,
  req: Request<Body>,
) -> Response
where
  S: DriverStore + Clone + 'static,
{
  handle(&state, Target::Root, &original, req).await.into_response_or_err()
}

async fn member_handler<S>(
  State(state): State<AppState<S>>,
  Path(segment): Path<String>,
  OriginalUri(original): OriginalUri,
  req: Request<Body>,
) -> Response
where
  S: DriverStore + Clone + 'static,
{
  let Some(target) = Target::from_segment(&segment) else {
    return StatusCode::NOT_FOUND.into_response();
  };
  handle(&state, target, &original, req).await.into_response_or_err()
}

// ─── Dispatch ────────────────────────────────────────────────────────────────

async fn handle<S>(
  state: &AppState<S>,
  target: Target,
  original: &Uri,
  req: Request<Body>,
) -> Result<Response, ApiError>
where
  S: DriverStore + Clone + 'static,
{
  let route = dispatch::resolve(req.method(), &target, req.headers())
    .ok_or(ApiError::NotFound)?;
  tracing::debug!(?route, method = %req.method(), uri = %req.uri(), "dispatch");

  let assembler = Assembler::new(&state.config.base_url, original.path(), &target);

  match (route, target) {
    (Route::Find, _) => query::find(state, &assembler, params(req.uri())?).await,
    (Route::FindById, Target::Id(id)) => {
      query::find_by_id(state, &assembler, id).await
    }
    (Route::Create, _) => {
      let body = collect_body(req).await?;
      mutation::create(state, &assembler, &body).await
    }
    (Route::Update, Target::Id(id)) => {
      let body = collect_body(req).await?;
      mutation::update(state, id, &body).await
    }
    (Route::Patch, Target::Id(id)) => {
      let body = collect_body(req).await?;
      mutation::patch(state, id, &body).await
    }
    (Route::DeleteById, Target::Id(id)) => mutation::delete_by_id(state, id).await,
    (Route::DeleteByEmail, _) => {
      mutation::delete_by_email(state, params(req.uri())?).await
    }
    (Route::Stream, _) => Ok(stream::find_all(state, assembler)),
    (Route::Home, _) => Ok(html::home()),
    (Route::Search, _) => html::search(state).await,
    (Route::Details, _) => html::details(state, params(req.uri())?).await,
    _ => Err(ApiError::NotFound),
  }
}

/// Query parameters in request order, duplicates kept.
fn params(uri: &Uri) -> Result<Vec<(String, String)>, ApiError> {
  let Query(params) = Query::<Vec<(String, String)>>::try_from_uri(uri)
    .map_err(|e| ApiError::Decode(e.body_text()))?;
  Ok(params)
}

/// 413 only when the limit was hit; any other read failure is a 500.
async fn collect_body(req: Request<Body>) -> Result<Bytes, ApiError> {
  axum::body::to_bytes(req.into_body(), BODY_LIMIT)
    .await
    .map_err(|e| match e.into_inner().downcast::<LengthLimitError>() {
      Ok(_) => ApiError::PayloadTooLarge,
      Err(e) => ApiError::UnreadableBody(e.to_string()),
    })
}

// ─── Helper trait ────────────────────────────────────────────────────────────

trait IntoResponseOrErr {
  fn into_response_or_err(self) -> Response;
}

impl IntoResponseOrErr for Result<Response, ApiError> {
  fn into_response_or_err(self) -> Response {
    match self {
      Ok(r) => r,
      Err(e) => e.into_response(),
    }
  }
}
