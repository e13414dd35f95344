//! `GET /` as `text/event-stream`: one event per record.
//!
//! The store stream is polled only as fast as the connection drains it, and
//! dropping the response (client gone) drops the store stream with it.

use axum::{
  BoxError,
  response::{
    IntoResponse, Response,
    sse::{Event, Sse},
  },
};
use driver_core::store::DriverStore;
use futures_util::{StreamExt as _, TryStreamExt as _};

use crate::{AppState, hateoas::Assembler};

pub fn find_all<S>(state: &AppState<S>, assembler: Assembler) -> Response
where
  S: DriverStore + Clone + 'static,
{
  let events = state
    .store
    .find_all()
    .inspect_err(|e| tracing::warn!(error = %e, "driver stream failed"))
    .map(move |item| -> Result<Event, BoxError> {
      let model = assembler.to_model(item?);
      Ok(Event::default().json_data(model)?)
    });

  Sse::new(events).into_response()
}
