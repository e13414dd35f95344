//! Read-only HTML pages: `/home`, `/suche` (every record), and
//! `/details?id=<id>`.

use axum::response::{Html, IntoResponse, Response};
use driver_core::{
  driver::{Driver, DriverId},
  store::DriverStore,
};
use futures_util::TryStreamExt as _;

use crate::{AppState, error::ApiError};

const ID_KEY: &str = "id";

fn page(title: &str, body: &str) -> Response {
  Html(format!(
    "<!DOCTYPE html>\n<html lang=\"de\">\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
     <body>\n<nav><a href=\"home\">Home</a> | <a href=\"suche\">Suche</a></nav>\n{body}\n</body>\n</html>\n"
  ))
  .into_response()
}

fn escape(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      c => out.push(c),
    }
  }
  out
}

/// `GET /home`
pub fn home() -> Response {
  page("Driver", "<h1>Driver</h1>\n<p>Verwaltung der Fahrer.</p>")
}

/// `GET /suche`
pub async fn search<S>(state: &AppState<S>) -> Result<Response, ApiError>
where
  S: DriverStore + Clone + 'static,
{
  let drivers: Vec<Driver> = state
    .store
    .find_all()
    .try_collect()
    .await
    .map_err(ApiError::store)?;

  let rows: String = drivers
    .iter()
    .map(|d| {
      let id = d.id.as_ref().map(DriverId::as_str).unwrap_or_default();
      format!(
        "<tr><td><a href=\"details?id={id}\">{id}</a></td><td>{}</td><td>{}</td></tr>\n",
        escape(&d.nachname),
        escape(&d.email),
      )
    })
    .collect();

  Ok(page(
    "Suche",
    &format!(
      "<h1>Suche</h1>\n<table>\n<tr><th>ID</th><th>Nachname</th><th>Email</th></tr>\n{rows}</table>"
    ),
  ))
}

/// `GET /details[?id=<id>]`; an absent, malformed, or unknown id renders
/// the page without a record.
pub async fn details<S>(
  state: &AppState<S>,
  params: Vec<(String, String)>,
) -> Result<Response, ApiError>
where
  S: DriverStore + Clone + 'static,
{
  let id = params
    .iter()
    .find(|(key, _)| key == ID_KEY)
    .and_then(|(_, value)| DriverId::parse(value).ok());

  let driver = match id {
    Some(id) => state.store.find_by_id(id).await.map_err(ApiError::store)?,
    None => None,
  };

  let body = match driver {
    Some(d) => format!(
      "<h1>Details</h1>\n<dl>\n<dt>ID</dt><dd>{}</dd>\n<dt>Nachname</dt><dd>{}</dd>\n\
       <dt>Email</dt><dd>{}</dd>\n<dt>Kategorie</dt><dd>{}</dd>\n\
       <dt>PLZ / Ort</dt><dd>{} {}</dd>\n</dl>",
      d.id.as_ref().map(DriverId::as_str).unwrap_or_default(),
      escape(&d.nachname),
      escape(&d.email),
      d.kategorie,
      escape(&d.address.postalcode),
      escape(&d.address.city),
    ),
    None => "<h1>Details</h1>\n<p>Kein Fahrer gefunden.</p>".to_owned(),
  };
  Ok(page("Details", &body))
}
