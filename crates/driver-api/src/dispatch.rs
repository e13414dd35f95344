//! Request routing by representation, method, and path shape.
//!
//! Every request under the resource root is matched against [`ROUTES`], an
//! ordered table evaluated top to bottom. A rule fires when the method and
//! path shape agree and its negotiation predicate admits the request headers.
//! The first matching rule wins; no match means 404.
//!
//! | Negotiation | Method | Path | Route |
//! |-------------|--------|------|-------|
//! | accepts `application/hal+json` | `GET` | `/` | [`Route::Find`] |
//! | accepts `application/hal+json` | `GET` | `/{id}` | [`Route::FindById`] |
//! | sends `application/json` | `POST` | `/` | [`Route::Create`] |
//! | sends `application/json` | `PUT` | `/{id}` | [`Route::Update`] |
//! | sends `application/json` | `PATCH` | `/{id}` | [`Route::Patch`] |
//! | any | `DELETE` | `/{id}` | [`Route::DeleteById`] |
//! | any | `DELETE` | `/` | [`Route::DeleteByEmail`] |
//! | accepts `text/event-stream` | `GET` | `/` | [`Route::Stream`] |
//! | accepts `text/html` | `GET` | `/home`, `/suche`, `/details` | pages |

use axum::http::{HeaderMap, Method, header};
use driver_core::driver::DriverId;

pub const HAL_JSON: &str = "application/hal+json";
pub const JSON: &str = "application/json";
pub const EVENT_STREAM: &str = "text/event-stream";
pub const HTML: &str = "text/html";

pub const HOME_PAGE: &str = "home";
pub const SEARCH_PAGE: &str = "suche";
pub const DETAILS_PAGE: &str = "details";

// ─── Targets ─────────────────────────────────────────────────────────────────

/// What a request path addresses, relative to the resource root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
  Root,
  Id(DriverId),
  Page(&'static str),
}

impl Target {
  /// Classify the single path segment below the root. A segment that is
  /// neither a page name nor a well-formed id addresses nothing.
  pub fn from_segment(segment: &str) -> Option<Self> {
    match segment {
      HOME_PAGE => Some(Self::Page(HOME_PAGE)),
      SEARCH_PAGE => Some(Self::Page(SEARCH_PAGE)),
      DETAILS_PAGE => Some(Self::Page(DETAILS_PAGE)),
      _ => DriverId::parse(segment).ok().map(Self::Id),
    }
  }
}

// ─── Decision table ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Negotiation {
  /// The `Accept` header admits this media type.
  Accepts(&'static str),
  /// The `Content-Type` header names this media type.
  Sends(&'static str),
  Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
  Root,
  Id,
  Page(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
  Find,
  FindById,
  Create,
  Update,
  Patch,
  DeleteById,
  DeleteByEmail,
  Stream,
  Home,
  Search,
  Details,
}

#[derive(Debug)]
pub struct Rule {
  pub negotiation: Negotiation,
  pub method:      &'static str,
  pub shape:       Shape,
  pub route:       Route,
}

const fn rule(
  negotiation: Negotiation,
  method: &'static str,
  shape: Shape,
  route: Route,
) -> Rule {
  Rule {
    negotiation,
    method,
    shape,
    route,
  }
}

pub static ROUTES: &[Rule] = &[
  rule(Negotiation::Accepts(HAL_JSON), "GET", Shape::Root, Route::Find),
  rule(Negotiation::Accepts(HAL_JSON), "GET", Shape::Id, Route::FindById),
  rule(Negotiation::Sends(JSON), "POST", Shape::Root, Route::Create),
  rule(Negotiation::Sends(JSON), "PUT", Shape::Id, Route::Update),
  rule(Negotiation::Sends(JSON), "PATCH", Shape::Id, Route::Patch),
  rule(Negotiation::Any, "DELETE", Shape::Id, Route::DeleteById),
  rule(Negotiation::Any, "DELETE", Shape::Root, Route::DeleteByEmail),
  rule(Negotiation::Accepts(EVENT_STREAM), "GET", Shape::Root, Route::Stream),
  rule(Negotiation::Accepts(HTML), "GET", Shape::Page(HOME_PAGE), Route::Home),
  rule(Negotiation::Accepts(HTML), "GET", Shape::Page(SEARCH_PAGE), Route::Search),
  rule(Negotiation::Accepts(HTML), "GET", Shape::Page(DETAILS_PAGE), Route::Details),
];

/// Pick the route for a request, or `None` if no rule matches.
pub fn resolve(method: &Method, target: &Target, headers: &HeaderMap) -> Option<Route> {
  ROUTES
    .iter()
    .find(|rule| {
      rule.method == method.as_str()
        && rule.shape.fits(target)
        && rule.negotiation.admits(headers)
    })
    .map(|rule| rule.route)
}

impl Shape {
  fn fits(self, target: &Target) -> bool {
    match (self, target) {
      (Shape::Root, Target::Root) | (Shape::Id, Target::Id(_)) => true,
      (Shape::Page(want), Target::Page(got)) => want == *got,
      _ => false,
    }
  }
}

impl Negotiation {
  fn admits(self, headers: &HeaderMap) -> bool {
    match self {
      Negotiation::Any => true,
      Negotiation::Accepts(media) => accepts(headers, media),
      Negotiation::Sends(media) => headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| essence(v).eq_ignore_ascii_case(media)),
    }
  }
}

// ─── Media types ─────────────────────────────────────────────────────────────

/// `type/subtype` without parameters.
fn essence(media: &str) -> &str {
  media.split(';').next().unwrap_or_default().trim()
}

/// Whether `Accept` admits `media`. A missing header admits everything;
/// ranges with `q=0` admit nothing.
fn accepts(headers: &HeaderMap, media: &str) -> bool {
  let values: Vec<&str> = headers
    .get_all(header::ACCEPT)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .collect();
  if values.is_empty() {
    return true;
  }

  values
    .iter()
    .flat_map(|v| v.split(','))
    .filter(|range| !refused(range))
    .any(|range| range_matches(essence(range), media))
}

fn refused(range: &str) -> bool {
  range.split(';').skip(1).any(|param| {
    let Some((key, value)) = param.split_once('=') else {
      return false;
    };
    key.trim().eq_ignore_ascii_case("q")
      && value.trim().parse::<f32>().is_ok_and(|q| q <= 0.0)
  })
}

fn range_matches(range: &str, media: &str) -> bool {
  let Some((range_type, range_sub)) = range.split_once('/') else {
    return false;
  };
  let Some((media_type, media_sub)) = media.split_once('/') else {
    return false;
  };
  (range_type == "*" || range_type.eq_ignore_ascii_case(media_type))
    && (range_sub == "*" || range_sub.eq_ignore_ascii_case(media_sub))
}
