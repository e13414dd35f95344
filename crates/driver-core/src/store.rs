//! The `DriverStore` trait and the [`Criteria`] search type.
//!
//! The trait is implemented by storage backends (`driver-store-sqlite`,
//! `driver-store-mock`). The HTTP layer depends on this abstraction, not on
//! any concrete backend. The store owns id generation and is the sole writer
//! of persisted state.

use std::future::Future;

use futures_util::stream::BoxStream;

use crate::driver::{Driver, DriverId};

// ─── Criteria ────────────────────────────────────────────────────────────────

/// Query-parameter key for an exact email match.
pub const EMAIL_KEY: &str = "email";
/// Query-parameter key for a surname search.
pub const NACHNAME_KEY: &str = "nachname";

/// A search, resolved from raw query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criteria {
  /// No parameters at all.
  All,
  /// Exact match on the email address; at most one record.
  Email(String),
  /// Surname search. The match rule (exact or prefix) belongs to the store.
  Nachname(String),
  /// A key was repeated, or no key was recognised. Matches nothing.
  Unsatisfiable,
}

impl Criteria {
  /// Resolve `params` (in request order, duplicates kept).
  ///
  /// - no parameters ⇒ [`Criteria::All`]
  /// - any key given more than once ⇒ [`Criteria::Unsatisfiable`]
  /// - otherwise the first recognised key, in request order, wins
  pub fn from_params<I, K, V>(params: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for (key, value) in params {
      let key = key.into();
      match grouped.iter_mut().find(|(k, _)| *k == key) {
        Some((_, values)) => values.push(value.into()),
        None => grouped.push((key, vec![value.into()])),
      }
    }

    if grouped.is_empty() {
      return Self::All;
    }
    if grouped.iter().any(|(_, values)| values.len() != 1) {
      return Self::Unsatisfiable;
    }

    grouped
      .into_iter()
      .find_map(|(key, mut values)| match key.as_str() {
        EMAIL_KEY => values.pop().map(Self::Email),
        NACHNAME_KEY => values.pop().map(Self::Nachname),
        _ => None,
      })
      .unwrap_or(Self::Unsatisfiable)
  }

  /// Whether a hit is a single record rather than a list.
  pub fn is_single(&self) -> bool { matches!(self, Self::Email(_)) }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a driver store backend.
///
/// Reads return zero-or-one record or a sequence; writes never mutate a record
/// in place but persist a new value. All methods return `Send` futures so the
/// trait can be used behind `axum` on a multi-threaded runtime.
pub trait DriverStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Retrieve a driver by id. Returns `None` if not found.
  fn find_by_id(
    &self,
    id: DriverId,
  ) -> impl Future<Output = Result<Option<Driver>, Self::Error>> + Send + '_;

  /// Run a resolved search. [`Criteria::All`] is equivalent to collecting
  /// [`find_all`](Self::find_all); [`Criteria::Unsatisfiable`] yields nothing.
  fn find<'a>(
    &'a self,
    criteria: &'a Criteria,
  ) -> impl Future<Output = Result<Vec<Driver>, Self::Error>> + Send + 'a;

  /// Every driver, lazily, in the store's natural order.
  ///
  /// The stream owns whatever it needs to keep iterating; dropping it releases
  /// those resources. It produces the next record only when polled.
  fn find_all(&self) -> BoxStream<'static, Result<Driver, Self::Error>>;

  /// Persist a new driver under a freshly generated id, ignoring any id the
  /// input carries. Returns the stored record.
  fn create(
    &self,
    driver: Driver,
  ) -> impl Future<Output = Result<Driver, Self::Error>> + Send + '_;

  /// Replace the driver stored under `id`. The stored record always carries
  /// `id`, whatever id `driver` has. Returns `None` if nothing is stored under
  /// `id`.
  fn update(
    &self,
    id: DriverId,
    driver: Driver,
  ) -> impl Future<Output = Result<Option<Driver>, Self::Error>> + Send + '_;

  /// Remove the driver with `id`. Removing an absent id is not an error.
  fn delete_by_id(
    &self,
    id: DriverId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove the driver(s) registered under `email`. Idempotent.
  fn delete_by_email(
    &self,
    email: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

#[cfg(test)]
mod tests {
  use super::*;

  fn resolve(pairs: &[(&str, &str)]) -> Criteria {
    Criteria::from_params(pairs.iter().copied())
  }

  #[test]
  fn empty_params_mean_all() {
    assert_eq!(resolve(&[]), Criteria::All);
  }

  #[test]
  fn repeated_key_is_unsatisfiable_regardless_of_values() {
    assert_eq!(
      resolve(&[("nachname", "Alpha"), ("nachname", "Beta")]),
      Criteria::Unsatisfiable
    );
    assert_eq!(
      resolve(&[("email", "a@b.de"), ("foo", "1"), ("foo", "1")]),
      Criteria::Unsatisfiable
    );
  }

  #[test]
  fn recognised_keys() {
    assert_eq!(
      resolve(&[("email", "a@b.de")]),
      Criteria::Email("a@b.de".into())
    );
    assert_eq!(
      resolve(&[("nachname", "Alpha")]),
      Criteria::Nachname("Alpha".into())
    );
  }

  #[test]
  fn first_recognised_key_wins() {
    assert_eq!(
      resolve(&[("foo", "x"), ("nachname", "Alpha"), ("email", "a@b.de")]),
      Criteria::Nachname("Alpha".into())
    );
  }

  #[test]
  fn only_unknown_keys_are_unsatisfiable() {
    assert_eq!(resolve(&[("kategorie", "3")]), Criteria::Unsatisfiable);
  }

  #[test]
  fn email_search_is_single() {
    assert!(Criteria::Email("a@b.de".into()).is_single());
    assert!(!Criteria::Nachname("A".into()).is_single());
  }
}
