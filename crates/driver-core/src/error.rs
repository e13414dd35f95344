//! Error types for `driver-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("not a valid driver id: {0:?}")]
  InvalidId(String),

  #[error("{value:?} is not a valid {kind} code")]
  UnknownCode { kind: &'static str, value: String },

  /// Raised by the patch engine for an `add`/`remove` on `/interessen` whose
  /// value names no interest.
  #[error("{0} is not a valid interest")]
  InvalidInterest(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
