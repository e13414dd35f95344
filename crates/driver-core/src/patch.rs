//! Partial updates expressed as a list of [`PatchOperation`]s.
//!
//! Operations are applied in three fixed phases, whatever order the client
//! sent them in: every `replace`, then every `add`, then every `remove`.
//! Removals therefore observe the list produced by the add phase, and
//! successive removals accumulate.
//!
//! The engine performs no I/O and no validation; the patched record is
//! validated when it is persisted.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, code::Interest, driver::Driver};

pub const NACHNAME_PATH: &str = "/nachname";
pub const EMAIL_PATH: &str = "/email";
pub const INTERESSEN_PATH: &str = "/interessen";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
  Replace,
  Add,
  Remove,
}

/// A single field-level change, as received in a PATCH body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchOperation {
  pub op:    PatchOp,
  pub path:  String,
  pub value: String,
}

impl PatchOperation {
  pub fn new(op: PatchOp, path: &str, value: &str) -> Self {
    Self {
      op,
      path: path.to_owned(),
      value: value.to_owned(),
    }
  }
}

/// Apply `operations` to `driver`, returning the patched record.
///
/// Fails with [`Error::InvalidInterest`] if any `add`/`remove` on
/// `/interessen` carries a value that is not an interest code or name; no
/// partial result is returned in that case.
pub fn apply(driver: Driver, operations: &[PatchOperation]) -> Result<Driver> {
  let phase = |op: PatchOp| operations.iter().filter(move |o| o.op == op);

  let driver = phase(PatchOp::Replace).fold(driver, replace);
  let driver = phase(PatchOp::Add).try_fold(driver, add)?;
  phase(PatchOp::Remove).try_fold(driver, remove)
}

fn replace(driver: Driver, op: &PatchOperation) -> Driver {
  match op.path.as_str() {
    NACHNAME_PATH => driver.with_nachname(op.value.as_str()),
    EMAIL_PATH => driver.with_email(op.value.as_str()),
    _ => driver,
  }
}

fn add(driver: Driver, op: &PatchOperation) -> Result<Driver> {
  if op.path != INTERESSEN_PATH {
    return Ok(driver);
  }
  let interest = parse_interest(&op.value)?;
  let mut interests = driver.interests.clone().unwrap_or_default();
  interests.push(interest);
  Ok(driver.with_interests(Some(interests)))
}

fn remove(driver: Driver, op: &PatchOperation) -> Result<Driver> {
  if op.path != INTERESSEN_PATH {
    return Ok(driver);
  }
  let interest = parse_interest(&op.value)?;
  let interests = driver
    .interests
    .clone()
    .map(|list| list.into_iter().filter(|i| *i != interest).collect());
  Ok(driver.with_interests(interests))
}

fn parse_interest(value: &str) -> Result<Interest> {
  Interest::parse(value).ok_or_else(|| Error::InvalidInterest(value.to_owned()))
}
