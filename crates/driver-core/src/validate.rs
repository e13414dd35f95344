//! Field constraints for [`Driver`](crate::driver::Driver) payloads.
//!
//! The declarative rules live on the model as `#[validate(...)]` attributes;
//! this module holds the patterns and custom checks they refer to, and
//! flattens `validator`'s nested error tree into a list of
//! [`ConstraintViolation`]s.

use std::{collections::HashSet, sync::LazyLock};

use chrono::{NaiveDate, Utc};
use regex::Regex;
use serde::Serialize;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::code::Interest;

// ─── Patterns ────────────────────────────────────────────────────────────────

/// A UUID-shaped identifier, either case.
pub static ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    "^[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}$",
  )
  .expect("id pattern")
});

/// A surname with an optional nobiliary prefix and an optional second,
/// hyphenated part.
pub static NACHNAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    "^(o'|von|von der|von und zu|van)?[A-ZÄÖÜ][a-zäöüß]+(-[A-ZÄÖÜ][a-zäöüß]+)?$",
  )
  .expect("surname pattern")
});

pub static POSTAL_CODE_PATTERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\d{5}$").expect("postal code pattern"));

pub static CURRENCY_PATTERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new("^[A-Z]{3}$").expect("currency pattern"));

// ─── Custom checks ───────────────────────────────────────────────────────────

pub fn past(date: &NaiveDate) -> Result<(), ValidationError> {
  if *date < Utc::now().date_naive() {
    Ok(())
  } else {
    Err(
      ValidationError::new("past")
        .with_message("birthdate must be in the past".into()),
    )
  }
}

pub fn unique_interests(interests: &[Interest]) -> Result<(), ValidationError> {
  let mut seen = HashSet::with_capacity(interests.len());
  if interests.iter().all(|i| seen.insert(*i)) {
    Ok(())
  } else {
    Err(
      ValidationError::new("unique_elements")
        .with_message("interests must not contain duplicates".into()),
    )
  }
}

// ─── Violations ──────────────────────────────────────────────────────────────

/// One violated constraint: the dotted property path and a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstraintViolation {
  pub property: String,
  pub message:  String,
}

impl ConstraintViolation {
  /// Drop a leading `context.` from the property path, if present.
  pub fn strip_context(mut self, context: &str) -> Self {
    if let Some(rest) = self
      .property
      .strip_prefix(context)
      .and_then(|r| r.strip_prefix('.'))
    {
      self.property = rest.to_owned();
    }
    self
  }
}

/// Flatten `errors` into violations whose paths start with `context`
/// (e.g. `"create.driver"` yields `"create.driver.address.postalcode"`).
///
/// Output is sorted by property so responses are deterministic.
pub fn violations(
  errors: &ValidationErrors,
  context: &str,
) -> Vec<ConstraintViolation> {
  let mut out = Vec::new();
  collect(errors, context, &mut out);
  out.sort_by(|a, b| {
    a.property.cmp(&b.property).then_with(|| a.message.cmp(&b.message))
  });
  out
}

fn collect(
  errors: &ValidationErrors,
  prefix: &str,
  out: &mut Vec<ConstraintViolation>,
) {
  for (field, kind) in errors.errors() {
    let path = if prefix.is_empty() {
      field.to_string()
    } else {
      format!("{prefix}.{field}")
    };
    match kind {
      ValidationErrorsKind::Field(list) => {
        out.extend(list.iter().map(|e| ConstraintViolation {
          property: path.clone(),
          message:  e
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| e.code.to_string()),
        }));
      }
      ValidationErrorsKind::Struct(nested) => collect(nested, &path, out),
      ValidationErrorsKind::List(items) => {
        for (index, nested) in items {
          collect(nested, &format!("{path}[{index}]"), out);
        }
      }
    }
  }
}
