//! Enumerations that travel as short canonical codes.
//!
//! Each enumeration serialises to its code (`"S"`, `"M"`, ...) and is parsed
//! through a process-wide lookup table built once on first use. The table is
//! keyed by the code, the symbolic name, and the lowercase form of both, and is
//! never mutated after initialisation.

use std::{collections::HashMap, fmt, sync::LazyLock};

use serde::{Deserialize, Serialize};

use crate::Error;

/// An enumeration with a canonical short code and a symbolic name.
pub trait Coded: Copy + 'static {
  /// Human-readable kind, used in error messages.
  const KIND: &'static str;
  /// Every variant, in declaration order.
  const VARIANTS: &'static [Self];

  fn code(self) -> &'static str;
  fn name(self) -> &'static str;
}

/// Build the lookup table for `E`: code, name, and both lowercased.
fn lookup_table<E: Coded>() -> HashMap<String, E> {
  let mut table = HashMap::with_capacity(E::VARIANTS.len() * 4);
  for &variant in E::VARIANTS {
    table.insert(variant.code().to_owned(), variant);
    table.insert(variant.code().to_lowercase(), variant);
    table.insert(variant.name().to_owned(), variant);
    table.insert(variant.name().to_lowercase(), variant);
  }
  table
}

fn unknown<E: Coded>(value: String) -> Error {
  Error::UnknownCode { kind: E::KIND, value }
}

// ─── Sex ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Sex {
  Male,
  Female,
  Diverse,
}

impl Coded for Sex {
  const KIND: &'static str = "sex";
  const VARIANTS: &'static [Self] = &[Self::Male, Self::Female, Self::Diverse];

  fn code(self) -> &'static str {
    match self {
      Self::Male => "M",
      Self::Female => "F",
      Self::Diverse => "D",
    }
  }

  fn name(self) -> &'static str {
    match self {
      Self::Male => "MALE",
      Self::Female => "FEMALE",
      Self::Diverse => "DIVERSE",
    }
  }
}

impl Sex {
  /// Look up a variant by code or name, in either case. `None` if unknown.
  pub fn parse(value: &str) -> Option<Self> {
    static TABLE: LazyLock<HashMap<String, Sex>> =
      LazyLock::new(lookup_table::<Sex>);
    TABLE.get(value).copied()
  }
}

impl TryFrom<String> for Sex {
  type Error = Error;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Self::parse(&value).ok_or_else(|| unknown::<Self>(value))
  }
}

impl From<Sex> for &'static str {
  fn from(value: Sex) -> Self { value.code() }
}

// ─── MaritalStatus ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum MaritalStatus {
  Single,
  Married,
  Divorced,
  Widowed,
}

impl Coded for MaritalStatus {
  const KIND: &'static str = "marital status";
  const VARIANTS: &'static [Self] =
    &[Self::Single, Self::Married, Self::Divorced, Self::Widowed];

  fn code(self) -> &'static str {
    match self {
      Self::Single => "S",
      Self::Married => "M",
      Self::Divorced => "D",
      Self::Widowed => "W",
    }
  }

  fn name(self) -> &'static str {
    match self {
      Self::Single => "SINGLE",
      Self::Married => "MARRIED",
      Self::Divorced => "DIVORCED",
      Self::Widowed => "WIDOWED",
    }
  }
}

impl MaritalStatus {
  pub fn parse(value: &str) -> Option<Self> {
    static TABLE: LazyLock<HashMap<String, MaritalStatus>> =
      LazyLock::new(lookup_table::<MaritalStatus>);
    TABLE.get(value).copied()
  }
}

impl TryFrom<String> for MaritalStatus {
  type Error = Error;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Self::parse(&value).ok_or_else(|| unknown::<Self>(value))
  }
}

impl From<MaritalStatus> for &'static str {
  fn from(value: MaritalStatus) -> Self { value.code() }
}

// ─── Interest ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Interest {
  Sports,
  Lecture,
  Travel,
}

impl Coded for Interest {
  const KIND: &'static str = "interest";
  const VARIANTS: &'static [Self] = &[Self::Sports, Self::Lecture, Self::Travel];

  fn code(self) -> &'static str {
    match self {
      Self::Sports => "S",
      Self::Lecture => "L",
      Self::Travel => "T",
    }
  }

  fn name(self) -> &'static str {
    match self {
      Self::Sports => "SPORTS",
      Self::Lecture => "LECTURE",
      Self::Travel => "TRAVEL",
    }
  }
}

impl Interest {
  pub fn parse(value: &str) -> Option<Self> {
    static TABLE: LazyLock<HashMap<String, Interest>> =
      LazyLock::new(lookup_table::<Interest>);
    TABLE.get(value).copied()
  }
}

impl TryFrom<String> for Interest {
  type Error = Error;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Self::parse(&value).ok_or_else(|| unknown::<Self>(value))
  }
}

impl From<Interest> for &'static str {
  fn from(value: Interest) -> Self { value.code() }
}

impl fmt::Display for Interest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.code())
  }
}
