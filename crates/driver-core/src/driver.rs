//! The driver record, the resource this service exposes.
//!
//! A [`Driver`] is a value object: every change produces a new record through
//! one of the `with_*` constructors. Business equality is by email address,
//! independent of the store-assigned [`DriverId`].

use std::{
  fmt,
  hash::{Hash, Hasher},
};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};
use url::Url;
use validator::Validate;

use crate::{
  Error, Result,
  code::{Interest, MaritalStatus, Sex},
  validate::{
    ConstraintViolation, CURRENCY_PATTERN, ID_PATTERN, NACHNAME_PATTERN,
    POSTAL_CODE_PATTERN, past, unique_interests, violations,
  },
};

// ─── Identifier ──────────────────────────────────────────────────────────────

/// An opaque, UUID-shaped identifier. Assigned by the store at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DriverId(String);

impl DriverId {
  /// Accept `s` only if it matches the id pattern. Ids are normalised to
  /// lowercase, so lookups are case-insensitive.
  pub fn parse(s: &str) -> Result<Self> { Self::try_from(s.to_owned()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl TryFrom<String> for DriverId {
  type Error = Error;

  fn try_from(mut value: String) -> Result<Self> {
    if !ID_PATTERN.is_match(&value) {
      return Err(Error::InvalidId(value));
    }
    value.make_ascii_lowercase();
    Ok(Self(value))
  }
}

impl From<DriverId> for String {
  fn from(id: DriverId) -> Self { id.0 }
}

impl fmt::Display for DriverId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// The store owns id assignment, so an id the client sends never rejects
/// the record it came with.
fn advisory_id<'de, D>(deserializer: D) -> Result<Option<DriverId>, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum RawId {
    Text(String),
    Other(IgnoredAny),
  }

  Ok(match RawId::deserialize(deserializer)? {
    RawId::Text(s) => DriverId::try_from(s).ok(),
    RawId::Other(_) => None,
  })
}

// ─── Sub-records ─────────────────────────────────────────────────────────────

/// Postal address; both fields are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Address {
  #[validate(
    length(min = 1, message = "postal code must not be empty"),
    regex(path = *POSTAL_CODE_PATTERN, message = "postal code must have exactly 5 digits")
  )]
  pub postalcode: String,
  #[validate(length(min = 1, message = "city must not be empty"))]
  pub city:       String,
}

/// Sales volume attributed to a driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Sales {
  pub amount:   f64,
  /// ISO 4217 alphabetic code, e.g. `"EUR"`.
  #[validate(regex(path = *CURRENCY_PATTERN, message = "currency must be a 3-letter code"))]
  pub currency: String,
}

// ─── Driver ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Driver {
  /// `None` until the store has assigned one. An inbound id is advisory and
  /// a malformed one decodes as `None`.
  #[serde(
    default,
    deserialize_with = "advisory_id",
    skip_serializing_if = "Option::is_none"
  )]
  pub id:            Option<DriverId>,
  #[validate(
    length(min = 1, message = "surname must not be empty"),
    regex(path = *NACHNAME_PATTERN, message = "surname must start with a capital letter")
  )]
  pub nachname:      String,
  #[validate(email(message = "email is not a valid address"))]
  pub email:         String,
  #[serde(default)]
  #[validate(range(min = 0, max = 9, message = "category must be between 0 and 9"))]
  pub kategorie:     i32,
  #[serde(default)]
  pub newsletter:    bool,
  #[validate(custom(function = "past"))]
  pub birthdate:     Option<NaiveDate>,
  #[validate(nested)]
  pub sales:         Option<Sales>,
  pub homepage:      Option<Url>,
  pub sex:           Option<Sex>,
  pub maritalstatus: Option<MaritalStatus>,
  #[validate(custom(function = "unique_interests"))]
  pub interests:     Option<Vec<Interest>>,
  #[validate(nested)]
  pub address:       Address,
}

impl Driver {
  pub fn with_id(self, id: DriverId) -> Self {
    Self {
      id: Some(id),
      ..self
    }
  }

  pub fn with_nachname(self, nachname: impl Into<String>) -> Self {
    Self {
      nachname: nachname.into(),
      ..self
    }
  }

  pub fn with_email(self, email: impl Into<String>) -> Self {
    Self {
      email: email.into(),
      ..self
    }
  }

  pub fn with_interests(self, interests: Option<Vec<Interest>>) -> Self {
    Self { interests, ..self }
  }

  /// Check every field constraint. Violated properties are reported under
  /// `context`, the name of the operation and parameter being validated
  /// (e.g. `"create.driver"`).
  pub fn check(
    &self,
    context: &str,
  ) -> std::result::Result<(), Vec<ConstraintViolation>> {
    self.validate().map_err(|errors| violations(&errors, context))
  }
}

impl PartialEq for Driver {
  fn eq(&self, other: &Self) -> bool { self.email == other.email }
}

impl Eq for Driver {}

impl Hash for Driver {
  fn hash<H: Hasher>(&self, state: &mut H) { self.email.hash(state); }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;

  pub(crate) fn sample() -> Driver {
    Driver {
      id:            Some(
        DriverId::parse("1a2b3c4d-0000-4000-8000-00000000beef").unwrap(),
      ),
      nachname:      "Alpha".into(),
      email:         "alpha@example.com".into(),
      kategorie:     3,
      newsletter:    true,
      birthdate:     NaiveDate::from_ymd_opt(1985, 6, 15),
      sales:         Some(Sales {
        amount:   1234.56,
        currency: "EUR".into(),
      }),
      homepage:      Some(Url::parse("https://example.com/alpha").unwrap()),
      sex:           Some(Sex::Female),
      maritalstatus: Some(MaritalStatus::Married),
      interests:     Some(vec![Interest::Lecture, Interest::Travel]),
      address:       Address {
        postalcode: "12345".into(),
        city:       "Testort".into(),
      },
    }
  }

  #[test]
  fn wire_round_trip_preserves_every_field() {
    let driver = sample();
    let json = serde_json::to_value(&driver).unwrap();
    assert_eq!(json["maritalstatus"], "M");
    assert_eq!(json["sex"], "F");
    assert_eq!(json["interests"], serde_json::json!(["L", "T"]));

    let back: Driver = serde_json::from_value(json.clone()).unwrap();
    assert_eq!(back.id, driver.id);
    assert_eq!(back.nachname, driver.nachname);
    assert_eq!(back.kategorie, driver.kategorie);
    assert_eq!(back.birthdate, driver.birthdate);
    assert_eq!(back.sales, driver.sales);
    assert_eq!(back.homepage, driver.homepage);
    assert_eq!(back.interests, driver.interests);
    assert_eq!(back.address, driver.address);
    assert_eq!(serde_json::to_value(&back).unwrap(), json);
  }

  #[test]
  fn equality_is_by_email() {
    let a = sample();
    let b = sample().with_nachname("Beta").with_interests(None);
    assert_eq!(a, b);
    assert_ne!(a, sample().with_email("other@example.com"));
  }

  #[test]
  fn with_constructors_leave_the_source_untouched() {
    let original = sample();
    let renamed = original.clone().with_nachname("Gamma");
    assert_eq!(original.nachname, "Alpha");
    assert_eq!(renamed.nachname, "Gamma");
    assert_eq!(renamed.id, original.id);
  }

  #[test]
  fn id_is_optional_on_the_wire() {
    let mut json = serde_json::to_value(sample()).unwrap();
    json.as_object_mut().unwrap().remove("id");
    let driver: Driver = serde_json::from_value(json).unwrap();
    assert!(driver.id.is_none());
  }

  #[test]
  fn malformed_id_is_rejected_by_parse() {
    assert!(DriverId::parse("1234").is_err());
    assert!(DriverId::try_from("not-a-uuid".to_owned()).is_err());
  }

  #[test]
  fn malformed_inbound_id_decodes_as_absent() {
    for bad in [serde_json::json!("1234"), serde_json::json!(42), serde_json::json!(null)] {
      let mut json = serde_json::to_value(sample()).unwrap();
      json["id"] = bad;
      let driver: Driver = serde_json::from_value(json).unwrap();
      assert!(driver.id.is_none());
    }
  }

  #[test]
  fn ids_are_normalised_to_lowercase() {
    let id = DriverId::parse("1A2B3C4D-0000-4000-8000-00000000BEEF").unwrap();
    assert_eq!(id.as_str(), "1a2b3c4d-0000-4000-8000-00000000beef");
    assert_eq!(id, sample().id.unwrap());
  }

  #[test]
  fn valid_sample_passes_check() {
    assert!(sample().check("create.driver").is_ok());
  }

  #[test]
  fn check_reports_nested_paths_under_context() {
    let mut driver = sample().with_nachname("lowercase").with_email("nope");
    driver.kategorie = 12;
    driver.address.postalcode = "1234".into();
    driver.interests = Some(vec![Interest::Sports, Interest::Sports]);

    let violations = driver.check("create.driver").unwrap_err();
    let properties: Vec<_> =
      violations.iter().map(|v| v.property.as_str()).collect();
    assert_eq!(
      properties,
      vec![
        "create.driver.address.postalcode",
        "create.driver.email",
        "create.driver.interests",
        "create.driver.kategorie",
        "create.driver.nachname",
      ]
    );
  }

  #[test]
  fn birthdate_must_be_in_the_past() {
    let mut driver = sample();
    driver.birthdate = NaiveDate::from_ymd_opt(2999, 1, 1);
    let violations = driver.check("update.driver").unwrap_err();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].property, "update.driver.birthdate");
  }

  #[test]
  fn invalid_sales_currency_is_reported() {
    let mut driver = sample();
    driver.sales = Some(Sales {
      amount:   1.0,
      currency: "euro".into(),
    });
    let violations = driver.check("create.driver").unwrap_err();
    assert_eq!(violations[0].property, "create.driver.sales.currency");
  }
}
