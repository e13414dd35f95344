//! A stand-in [`DriverStore`] that fabricates records instead of persisting
//! them.
//!
//! Useful for demos and for exercising the HTTP layer without a database.
//! Lookups succeed with a freshly generated record unless the input hits one
//! of the sentinels below; writes are accepted and forgotten.
//!
//! | Operation | Empty when |
//! |-----------|------------|
//! | `find_by_id` | the id starts with `f` or `F` |
//! | `find` by email | the email starts with `z` or `Z` |
//! | `find` by surname | the surname starts with `Z` |
//!
//! `find_all` yields [`FIND_ALL_COUNT`] records; a surname search yields one
//! record per character of the surname, or everything for an empty surname.

use chrono::{Months, Utc};
use driver_core::{
  code::{Interest, MaritalStatus, Sex},
  driver::{Address, Driver, DriverId, Sales},
  store::{Criteria, DriverStore},
};
use futures_util::{
  StreamExt as _, TryStreamExt as _,
  stream::{self, BoxStream},
};
use rand_core::{OsRng, RngCore as _};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

/// Number of records produced by `find_all`.
pub const FIND_ALL_COUNT: usize = 8;

const NACHNAMEN: &[&str] = &["Alpha", "Beta", "Gamma", "Delta", "Epsilon"];

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] driver_core::Error),

  #[error("url error: {0}")]
  Url(#[from] url::ParseError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, Copy, Default)]
pub struct MockStore;

/// A random id that never hits the `find_by_id` sentinel.
fn random_id() -> Result<DriverId> {
  let id = Uuid::new_v4().to_string();
  let id = match id.strip_prefix('f') {
    Some(rest) => format!("1{rest}"),
    None => id,
  };
  Ok(DriverId::parse(&id)?)
}

fn random_nachname() -> &'static str {
  NACHNAMEN[OsRng.next_u32() as usize % NACHNAMEN.len()]
}

fn fabricate(id: DriverId, nachname: &str) -> Result<Driver> {
  let years = 1 + OsRng.next_u32() % 59;
  let birthdate = Utc::now()
    .date_naive()
    .checked_sub_months(Months::new(12 * years));

  Ok(Driver {
    id:            Some(id),
    nachname:      nachname.to_owned(),
    email:         format!("{nachname}@example.com"),
    kategorie:     0,
    newsletter:    true,
    birthdate,
    sales:         Some(Sales {
      amount:   1.0,
      currency: "EUR".to_owned(),
    }),
    homepage:      Some(Url::parse("https://www.example.com")?),
    sex:           Some(Sex::Female),
    maritalstatus: Some(MaritalStatus::Married),
    interests:     Some(vec![Interest::Lecture, Interest::Travel]),
    address:       Address {
      postalcode: "12345".to_owned(),
      city:       "Testort".to_owned(),
    },
  })
}

fn starts_with_ignore_case(s: &str, c: char) -> bool {
  s.chars().next().is_some_and(|first| first.eq_ignore_ascii_case(&c))
}

impl MockStore {
  pub fn new() -> Self { Self }

  fn find_by_email(&self, email: &str) -> Result<Option<Driver>> {
    if starts_with_ignore_case(email, 'z') {
      return Ok(None);
    }
    let driver = fabricate(random_id()?, random_nachname())?.with_email(email);
    tracing::debug!(?driver, "mock find_by_email");
    Ok(Some(driver))
  }

  fn find_by_nachname(&self, nachname: &str) -> Result<Vec<Driver>> {
    if nachname.starts_with('Z') {
      return Ok(Vec::new());
    }
    (0..nachname.chars().count())
      .map(|_| fabricate(random_id()?, nachname))
      .collect()
  }
}

impl DriverStore for MockStore {
  type Error = Error;

  async fn find_by_id(&self, id: DriverId) -> Result<Option<Driver>> {
    if starts_with_ignore_case(id.as_str(), 'f') {
      tracing::debug!(%id, "mock find_by_id: sentinel, no driver");
      return Ok(None);
    }
    let nachname = random_nachname();
    Ok(Some(fabricate(id, nachname)?))
  }

  async fn find<'a>(&'a self, criteria: &'a Criteria) -> Result<Vec<Driver>> {
    match criteria {
      Criteria::All => self.find_all().try_collect().await,
      Criteria::Email(email) => {
        Ok(self.find_by_email(email)?.into_iter().collect())
      }
      Criteria::Nachname(nachname) if nachname.is_empty() => {
        self.find_all().try_collect().await
      }
      Criteria::Nachname(nachname) => self.find_by_nachname(nachname),
      Criteria::Unsatisfiable => Ok(Vec::new()),
    }
  }

  fn find_all(&self) -> BoxStream<'static, Result<Driver>> {
    stream::iter(0..FIND_ALL_COUNT)
      .map(|_| fabricate(random_id()?, random_nachname()))
      .boxed()
  }

  async fn create(&self, driver: Driver) -> Result<Driver> {
    Ok(driver.with_id(random_id()?))
  }

  async fn update(&self, id: DriverId, driver: Driver) -> Result<Option<Driver>> {
    let existing = self.find_by_id(id.clone()).await?;
    Ok(existing.map(|_| driver.with_id(id)))
  }

  async fn delete_by_id(&self, _id: DriverId) -> Result<()> { Ok(()) }

  async fn delete_by_email(&self, _email: String) -> Result<()> { Ok(()) }
}
