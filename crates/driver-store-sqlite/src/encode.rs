//! Encoding and decoding helpers between [`Driver`] and the row stored in
//! SQLite.
//!
//! The full record is stored as compact JSON in `body`. The `id` column is
//! authoritative: on decode it overrides whatever id the JSON carries.

use driver_core::driver::{Driver, DriverId};

use crate::Result;

/// Column values for one `drivers` row, minus `seq`.
pub struct EncodedDriver {
  pub id:       String,
  pub email:    String,
  pub nachname: String,
  pub body:     String,
}

pub fn encode_driver(id: &DriverId, driver: &Driver) -> Result<EncodedDriver> {
  Ok(EncodedDriver {
    id:       id.as_str().to_owned(),
    email:    driver.email.clone(),
    nachname: driver.nachname.clone(),
    body:     serde_json::to_string(driver)?,
  })
}

/// A row as read from SQLite, before JSON decoding.
pub struct RawDriver {
  pub seq:  i64,
  pub id:   String,
  pub body: String,
}

impl RawDriver {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      seq:  row.get(0)?,
      id:   row.get(1)?,
      body: row.get(2)?,
    })
  }

  pub fn into_driver(self) -> Result<Driver> {
    let driver: Driver = serde_json::from_str(&self.body)?;
    Ok(driver.with_id(DriverId::parse(&self.id)?))
  }
}
