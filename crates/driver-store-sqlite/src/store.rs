//! [`SqliteStore`]: the SQLite implementation of [`DriverStore`].

use std::path::Path;

use futures_util::{
  StreamExt as _, TryStreamExt as _,
  stream::{self, BoxStream},
};
use uuid::Uuid;

use driver_core::{
  driver::{Driver, DriverId},
  store::{Criteria, DriverStore},
};

use crate::{
  Error, Result,
  encode::{RawDriver, encode_driver},
  schema::SCHEMA,
};

/// Rows fetched per round-trip while streaming `find_all`.
const PAGE_SIZE: i64 = 64;

const SELECT_DRIVER: &str = "SELECT seq, id, body FROM drivers";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A driver store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `SELECT ... WHERE <filter>` with a single text parameter.
  async fn select_where(
    &self,
    filter: &'static str,
    param: String,
  ) -> Result<Vec<Driver>> {
    let raws: Vec<RawDriver> = self
      .conn
      .call(move |conn| {
        let mut stmt =
          conn.prepare(&format!("{SELECT_DRIVER} WHERE {filter} ORDER BY seq"))?;
        let rows = stmt
          .query_map(rusqlite::params![param], RawDriver::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDriver::into_driver).collect()
  }
}

/// Fetch up to [`PAGE_SIZE`] rows with `seq > after`.
async fn fetch_page(
  conn: &tokio_rusqlite::Connection,
  after: i64,
) -> Result<Vec<RawDriver>> {
  let rows = conn
    .call(move |conn| {
      let mut stmt = conn.prepare(&format!(
        "{SELECT_DRIVER} WHERE seq > ?1 ORDER BY seq LIMIT ?2"
      ))?;
      let rows = stmt
        .query_map(rusqlite::params![after, PAGE_SIZE], RawDriver::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
      Ok(rows)
    })
    .await?;
  Ok(rows)
}

// ─── DriverStore impl ────────────────────────────────────────────────────────

impl DriverStore for SqliteStore {
  type Error = Error;

  async fn find_by_id(&self, id: DriverId) -> Result<Option<Driver>> {
    let mut found = self.select_where("id = ?1", id.to_string()).await?;
    Ok(found.pop())
  }

  async fn find<'a>(&'a self, criteria: &'a Criteria) -> Result<Vec<Driver>> {
    match criteria {
      Criteria::All => self.find_all().try_collect().await,
      Criteria::Email(email) => {
        self.select_where("email = ?1", email.clone()).await
      }
      Criteria::Nachname(nachname) if nachname.is_empty() => {
        self.find_all().try_collect().await
      }
      // Prefix match without LIKE, so `%` and `_` in the input stay literal.
      Criteria::Nachname(nachname) => {
        self
          .select_where("substr(nachname, 1, length(?1)) = ?1", nachname.clone())
          .await
      }
      Criteria::Unsatisfiable => Ok(Vec::new()),
    }
  }

  /// Keyset-paged over `seq`: one page is read per round-trip, and only when
  /// the previous page has been consumed.
  fn find_all(&self) -> BoxStream<'static, Result<Driver>> {
    let conn = self.conn.clone();
    stream::unfold(Some(0_i64), move |cursor| {
      let conn = conn.clone();
      async move {
        let after = cursor?;
        match fetch_page(&conn, after).await {
          Ok(page) if page.is_empty() => None,
          Ok(page) => {
            let next = page.last().map(|raw| raw.seq);
            Some((Ok(page), next))
          }
          Err(e) => Some((Err(e), None)),
        }
      }
    })
    .map_ok(|page| stream::iter(page.into_iter().map(RawDriver::into_driver)))
    .try_flatten()
    .boxed()
  }

  async fn create(&self, driver: Driver) -> Result<Driver> {
    let id = DriverId::parse(&Uuid::new_v4().to_string())?;
    let driver = driver.with_id(id.clone());
    let row = encode_driver(&id, &driver)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO drivers (id, email, nachname, body) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![row.id, row.email, row.nachname, row.body],
        )?;
        Ok(())
      })
      .await?;

    Ok(driver)
  }

  async fn update(&self, id: DriverId, driver: Driver) -> Result<Option<Driver>> {
    let driver = driver.with_id(id.clone());
    let row = encode_driver(&id, &driver)?;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE drivers SET email = ?2, nachname = ?3, body = ?4 WHERE id = ?1",
          rusqlite::params![row.id, row.email, row.nachname, row.body],
        )?)
      })
      .await?;

    Ok((changed > 0).then_some(driver))
  }

  async fn delete_by_id(&self, id: DriverId) -> Result<()> {
    let id = id.to_string();
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM drivers WHERE id = ?1", rusqlite::params![id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_by_email(&self, email: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM drivers WHERE email = ?1",
          rusqlite::params![email],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
