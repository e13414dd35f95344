//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use driver_core::{
  code::{Interest, MaritalStatus, Sex},
  driver::{Address, Driver, DriverId},
  store::{Criteria, DriverStore},
};
use futures_util::{StreamExt as _, TryStreamExt as _};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn driver(nachname: &str, email: &str) -> Driver {
  Driver {
    id:            None,
    nachname:      nachname.into(),
    email:         email.into(),
    kategorie:     1,
    newsletter:    false,
    birthdate:     NaiveDate::from_ymd_opt(1990, 3, 4),
    sales:         None,
    homepage:      None,
    sex:           Some(Sex::Male),
    maritalstatus: Some(MaritalStatus::Single),
    interests:     Some(vec![Interest::Sports]),
    address:       Address {
      postalcode: "76133".into(),
      city:       "Karlsruhe".into(),
    },
  }
}

fn foreign_id() -> DriverId {
  DriverId::parse("00000000-0000-4000-8000-000000000000").unwrap()
}

// ─── Create / find_by_id ─────────────────────────────────────────────────────

#[tokio::test]
async fn create_assigns_a_fresh_id() {
  let s = store().await;
  let input = driver("Alpha", "alpha@example.com").with_id(foreign_id());

  let created = s.create(input).await.unwrap();
  let id = created.id.clone().expect("id assigned");
  assert_ne!(id, foreign_id());

  let fetched = s.find_by_id(id.clone()).await.unwrap().unwrap();
  assert_eq!(fetched.id, Some(id));
  assert_eq!(fetched.nachname, "Alpha");
  assert_eq!(fetched.interests, Some(vec![Interest::Sports]));
}

#[tokio::test]
async fn find_by_id_missing_returns_none() {
  let s = store().await;
  assert!(s.find_by_id(foreign_id()).await.unwrap().is_none());
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_keeps_the_path_id() {
  let s = store().await;
  let created = s.create(driver("Alpha", "alpha@example.com")).await.unwrap();
  let id = created.id.clone().unwrap();

  let replacement = driver("Beta", "beta@example.com").with_id(foreign_id());
  let updated = s.update(id.clone(), replacement).await.unwrap().unwrap();
  assert_eq!(updated.id, Some(id.clone()));

  let fetched = s.find_by_id(id.clone()).await.unwrap().unwrap();
  assert_eq!(fetched.id, Some(id));
  assert_eq!(fetched.nachname, "Beta");
  assert!(s.find_by_id(foreign_id()).await.unwrap().is_none());
}

#[tokio::test]
async fn update_missing_returns_none() {
  let s = store().await;
  let result = s
    .update(foreign_id(), driver("Alpha", "alpha@example.com"))
    .await
    .unwrap();
  assert!(result.is_none());
}

// ─── Find ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn find_all_streams_in_insertion_order_across_pages() {
  let s = store().await;
  let mut emails = Vec::new();
  for i in 0..150 {
    let email = format!("driver{i}@example.com");
    s.create(driver("Alpha", &email)).await.unwrap();
    emails.push(email);
  }

  let streamed: Vec<Driver> = s.find_all().try_collect().await.unwrap();
  let streamed: Vec<_> = streamed.into_iter().map(|d| d.email).collect();
  assert_eq!(streamed, emails);
}

#[tokio::test]
async fn find_all_is_lazy() {
  let s = store().await;
  for i in 0..3 {
    s.create(driver("Alpha", &format!("d{i}@example.com")))
      .await
      .unwrap();
  }
  let first: Vec<_> = s.find_all().take(1).collect().await;
  assert_eq!(first.len(), 1);
  assert_eq!(first[0].as_ref().unwrap().email, "d0@example.com");
}

#[tokio::test]
async fn find_without_criteria_equals_find_all() {
  let s = store().await;
  s.create(driver("Alpha", "a@example.com")).await.unwrap();
  s.create(driver("Beta", "b@example.com")).await.unwrap();

  let all: Vec<Driver> = s.find_all().try_collect().await.unwrap();
  let found = s.find(&Criteria::All).await.unwrap();
  let ids = |v: &[Driver]| v.iter().map(|d| d.id.clone()).collect::<Vec<_>>();
  assert_eq!(ids(&found), ids(&all));
}

#[tokio::test]
async fn find_by_email_is_exact() {
  let s = store().await;
  s.create(driver("Alpha", "alpha@example.com")).await.unwrap();
  s.create(driver("Beta", "beta@example.com")).await.unwrap();

  let found = s
    .find(&Criteria::Email("beta@example.com".into()))
    .await
    .unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].nachname, "Beta");

  let none = s.find(&Criteria::Email("beta@".into())).await.unwrap();
  assert!(none.is_empty());
}

#[tokio::test]
async fn find_by_nachname_matches_prefix() {
  let s = store().await;
  s.create(driver("Alpha", "a1@example.com")).await.unwrap();
  s.create(driver("Alphonse", "a2@example.com")).await.unwrap();
  s.create(driver("Beta", "b@example.com")).await.unwrap();

  let found = s.find(&Criteria::Nachname("Alph".into())).await.unwrap();
  assert_eq!(found.len(), 2);

  let literal = s.find(&Criteria::Nachname("Al%".into())).await.unwrap();
  assert!(literal.is_empty());

  let all = s.find(&Criteria::Nachname(String::new())).await.unwrap();
  assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn unsatisfiable_criteria_find_nothing() {
  let s = store().await;
  s.create(driver("Alpha", "a@example.com")).await.unwrap();
  assert!(s.find(&Criteria::Unsatisfiable).await.unwrap().is_empty());
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_by_id_is_idempotent() {
  let s = store().await;
  let created = s.create(driver("Alpha", "a@example.com")).await.unwrap();
  let id = created.id.unwrap();

  s.delete_by_id(id.clone()).await.unwrap();
  s.delete_by_id(id.clone()).await.unwrap();
  assert!(s.find_by_id(id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_by_email_removes_matching_records() {
  let s = store().await;
  s.create(driver("Alpha", "a@example.com")).await.unwrap();
  s.create(driver("Beta", "b@example.com")).await.unwrap();

  s.delete_by_email("a@example.com".into()).await.unwrap();
  s.delete_by_email("missing@example.com".into()).await.unwrap();

  let left: Vec<Driver> = s.find_all().try_collect().await.unwrap();
  assert_eq!(left.len(), 1);
  assert_eq!(left[0].email, "b@example.com");
}
