//! Hypermedia wrapping: each record gets a single `self` link.

use driver_core::driver::{Driver, DriverId};
use serde::Serialize;

use crate::dispatch::Target;

#[derive(Debug, Clone, Serialize)]
pub struct Link {
  pub href: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Links {
  #[serde(rename = "self")]
  pub self_link: Link,
}

/// A record plus its `_links`, serialised side by side.
#[derive(Debug, Clone, Serialize)]
pub struct EntityModel<T> {
  #[serde(flatten)]
  pub content: T,
  #[serde(rename = "_links")]
  pub links:   Links,
}

/// Builds links relative to the collection the request addressed.
#[derive(Debug, Clone)]
pub struct Assembler {
  collection: String,
}

impl Assembler {
  /// `base_url` is the externally visible origin; `path` is the full request
  /// path, which ends in the id segment when `target` is a single record.
  pub fn new(base_url: &str, path: &str, target: &Target) -> Self {
    let collection = match target {
      Target::Root => path.trim_end_matches('/'),
      Target::Id(_) | Target::Page(_) => {
        path.rsplit_once('/').map_or("", |(parent, _)| parent)
      }
    };
    Self {
      collection: format!("{}{collection}", base_url.trim_end_matches('/')),
    }
  }

  pub fn location(&self, id: &DriverId) -> String {
    format!("{}/{id}", self.collection)
  }

  pub fn to_model(&self, driver: Driver) -> EntityModel<Driver> {
    let href = driver
      .id
      .as_ref()
      .map_or_else(|| self.collection.clone(), |id| self.location(id));
    EntityModel {
      content: driver,
      links:   Links {
        self_link: Link { href },
      },
    }
  }
}
