//! Core types and trait definitions for the driver resource service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The HTTP layer and the store backends depend on it; it depends on nothing
//! proprietary.

// Native `async fn` in traits; the store trait spells out `Send` bounds itself.
#![allow(async_fn_in_trait)]

pub mod code;
pub mod driver;
pub mod error;
pub mod patch;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
