//! Core types, reconciliation logic and trait definitions for the HRIS
//! metrics engine.
//!
//! This crate is deliberately free of HTTP, file-format and database
//! dependencies. Storage backends implement [`store::HrisStore`]; audit sinks
//! implement [`audit::AuditLog`]. The engine and the query surface are generic
//! over both.

// Trait methods spell out `impl Future + Send`; implementors use `async fn`.
#![allow(async_fn_in_trait)]

pub mod audit;
pub mod derived;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod query;
pub mod reconcile;
pub mod record;
pub mod store;

pub use error::{Classify, Error, ErrorKind, Result};
