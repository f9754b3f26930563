//! CSV codec for the HRIS pipeline.
//!
//! Reads the spreadsheet exports that feed the record store and writes the
//! anomaly audit artifact. Pure synchronous file I/O; no database or HTTP
//! dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use std::path::Path;
//!
//! let ingested = hris_csv::read_source(Path::new("data")).unwrap();
//! println!(
//!   "{} employees, {} applicants",
//!   ingested.records.employees.len(),
//!   ingested.records.applicants.len(),
//! );
//! ```

pub mod audit;
mod date;
pub mod error;
mod header;
pub mod ingest;

pub use audit::{CsvAuditLog, read_audit};
pub use error::{Error, Result};
pub use ingest::{Ingested, read_source, write_dropped};
