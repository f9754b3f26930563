//! Orchestration for the HRIS pipeline.
//!
//! Wires the CSV codec, the SQLite store and the reconciliation engine into
//! the two stages of a pipeline run (ingest, then reconcile), journals each
//! stage to the pipeline log and raises an alert when one fails. The `hris`
//! binary is a thin CLI over this crate.

pub mod alert;
pub mod config;
pub mod error;
pub mod journal;
pub mod stage;

pub use alert::Alerter;
pub use config::PipelineConfig;
pub use error::{Error, Result};
