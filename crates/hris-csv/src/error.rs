//! Error types for the hris-csv codec.

use std::path::PathBuf;

use hris_core::{Classify, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("source file not found: {}", .0.display())]
  SourceMissing(PathBuf),

  #[error("{table}: missing required column {column:?}")]
  MissingColumn { table: &'static str, column: &'static str },

  #[error("CSV error in {}: {source}", .path.display())]
  Csv {
    path:   PathBuf,
    #[source]
    source: csv::Error,
  },

  #[error("failed to write {}: {source}", .path.display())]
  Write {
    path:   PathBuf,
    #[source]
    source: csv::Error,
  },

  #[error("I/O error on {}: {source}", .path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Error::SourceMissing(_) => ErrorKind::SourceUnavailable,
      Error::MissingColumn { .. } | Error::Csv { .. } => ErrorKind::SchemaViolation,
      Error::Write { .. } | Error::Io { .. } => ErrorKind::AuditWriteFailure,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
