//! Error type for `hris-store-sqlite`.

use std::path::PathBuf;

use hris_core::{Classify, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("record store not found at {}", .0.display())]
  Missing(PathBuf),

  #[error("date parse error: {0}")]
  DateParse(String),

  #[error("count out of range: {0}")]
  CountRange(#[from] std::num::TryFromIntError),
}

impl Error {
  /// Whether SQLite reported a table that does not exist, i.e. the record
  /// store was never populated or the engine has not published yet.
  fn is_missing_table(&self) -> bool {
    match self {
      Error::Database(tokio_rusqlite::Error::Rusqlite(
        rusqlite::Error::SqliteFailure(_, Some(msg)),
      )) => msg.starts_with("no such table"),
      _ => false,
    }
  }
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Error::Missing(_) => ErrorKind::SourceUnavailable,
      Error::Database(tokio_rusqlite::Error::ConnectionClosed) => {
        ErrorKind::SourceUnavailable
      }
      e if e.is_missing_table() => ErrorKind::SourceUnavailable,
      Error::DateParse(_) => ErrorKind::SchemaViolation,
      _ => ErrorKind::ComputationFailure,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
