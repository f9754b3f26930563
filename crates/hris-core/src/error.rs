//! Error types for `hris-core`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The failure taxonomy shared by every layer of the pipeline.
///
/// Library crates keep their own error enums; each of them maps onto one of
/// these kinds through [`Classify`] so the engine and the query surface can
/// decide how a failure propagates without knowing the backend.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
  /// The record store or a source file is missing. Fatal to a run.
  SourceUnavailable,
  /// A required field is absent or malformed.
  SchemaViolation,
  /// Building, publishing or querying a derived relation failed.
  ComputationFailure,
  /// The anomaly artifact could not be persisted. Never fatal.
  AuditWriteFailure,
}

/// Errors that can report which [`ErrorKind`] they belong to.
pub trait Classify {
  fn kind(&self) -> ErrorKind;
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("record store unavailable: {0}")]
  SourceUnavailable(#[source] BoxError),

  #[error("schema violation: {0}")]
  SchemaViolation(String),

  #[error("failed to build derived relations: {0}")]
  Computation(#[source] BoxError),

  #[error("failed to write audit artifact: {0}")]
  AuditWrite(#[source] BoxError),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  /// Wrap a backend error, keeping its classification.
  pub fn from_store<E>(err: E) -> Self
  where
    E: std::error::Error + Classify + Send + Sync + 'static,
  {
    match err.kind() {
      ErrorKind::SourceUnavailable => Error::SourceUnavailable(Box::new(err)),
      ErrorKind::SchemaViolation => Error::SchemaViolation(err.to_string()),
      ErrorKind::ComputationFailure => Error::Computation(Box::new(err)),
      ErrorKind::AuditWriteFailure => Error::AuditWrite(Box::new(err)),
    }
  }
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Error::SourceUnavailable(_) => ErrorKind::SourceUnavailable,
      Error::SchemaViolation(_) => ErrorKind::SchemaViolation,
      Error::Computation(_) | Error::Serialization(_) => {
        ErrorKind::ComputationFailure
      }
      Error::AuditWrite(_) => ErrorKind::AuditWriteFailure,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kinds_render_as_snake_case() {
    assert_eq!(ErrorKind::SourceUnavailable.to_string(), "source_unavailable");
    assert_eq!(ErrorKind::AuditWriteFailure.as_ref(), "audit_write_failure");
    assert_eq!(
      serde_json::to_string(&ErrorKind::ComputationFailure).unwrap(),
      "\"computation_failure\""
    );
  }

  #[test]
  fn from_store_keeps_classification() {
    #[derive(Debug, Error)]
    #[error("no such table: employees")]
    struct Missing;

    impl Classify for Missing {
      fn kind(&self) -> ErrorKind { ErrorKind::SourceUnavailable }
    }

    let err = Error::from_store(Missing);
    assert!(matches!(err, Error::SourceUnavailable(_)));
    assert_eq!(err.kind(), ErrorKind::SourceUnavailable);
  }
}
