//! Error type for `hris-pipeline`.

use hris_core::{Classify, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("ingestion failed: {0}")]
  Ingest(#[from] hris_csv::Error),

  #[error("store error: {0}")]
  Store(#[from] hris_store_sqlite::Error),

  #[error(transparent)]
  Engine(#[from] hris_core::Error),
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Error::Ingest(e) => e.kind(),
      Error::Store(e) => e.kind(),
      Error::Engine(e) => e.kind(),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
