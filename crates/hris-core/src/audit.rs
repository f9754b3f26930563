//! The `AuditLog` trait: where anomalies go for manual review.

use serde::{Deserialize, Serialize};

use crate::derived::AnomalyRecord;

/// A sink for the anomaly set of one engine run.
///
/// The artifact is advisory. A write failure is logged by the engine and
/// never aborts a run.
pub trait AuditLog {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Replace the artifact with `anomalies`.
  ///
  /// An empty slice must leave no artifact behind (removing one written by a
  /// previous run), so that absence reliably means "no anomalies".
  fn write(&self, anomalies: &[AnomalyRecord]) -> Result<(), Self::Error>;
}

/// What happened to the audit artifact during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuditStatus {
  /// The artifact holds `rows` anomalies.
  Written { rows: usize },
  /// No anomalies; no artifact exists.
  Absent,
  /// The artifact could not be written.
  Failed { message: String },
}
