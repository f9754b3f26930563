//! Content fingerprints for a reconciliation run.
//!
//! A fingerprint is a SHA-256 hash over the serialized derived relations and
//! anomaly set. Two runs over unchanged input must produce the same
//! fingerprint; comparing them is how idempotence is checked.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::{
  Result,
  derived::{
    AnomalyRecord, DerivedRelations, StatusSummaryRecord, TimeToHireRecord,
  },
};

#[derive(Serialize)]
struct Canonical<'a> {
  time_to_hire:   &'a [TimeToHireRecord],
  status_summary: &'a [StatusSummaryRecord],
  anomalies:      &'a [AnomalyRecord],
}

/// Compute the hex-encoded fingerprint of a run's output.
///
/// Row order is significant: the engine emits rows deterministically, so a
/// reordering indicates a real difference in output.
pub fn compute_fingerprint(
  relations: &DerivedRelations,
  anomalies: &[AnomalyRecord],
) -> Result<String> {
  let canonical = Canonical {
    time_to_hire:   &relations.time_to_hire,
    status_summary: &relations.status_summary,
    anomalies,
  };

  let mut hasher = Sha256::new();
  hasher.update(serde_json::to_vec(&canonical)?);
  Ok(hex::encode(hasher.finalize()))
}
