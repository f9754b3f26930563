//! The reconciliation run: read the record store, derive, publish, audit.
//!
//! A run is one sequential batch. Every step awaits the previous one; nothing
//! runs concurrently. Failures before or during publishing abort the run with
//! nothing replaced. A failure to write the audit artifact is logged and
//! reported, never fatal.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  audit::{AuditLog, AuditStatus},
  fingerprint::compute_fingerprint,
  reconcile::reconcile as derive,
  store::HrisStore,
};

/// Summary of one completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
  pub run_id:            Uuid,
  pub employees:         usize,
  pub applicants:        usize,
  pub employment_types:  usize,
  pub time_to_hire_rows: usize,
  pub status_rows:       usize,
  pub anomalies:         usize,
  pub audit:             AuditStatus,
  /// See [`crate::fingerprint`].
  pub fingerprint:       String,
}

/// Run the engine against `store`, sending anomalies to `audit`.
pub async fn reconcile<S, A>(store: &S, audit: &A) -> Result<ReconcileReport>
where
  S: HrisStore,
  A: AuditLog,
{
  let run_id = Uuid::new_v4();
  tracing::info!(%run_id, "starting reconciliation run");

  let employees = store.employees().await.map_err(Error::from_store)?;
  let applicants = store.applicants().await.map_err(Error::from_store)?;
  let employment_types =
    store.employment_types().await.map_err(Error::from_store)?;
  tracing::debug!(
    %run_id,
    employees = employees.len(),
    applicants = applicants.len(),
    employment_types = employment_types.len(),
    "loaded record store"
  );

  let out = derive(&employees, &applicants);
  let fingerprint = compute_fingerprint(&out.relations, &out.anomalies)?;

  let time_to_hire_rows = out.relations.time_to_hire.len();
  let status_rows = out.relations.status_summary.len();

  store
    .publish(out.relations)
    .await
    .map_err(|e| match Error::from_store(e) {
      Error::SchemaViolation(msg) => Error::Computation(msg.into()),
      other => other,
    })?;
  tracing::info!(
    %run_id,
    time_to_hire_rows,
    status_rows,
    "published derived relations"
  );

  let audit_status = match audit.write(&out.anomalies) {
    Ok(()) if out.anomalies.is_empty() => AuditStatus::Absent,
    Ok(()) => {
      tracing::warn!(
        %run_id,
        anomalies = out.anomalies.len(),
        "logged hires that precede their application"
      );
      AuditStatus::Written { rows: out.anomalies.len() }
    }
    Err(e) => {
      let err = Error::AuditWrite(Box::new(e));
      tracing::error!(%run_id, error = %err, "audit artifact not written");
      AuditStatus::Failed { message: err.to_string() }
    }
  };

  let report = ReconcileReport {
    run_id,
    employees: employees.len(),
    applicants: applicants.len(),
    employment_types: employment_types.len(),
    time_to_hire_rows,
    status_rows,
    anomalies: out.anomalies.len(),
    audit: audit_status,
    fingerprint,
  };
  tracing::info!(%run_id, fingerprint = %report.fingerprint, "reconciliation complete");
  Ok(report)
}
