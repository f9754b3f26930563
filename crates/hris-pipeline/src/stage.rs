//! Pipeline stages and the run driver.
//!
//! Each stage is an independent unit of work: `ingest` replaces the base
//! tables from the source exports, `reconcile` rebuilds the derived relations
//! and the audit artifact from whatever the base tables hold.

use std::fmt;

use hris_core::{
  engine::{self, ReconcileReport},
  store::HrisStore,
};
use hris_csv::CsvAuditLog;
use hris_store_sqlite::SqliteStore;
use serde::Serialize;

use crate::{
  alert::Alerter,
  config::PipelineConfig,
  error::{Error, Result},
  journal::Journal,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  Ingest,
  Reconcile,
}

impl Stage {
  pub fn label(self) -> &'static str {
    match self {
      Stage::Ingest => "ingest",
      Stage::Reconcile => "reconcile",
    }
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

// ─── Ingest ──────────────────────────────────────────────────────────────────

/// Row counts from one ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
  pub employees:                 usize,
  pub applicants:                usize,
  pub employment_types:          usize,
  pub dropped_employees:         usize,
  pub dropped_applicants:        usize,
  pub missing_hire_dates:        usize,
  pub missing_application_dates: usize,
  /// Whether the drop logs reached `log_dir`. They are diagnostic only.
  pub drop_logs_written:         bool,
}

/// Read the source exports, write the drop logs and replace the base tables.
///
/// A drop log that cannot be written is logged and skipped; it never stops
/// the stage.
pub async fn ingest(config: &PipelineConfig) -> Result<IngestSummary> {
  let ingested = hris_csv::read_source(&config.source_dir)?;
  let drop_logs_written = match hris_csv::write_dropped(&config.log_dir, &ingested) {
    Ok(_) => true,
    Err(e) => {
      tracing::warn!(log_dir = %config.log_dir.display(), error = %e, "drop logs not written");
      false
    }
  };

  let summary = IngestSummary {
    employees:                 ingested.records.employees.len(),
    applicants:                ingested.records.applicants.len(),
    employment_types:          ingested.records.employment_types.len(),
    dropped_employees:         ingested.dropped_employees.rows.len(),
    dropped_applicants:        ingested.dropped_applicants.rows.len(),
    missing_hire_dates:        ingested.null_dates.hire_dates,
    missing_application_dates: ingested.null_dates.application_dates,
    drop_logs_written,
  };

  let store = SqliteStore::open(&config.store_path).await?;
  store.replace_records(ingested.records).await?;

  tracing::info!(store = %config.store_path.display(), "base tables replaced");
  Ok(summary)
}

// ─── Reconcile ───────────────────────────────────────────────────────────────

/// Run the engine against an existing store.
pub async fn reconcile(config: &PipelineConfig) -> Result<ReconcileReport> {
  let store = SqliteStore::open_existing(&config.store_path).await?;
  let audit = CsvAuditLog::new(&config.audit_path);
  Ok(engine::reconcile(&store, &audit).await?)
}

// ─── Run ─────────────────────────────────────────────────────────────────────

/// The outcome of a full run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
  pub ingest:    IngestSummary,
  pub reconcile: ReconcileReport,
}

/// A stage failed; the run stopped there.
#[derive(Debug, thiserror::Error)]
#[error("{stage} failed: {source}")]
pub struct StageFailure {
  pub stage:  Stage,
  #[source]
  pub source: Error,
}

/// Run every stage in order, journaling each outcome.
///
/// The first failing stage is journaled, alerted and returned; later stages
/// do not run.
pub async fn run(
  config: &PipelineConfig,
  alerter: &Alerter,
) -> std::result::Result<RunReport, StageFailure> {
  let journal = Journal::new(&config.log_dir);

  let ingested = checkpoint(&journal, alerter, Stage::Ingest, ingest(config).await).await?;
  let reconciled =
    checkpoint(&journal, alerter, Stage::Reconcile, reconcile(config).await).await?;

  journal.record("✅ All steps completed successfully.");
  tracing::info!(fingerprint = %reconciled.fingerprint, "pipeline completed");
  Ok(RunReport { ingest: ingested, reconcile: reconciled })
}

async fn checkpoint<T>(
  journal: &Journal,
  alerter: &Alerter,
  stage: Stage,
  result: Result<T>,
) -> std::result::Result<T, StageFailure> {
  match result {
    Ok(value) => {
      journal.record(&format!("✅ Success: {stage}"));
      Ok(value)
    }
    Err(source) => {
      tracing::error!(%stage, error = %source, "stage failed");
      journal.record(&format!("❌ Failure: {stage} - {source}"));
      alerter.send(&format!("{stage} failed. See logs for details.")).await;
      Err(StageFailure { stage, source })
    }
  }
}
