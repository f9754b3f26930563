//! Integration tests for `SqliteStore` against an in-memory database.

use std::convert::Infallible;

use chrono::NaiveDate;
use hris_core::{
  Classify, ErrorKind,
  audit::{AuditLog, AuditStatus},
  derived::{AnomalyRecord, DerivedRelations, StatusSummaryRecord, TimeToHireRecord},
  engine,
  query,
  record::{Applicant, Employee, EmploymentType, RecordSet},
  store::HrisStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn date(s: &str) -> NaiveDate {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn employee(name: &str, department: &str, hired: Option<&str>) -> Employee {
  Employee {
    name:       name.into(),
    department: department.into(),
    hire_date:  hired.map(date),
    end_date:   None,
  }
}

fn applicant(name: &str, role: &str, applied: Option<&str>, status: &str) -> Applicant {
  Applicant {
    name:             name.into(),
    role:             role.into(),
    application_date: applied.map(date),
    status:           status.into(),
  }
}

fn records() -> RecordSet {
  RecordSet {
    employees:        vec![
      employee("jane doe", "Engineering", Some("2023-01-15")),
      employee("sam lee", "Sales", Some("2023-01-20")),
      employee("Ana Ruiz", "Engineering", Some("2023-03-02")),
      employee("Ben Ode", "Design", None),
    ],
    applicants:       vec![
      applicant("Jane Doe", "Engineer", Some("2023-01-01"), "hired"),
      applicant("Sam Lee", "Account Executive", Some("2023-02-01"), "Hired"),
      applicant("ana ruiz", "Engineer", Some("2023-03-01"), "hired"),
      applicant("Ben Ode", "Designer", Some("2023-01-01"), "interviewing"),
      applicant("Cy Moss", "Engineer", None, "unknown"),
    ],
    employment_types: vec![
      EmploymentType { employment_type: "Full-time".into() },
      EmploymentType { employment_type: "Contract".into() },
    ],
  }
}

/// Keeps the last anomaly set in memory.
#[derive(Default)]
struct KeepAudit(std::sync::Mutex<Vec<AnomalyRecord>>);

impl AuditLog for KeepAudit {
  type Error = Infallible;

  fn write(&self, anomalies: &[AnomalyRecord]) -> Result<(), Infallible> {
    *self.0.lock().unwrap() = anomalies.to_vec();
    Ok(())
  }
}

// ─── Record store ────────────────────────────────────────────────────────────

#[tokio::test]
async fn replace_and_read_records() {
  let s = store().await;
  s.replace_records(records()).await.unwrap();

  let employees = s.employees().await.unwrap();
  assert_eq!(employees, records().employees);

  let applicants = s.applicants().await.unwrap();
  assert_eq!(applicants, records().applicants);

  let types = s.employment_types().await.unwrap();
  assert_eq!(types.len(), 2);
  assert_eq!(types[0].employment_type, "Full-time");
}

#[tokio::test]
async fn replace_records_is_wholesale() {
  let s = store().await;
  s.replace_records(records()).await.unwrap();

  let smaller = RecordSet {
    employees: vec![employee("x", "Ops", None)],
    ..Default::default()
  };
  s.replace_records(smaller).await.unwrap();

  assert_eq!(s.employees().await.unwrap().len(), 1);
  assert!(s.applicants().await.unwrap().is_empty());
  assert!(s.employment_types().await.unwrap().is_empty());
}

#[tokio::test]
async fn replacing_records_drops_stale_derived_relations() {
  let s = store().await;
  s.replace_records(records()).await.unwrap();
  engine::reconcile(&s, &KeepAudit::default()).await.unwrap();

  s.replace_records(records()).await.unwrap();
  let err = s.time_to_hire().await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::SourceUnavailable);
}

#[tokio::test]
async fn open_existing_requires_the_file() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("hris.db");

  let err = SqliteStore::open_existing(&path).await.err().unwrap();
  assert!(matches!(err, Error::Missing(_)));
  assert_eq!(err.kind(), ErrorKind::SourceUnavailable);

  {
    let created = SqliteStore::open(&path).await.unwrap();
    created.replace_records(records()).await.unwrap();
  }
  let reopened = SqliteStore::open_existing(&path).await.unwrap();
  assert_eq!(reopened.applicants().await.unwrap().len(), 5);
}

// ─── Derived relations ───────────────────────────────────────────────────────

#[tokio::test]
async fn reads_before_first_publish_are_source_unavailable() {
  let s = store().await;

  let err = s.status_summary().await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::SourceUnavailable);

  let failure = query::hiring_metrics(&s).await.unwrap_err();
  assert_eq!(failure.kind, ErrorKind::SourceUnavailable);
  assert!(failure.message.contains("time_to_hire"));
}

#[tokio::test]
async fn publish_replaces_previous_relations() {
  let s = store().await;
  let row = TimeToHireRecord {
    name:              "jane doe".into(),
    role:              "Engineer".into(),
    application_date:  date("2023-01-01"),
    hire_date:         date("2023-01-15"),
    department:        "Engineering".into(),
    time_to_hire_days: 14,
  };

  s.publish(DerivedRelations {
    time_to_hire:   vec![row.clone(), row.clone()],
    status_summary: vec![StatusSummaryRecord { status: "hired".into(), count: 2 }],
  })
  .await
  .unwrap();
  assert_eq!(s.time_to_hire().await.unwrap().len(), 2);

  s.publish(DerivedRelations {
    time_to_hire:   vec![row.clone()],
    status_summary: vec![],
  })
  .await
  .unwrap();
  assert_eq!(s.time_to_hire().await.unwrap(), vec![row]);
  assert!(s.status_summary().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_publish_keeps_previous_relations() {
  let s = store().await;
  let good = TimeToHireRecord {
    name:              "jane doe".into(),
    role:              "Engineer".into(),
    application_date:  date("2023-01-01"),
    hire_date:         date("2023-01-15"),
    department:        "Engineering".into(),
    time_to_hire_days: 14,
  };
  s.publish(DerivedRelations {
    time_to_hire:   vec![good.clone()],
    status_summary: vec![StatusSummaryRecord { status: "hired".into(), count: 1 }],
  })
  .await
  .unwrap();

  // A negative day count violates the table's CHECK constraint mid-build.
  let bad = TimeToHireRecord { time_to_hire_days: -3, ..good.clone() };
  let err = s
    .publish(DerivedRelations {
      time_to_hire:   vec![good.clone(), bad],
      status_summary: vec![],
    })
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::ComputationFailure);

  assert_eq!(s.time_to_hire().await.unwrap(), vec![good]);
  assert_eq!(s.status_summary().await.unwrap().len(), 1);
}

// ─── Engine against SQLite ───────────────────────────────────────────────────

#[tokio::test]
async fn reconcile_end_to_end() {
  let s = store().await;
  s.replace_records(records()).await.unwrap();
  let audit = KeepAudit::default();

  let report = engine::reconcile(&s, &audit).await.unwrap();
  assert_eq!(report.time_to_hire_rows, 2);
  assert_eq!(report.anomalies, 1);
  assert_eq!(report.audit, AuditStatus::Written { rows: 1 });

  let rows = s.time_to_hire().await.unwrap();
  assert_eq!(rows[0].name, "jane doe");
  assert_eq!(rows[0].time_to_hire_days, 14);
  assert_eq!(rows[1].name, "ana ruiz");
  assert_eq!(rows[1].time_to_hire_days, 1);
  assert!(rows.iter().all(|r| r.time_to_hire_days >= 0));

  let anomalies = audit.0.lock().unwrap().clone();
  assert_eq!(anomalies.len(), 1);
  assert_eq!(anomalies[0].name, "Sam Lee");
  assert_eq!(anomalies[0].error_reason, "Hire date precedes application date");

  let summary = s.status_summary().await.unwrap();
  assert_eq!(summary.iter().map(|r| r.count).sum::<u64>(), 5);
}

#[tokio::test]
async fn reconcile_twice_is_idempotent() {
  let s = store().await;
  s.replace_records(records()).await.unwrap();
  let audit = KeepAudit::default();

  let first = engine::reconcile(&s, &audit).await.unwrap();
  let rows = s.time_to_hire().await.unwrap();
  let summary = s.status_summary().await.unwrap();
  let anomalies = audit.0.lock().unwrap().clone();

  let second = engine::reconcile(&s, &audit).await.unwrap();
  assert_eq!(first.fingerprint, second.fingerprint);
  assert_eq!(rows, s.time_to_hire().await.unwrap());
  assert_eq!(summary, s.status_summary().await.unwrap());
  assert_eq!(anomalies, *audit.0.lock().unwrap());
}

#[tokio::test]
async fn reconcile_without_records_is_source_unavailable() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("empty.db");
  std::fs::write(&path, b"").unwrap();

  let s = SqliteStore::open_existing(&path).await.unwrap();
  let err = engine::reconcile(&s, &KeepAudit::default()).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::SourceUnavailable);
}

// ─── Query surface ───────────────────────────────────────────────────────────

async fn reconciled() -> SqliteStore {
  let s = store().await;
  s.replace_records(records()).await.unwrap();
  engine::reconcile(&s, &KeepAudit::default()).await.unwrap();
  s
}

#[tokio::test]
async fn hiring_metrics_average_per_department() {
  let s = store().await;
  let row = |department: &str, days: i64| TimeToHireRecord {
    name:              "x".into(),
    role:              "r".into(),
    application_date:  date("2023-01-01"),
    hire_date:         date("2023-01-01") + chrono::Days::new(days as u64),
    department:        department.into(),
    time_to_hire_days: days,
  };
  s.publish(DerivedRelations {
    time_to_hire:   vec![row("A", 1), row("A", 2), row("B", 1), row("B", 1), row("B", 2)],
    status_summary: vec![],
  })
  .await
  .unwrap();

  let listing = query::hiring_metrics(&s).await.unwrap();
  assert_eq!(listing.count, 2);
  assert_eq!(listing.data[0].department, "A");
  assert_eq!(listing.data[0].avg_time_to_hire, 1.5);
  assert_eq!(listing.data[1].department, "B");
  assert_eq!(listing.data[1].avg_time_to_hire, 1.3);
}

#[tokio::test]
async fn departments_without_valid_rows_are_absent() {
  let s = reconciled().await;
  let listing = query::hiring_metrics(&s).await.unwrap();

  let departments: Vec<_> = listing.data.iter().map(|m| m.department.as_str()).collect();
  // Sales only has an anomaly, Design only a missing hire date.
  assert_eq!(departments, vec!["Engineering"]);
  assert_eq!(listing.data[0].avg_time_to_hire, 7.5);
}

#[tokio::test]
async fn unfiltered_status_summary_is_the_precomputed_relation() {
  let s = reconciled().await;
  let listing = query::status_summary(&s).await.unwrap();

  assert_eq!(listing.data, s.status_summary().await.unwrap());
  let statuses: Vec<_> = listing.data.iter().map(|r| r.status.as_str()).collect();
  assert_eq!(statuses, vec!["Hired", "hired", "interviewing", "unknown"]);
}

#[tokio::test]
async fn filtered_status_summary_matches_case_insensitively() {
  let s = reconciled().await;

  let listing = query::status_summary_matching(&s, "HIRED").await.unwrap();
  assert_eq!(listing.count, 2);
  assert!(listing.data.iter().all(|r| r.status.to_lowercase() == "hired"));
  assert_eq!(listing.data, vec![
    StatusSummaryRecord { status: "Hired".into(), count: 1 },
    StatusSummaryRecord { status: "hired".into(), count: 2 },
  ]);
}

#[tokio::test]
async fn filtered_status_summary_without_matches_is_empty() {
  let s = reconciled().await;
  let listing = query::status_summary_matching(&s, "withdrawn").await.unwrap();
  assert_eq!(listing.count, 0);
  assert!(listing.data.is_empty());
}

#[tokio::test]
async fn top_roles_are_ordered_and_limited() {
  let s = reconciled().await;

  let listing = query::top_roles(&s, 2).await.unwrap();
  assert_eq!(listing.count, 2);
  assert_eq!(listing.data[0].role, "Engineer");
  assert_eq!(listing.data[0].count, 3);
  assert_eq!(listing.data[1].role, "Account Executive");
}

#[tokio::test]
async fn top_roles_limit_beyond_sqlite_range_is_unbounded() {
  let s = reconciled().await;

  let listing = query::top_roles(&s, usize::MAX).await.unwrap();
  assert_eq!(listing.count, 3);
}

#[tokio::test]
async fn failed_read_leaves_connection_usable() {
  let s = store().await;
  assert!(query::top_roles(&s, 10).await.is_ok());
  assert!(query::status_summary(&s).await.is_err());

  s.replace_records(records()).await.unwrap();
  engine::reconcile(&s, &KeepAudit::default()).await.unwrap();
  assert_eq!(query::status_summary(&s).await.unwrap().count, 4);
}
