//! The `HrisStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `hris-store-sqlite`).
//! The engine, the query surface and the HTTP layer depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  derived::{
    DepartmentMetric, DerivedRelations, RoleCount, StatusSummaryRecord,
    TimeToHireRecord,
  },
  error::Classify,
  record::{Applicant, Employee, EmploymentType, RecordSet},
};

/// Abstraction over the relational store behind the pipeline.
///
/// The base tables (employees, applicants, employment types) belong to
/// ingestion and are only ever replaced wholesale through
/// [`replace_records`](HrisStore::replace_records). The derived relations
/// belong to the engine and are only ever replaced wholesale through
/// [`publish`](HrisStore::publish). Both replacements must be atomic: a reader
/// sees either the previous contents or the new ones.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait HrisStore: Send + Sync {
  type Error: std::error::Error + Classify + Send + Sync + 'static;

  // ── Record store ──────────────────────────────────────────────────────

  /// Replace all three base tables with `records`.
  fn replace_records(
    &self,
    records: RecordSet,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All employees, in insertion order.
  fn employees(
    &self,
  ) -> impl Future<Output = Result<Vec<Employee>, Self::Error>> + Send + '_;

  /// All applicants, in insertion order.
  fn applicants(
    &self,
  ) -> impl Future<Output = Result<Vec<Applicant>, Self::Error>> + Send + '_;

  fn employment_types(
    &self,
  ) -> impl Future<Output = Result<Vec<EmploymentType>, Self::Error>> + Send + '_;

  // ── Derived relations ─────────────────────────────────────────────────

  /// Replace `time_to_hire` and `status_summary` with `derived`.
  ///
  /// Implementations build the new relations aside and swap them in, so a
  /// failure leaves the previously published relations untouched.
  fn publish(
    &self,
    derived: DerivedRelations,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The published `time_to_hire` relation.
  fn time_to_hire(
    &self,
  ) -> impl Future<Output = Result<Vec<TimeToHireRecord>, Self::Error>> + Send + '_;

  /// The published `status_summary` relation, verbatim.
  fn status_summary(
    &self,
  ) -> impl Future<Output = Result<Vec<StatusSummaryRecord>, Self::Error>> + Send + '_;

  // ── Reads over derived and base data ──────────────────────────────────

  /// Mean `time_to_hire_days` per department present in `time_to_hire`,
  /// rounded to one decimal place.
  fn hiring_metrics(
    &self,
  ) -> impl Future<Output = Result<Vec<DepartmentMetric>, Self::Error>> + Send + '_;

  /// Live status counts over the applicants table, restricted to rows whose
  /// status equals `status` case-insensitively. Rows are grouped by the
  /// status as stored, so `"Hired"` and `"hired"` stay separate.
  fn status_summary_matching<'a>(
    &'a self,
    status: &'a str,
  ) -> impl Future<Output = Result<Vec<StatusSummaryRecord>, Self::Error>> + Send + 'a;

  /// The `limit` roles with the most applicants, busiest first.
  fn top_roles(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<RoleCount>, Self::Error>> + Send + '_;
}
