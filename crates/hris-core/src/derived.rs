//! Derived relations and query result rows.
//!
//! Everything here is recomputed in full on every engine run; nothing is
//! updated incrementally.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reason attached to every anomaly row.
pub const ANOMALY_REASON: &str = "Hire date precedes application date";

// ─── Published relations ─────────────────────────────────────────────────────

/// One valid applicant/employee match.
///
/// `name` is the normalized join key, not the raw applicant name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeToHireRecord {
  pub name:              String,
  pub role:              String,
  pub application_date:  NaiveDate,
  pub hire_date:         NaiveDate,
  pub department:        String,
  /// `hire_date - application_date` in whole days; never negative.
  pub time_to_hire_days: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummaryRecord {
  pub status: String,
  pub count:  u64,
}

/// The relations the engine publishes to the store in one swap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedRelations {
  pub time_to_hire:   Vec<TimeToHireRecord>,
  pub status_summary: Vec<StatusSummaryRecord>,
}

// ─── Audit ───────────────────────────────────────────────────────────────────

/// A matched pair whose hire date precedes the application date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyRecord {
  pub name:             String,
  pub role:             String,
  pub application_date: NaiveDate,
  pub hire_date:        NaiveDate,
  pub department:       String,
  pub error_reason:     String,
}

// ─── Query rows ──────────────────────────────────────────────────────────────

/// Average time-to-hire for one department, rounded to one decimal place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentMetric {
  pub department:       String,
  pub avg_time_to_hire: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCount {
  pub role:  String,
  pub count: u64,
}
