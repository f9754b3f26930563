//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` strings. Counts are stored as SQLite
//! integers (`i64`) and exposed as `u64`.

use chrono::NaiveDate;
use hris_core::{
  derived::{
    DepartmentMetric, RoleCount, StatusSummaryRecord, TimeToHireRecord,
  },
  record::{Applicant, Employee, EmploymentType, UNKNOWN_STATUS},
};

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

/// Decode a nullable base-table date.
///
/// Base tables are written by ingestion and may hold anything. A value that
/// is not a date is read as absent, so the row simply fails the join's date
/// predicates. A trailing time component (`2023-01-15 00:00:00`) is accepted.
pub fn decode_date_lenient(column: &str, s: Option<&str>) -> Option<NaiveDate> {
  let s = s?.trim();
  let date_part = s.split([' ', 'T']).next().unwrap_or(s);
  match decode_date(date_part) {
    Ok(d) => Some(d),
    Err(e) => {
      tracing::debug!(column, error = %e, "unreadable date treated as absent");
      None
    }
  }
}

// ─── Counts ──────────────────────────────────────────────────────────────────

pub fn encode_count(n: u64) -> Result<i64> { Ok(i64::try_from(n)?) }

pub fn decode_count(n: i64) -> Result<u64> { Ok(u64::try_from(n)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from an `employees` row.
pub struct RawEmployee {
  pub name:       Option<String>,
  pub department: Option<String>,
  pub hire_date:  Option<String>,
  pub end_date:   Option<String>,
}

impl RawEmployee {
  pub fn into_employee(self) -> Employee {
    Employee {
      name:       self.name.unwrap_or_default(),
      department: self.department.unwrap_or_default(),
      hire_date:  decode_date_lenient("hire_date", self.hire_date.as_deref()),
      end_date:   decode_date_lenient("end_date", self.end_date.as_deref()),
    }
  }
}

/// Raw values read directly from an `applicants` row.
pub struct RawApplicant {
  pub name:             Option<String>,
  pub role:             Option<String>,
  pub application_date: Option<String>,
  pub status:           Option<String>,
}

impl RawApplicant {
  pub fn into_applicant(self) -> Applicant {
    Applicant {
      name:             self.name.unwrap_or_default(),
      role:             self.role.unwrap_or_default(),
      application_date: decode_date_lenient(
        "application_date",
        self.application_date.as_deref(),
      ),
      status:           self
        .status
        .unwrap_or_else(|| UNKNOWN_STATUS.to_owned()),
    }
  }
}

pub struct RawEmploymentType {
  pub employment_type: String,
}

impl RawEmploymentType {
  pub fn into_employment_type(self) -> EmploymentType {
    EmploymentType { employment_type: self.employment_type }
  }
}

/// Raw values read from the published `time_to_hire` relation. The engine
/// wrote these, so dates must decode.
pub struct RawTimeToHire {
  pub name:              String,
  pub role:              String,
  pub application_date:  String,
  pub hire_date:         String,
  pub department:        String,
  pub time_to_hire_days: i64,
}

impl RawTimeToHire {
  pub fn into_record(self) -> Result<TimeToHireRecord> {
    Ok(TimeToHireRecord {
      name:              self.name,
      role:              self.role,
      application_date:  decode_date(&self.application_date)?,
      hire_date:         decode_date(&self.hire_date)?,
      department:        self.department,
      time_to_hire_days: self.time_to_hire_days,
    })
  }
}

/// A `(label, count)` pair from any grouped count query.
pub struct RawCount {
  pub label: String,
  pub count: i64,
}

impl RawCount {
  pub fn into_status(self) -> Result<StatusSummaryRecord> {
    Ok(StatusSummaryRecord {
      status: self.label,
      count:  decode_count(self.count)?,
    })
  }

  pub fn into_role(self) -> Result<RoleCount> {
    Ok(RoleCount { role: self.label, count: decode_count(self.count)? })
  }
}

pub struct RawMetric {
  pub department:       String,
  pub avg_time_to_hire: f64,
}

impl RawMetric {
  pub fn into_metric(self) -> DepartmentMetric {
    DepartmentMetric {
      department:       self.department,
      avg_time_to_hire: self.avg_time_to_hire,
    }
  }
}
