//! Base records: the normalized tables owned by ingestion.
//!
//! The engine only ever reads these. Their identity is whatever ingestion
//! deduplicated on; there is no declared unique key.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Status assigned during ingestion when an applicant row has none.
pub const UNKNOWN_STATUS: &str = "unknown";

/// A hired employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
  pub name:       String,
  pub department: String,
  pub hire_date:  Option<NaiveDate>,
  pub end_date:   Option<NaiveDate>,
}

/// A job applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
  pub name:             String,
  pub role:             String,
  pub application_date: Option<NaiveDate>,
  pub status:           String,
}

/// An employment type. Carried through the store; the engine does not join
/// on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentType {
  pub employment_type: String,
}

/// The full contents of the record store, as written by one ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
  pub employees:        Vec<Employee>,
  pub applicants:       Vec<Applicant>,
  pub employment_types: Vec<EmploymentType>,
}

/// The join key for a person's name: trimmed and lowercased.
///
/// Returns `None` for a blank name; blank names never match anything.
pub fn join_key(name: &str) -> Option<String> {
  let key = name.trim().to_lowercase();
  (!key.is_empty()).then_some(key)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn join_key_ignores_case_and_surrounding_whitespace() {
    assert_eq!(join_key("  Jane Doe "), Some("jane doe".into()));
    assert_eq!(join_key("JANE DOE"), join_key("jane doe"));
  }

  #[test]
  fn join_key_keeps_inner_whitespace() {
    assert_ne!(join_key("Jane  Doe"), join_key("Jane Doe"));
  }

  #[test]
  fn blank_names_have_no_key() {
    assert_eq!(join_key(""), None);
    assert_eq!(join_key("   "), None);
  }
}
