//! Source ingestion: spreadsheet exports → [`RecordSet`].
//!
//! Each export is read with trimmed cells and snake_case headers. Dates that
//! cannot be parsed become absent rather than failing the load, a missing
//! applicant status becomes [`UNKNOWN_STATUS`], and exact duplicates are
//! removed with the first occurrence winning. Removed rows are kept so they
//! can be written to the drop log.

use std::{
  collections::HashSet,
  fs,
  path::{Path, PathBuf},
};

use hris_core::record::{
  Applicant, Employee, EmploymentType, RecordSet, UNKNOWN_STATUS,
};

use crate::{
  date::parse_date,
  error::{Error, Result},
  header::normalize_header,
};

pub const EMPLOYEES_FILE: &str = "employees.csv";
pub const APPLICANTS_FILE: &str = "applicants.csv";
pub const EMPLOYMENT_TYPES_FILE: &str = "employment_types.csv";

pub const DROPPED_EMPLOYEES_FILE: &str = "dropped_employees.csv";
pub const DROPPED_APPLICANTS_FILE: &str = "dropped_applicants.csv";

// ─── Output ──────────────────────────────────────────────────────────────────

/// Duplicate rows removed from one export, as read (normalized headers,
/// trimmed cells).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dropped {
  pub headers: Vec<String>,
  pub rows:    Vec<Vec<String>>,
}

/// How many date cells were absent or unreadable after coercion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullDates {
  pub hire_dates:        usize,
  pub application_dates: usize,
}

/// The result of reading one source directory.
#[derive(Debug, Clone, Default)]
pub struct Ingested {
  pub records:                  RecordSet,
  pub dropped_employees:        Dropped,
  pub dropped_applicants:       Dropped,
  pub dropped_employment_types: usize,
  pub null_dates:               NullDates,
}

// ─── Reading ─────────────────────────────────────────────────────────────────

/// Read `employees.csv`, `applicants.csv` and `employment_types.csv` from
/// `dir`.
pub fn read_source(dir: &Path) -> Result<Ingested> {
  let (employees, dropped_employees) =
    employees(&Table::read(&dir.join(EMPLOYEES_FILE))?)?;
  let (applicants, dropped_applicants) =
    applicants(&Table::read(&dir.join(APPLICANTS_FILE))?)?;
  let (employment_types, dropped_employment_types) =
    employment_types(&Table::read(&dir.join(EMPLOYMENT_TYPES_FILE))?)?;

  let null_dates = NullDates {
    hire_dates:        employees.iter().filter(|e| e.hire_date.is_none()).count(),
    application_dates: applicants
      .iter()
      .filter(|a| a.application_date.is_none())
      .count(),
  };

  tracing::info!(
    employees = employees.len(),
    dropped = dropped_employees.rows.len(),
    "employees deduplicated"
  );
  tracing::info!(
    applicants = applicants.len(),
    dropped = dropped_applicants.rows.len(),
    "applicants deduplicated"
  );
  tracing::info!(
    employment_types = employment_types.len(),
    dropped = dropped_employment_types,
    "employment types deduplicated"
  );
  tracing::info!(
    missing_hire_dates = null_dates.hire_dates,
    missing_application_dates = null_dates.application_dates,
    "null date summary"
  );

  Ok(Ingested {
    records: RecordSet { employees, applicants, employment_types },
    dropped_employees,
    dropped_applicants,
    dropped_employment_types,
    null_dates,
  })
}

struct Table {
  headers: Vec<String>,
  rows:    Vec<Vec<String>>,
}

impl Table {
  fn read(path: &Path) -> Result<Self> {
    if !path.is_file() {
      return Err(Error::SourceMissing(path.to_path_buf()));
    }
    let csv_err = |source: csv::Error| Error::Csv { path: path.to_path_buf(), source };

    let mut reader = csv::ReaderBuilder::new()
      .trim(csv::Trim::All)
      .flexible(true)
      .from_path(path)
      .map_err(csv_err)?;

    let headers = reader
      .headers()
      .map_err(csv_err)?
      .iter()
      .map(normalize_header)
      .collect();

    let rows = reader
      .records()
      .map(|record| record.map(|r| r.iter().map(str::to_owned).collect()))
      .collect::<Result<Vec<Vec<String>>, csv::Error>>()
      .map_err(csv_err)?;

    Ok(Self { headers, rows })
  }

  fn column(&self, name: &str) -> Option<usize> {
    self.headers.iter().position(|h| h == name)
  }

  fn require(&self, table: &'static str, column: &'static str) -> Result<usize> {
    self.column(column).ok_or(Error::MissingColumn { table, column })
  }

  fn dropped(&self) -> Dropped {
    Dropped { headers: self.headers.clone(), rows: Vec::new() }
  }
}

/// Short rows read as empty cells.
fn cell(row: &[String], idx: usize) -> &str {
  row.get(idx).map(String::as_str).unwrap_or_default()
}

// ── tables ───────────────────────────────────────────────────────────────────

fn employees(table: &Table) -> Result<(Vec<Employee>, Dropped)> {
  let name = table.require("employees", "name")?;
  let department = table.require("employees", "department")?;
  // Exports name the hire date `start_date`; accept the canonical name too.
  let hire = table
    .column("start_date")
    .or_else(|| table.column("hire_date"))
    .ok_or(Error::MissingColumn { table: "employees", column: "start_date" })?;
  let end = table.column("end_date");

  let mut seen = HashSet::new();
  let mut kept = Vec::new();
  let mut dropped = table.dropped();

  for row in &table.rows {
    let employee = Employee {
      name:       cell(row, name).to_owned(),
      department: cell(row, department).to_owned(),
      hire_date:  parse_date(cell(row, hire)),
      end_date:   end.and_then(|i| parse_date(cell(row, i))),
    };
    let key = (
      employee.name.clone(),
      employee.hire_date,
      employee.department.clone(),
    );
    if seen.insert(key) {
      kept.push(employee);
    } else {
      dropped.rows.push(row.clone());
    }
  }

  Ok((kept, dropped))
}

fn applicants(table: &Table) -> Result<(Vec<Applicant>, Dropped)> {
  let name = table.require("applicants", "name")?;
  let role = table.require("applicants", "role")?;
  let applied = table.require("applicants", "application_date")?;
  let status = table.column("status");

  let mut seen = HashSet::new();
  let mut kept = Vec::new();
  let mut dropped = table.dropped();

  for row in &table.rows {
    let status = status
      .map(|i| cell(row, i))
      .filter(|s| !s.is_empty())
      .unwrap_or(UNKNOWN_STATUS);
    let applicant = Applicant {
      name:             cell(row, name).to_owned(),
      role:             cell(row, role).to_owned(),
      application_date: parse_date(cell(row, applied)),
      status:           status.to_owned(),
    };
    let key = (
      applicant.name.clone(),
      applicant.role.clone(),
      applicant.application_date,
    );
    if seen.insert(key) {
      kept.push(applicant);
    } else {
      dropped.rows.push(row.clone());
    }
  }

  Ok((kept, dropped))
}

fn employment_types(table: &Table) -> Result<(Vec<EmploymentType>, usize)> {
  let column = table.require("employment_types", "employment_type")?;

  let mut seen = HashSet::new();
  let mut kept = Vec::new();
  let mut dropped = 0;

  for row in &table.rows {
    let value = cell(row, column);
    if seen.insert(value) {
      kept.push(EmploymentType { employment_type: value.to_owned() });
    } else {
      dropped += 1;
    }
  }

  Ok((kept, dropped))
}

// ─── Drop log ────────────────────────────────────────────────────────────────

/// Write the dropped employee and applicant rows under `log_dir`, creating
/// it if needed. Both files are always written so a clean run overwrites the
/// previous run's log.
pub fn write_dropped(log_dir: &Path, ingested: &Ingested) -> Result<Vec<PathBuf>> {
  fs::create_dir_all(log_dir)
    .map_err(|source| Error::Io { path: log_dir.to_path_buf(), source })?;

  let mut written = Vec::with_capacity(2);
  for (file, dropped) in [
    (DROPPED_EMPLOYEES_FILE, &ingested.dropped_employees),
    (DROPPED_APPLICANTS_FILE, &ingested.dropped_applicants),
  ] {
    let path = log_dir.join(file);
    write_rows(&path, dropped)?;
    tracing::debug!(path = %path.display(), rows = dropped.rows.len(), "wrote drop log");
    written.push(path);
  }
  Ok(written)
}

fn write_rows(path: &Path, dropped: &Dropped) -> Result<()> {
  let write_err = |source: csv::Error| Error::Write { path: path.to_path_buf(), source };

  let mut writer = csv::Writer::from_path(path).map_err(write_err)?;
  writer.write_record(&dropped.headers).map_err(write_err)?;
  for row in &dropped.rows {
    writer.write_record(row).map_err(write_err)?;
  }
  writer
    .flush()
    .map_err(|source| Error::Io { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use hris_core::{Classify, ErrorKind};

  use super::*;

  fn write(dir: &Path, file: &str, contents: &str) {
    fs::write(dir.join(file), contents).unwrap();
  }

  fn source_dir(employees: &str, applicants: &str, types: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), EMPLOYEES_FILE, employees);
    write(dir.path(), APPLICANTS_FILE, applicants);
    write(dir.path(), EMPLOYMENT_TYPES_FILE, types);
    dir
  }

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  const EMPLOYEES: &str = "\
Name, Department, Start Date, End Date
Jane Doe, Engineering, 2023-01-15,
Sam Lee, Sales, 01/20/2023, 2024-06-30
Jane Doe, Engineering, 2023-01-15,
Ana Ruiz, Engineering, soon,
";

  const APPLICANTS: &str = "\
Name, Role, Application Date, Status
jane doe, Engineer, 2023-01-01, hired
Sam Lee, Account Executive, 2023-02-01,
jane doe, Engineer, 2023-01-01, hired
Ana Ruiz, Engineer, 2023-03-01 00:00:00, interviewing
";

  const TYPES: &str = "\
Employment Type
Full-time
Contract
Full-time
";

  #[test]
  fn reads_and_normalizes_all_three_exports() {
    let dir = source_dir(EMPLOYEES, APPLICANTS, TYPES);
    let ingested = read_source(dir.path()).unwrap();
    let records = &ingested.records;

    assert_eq!(records.employees.len(), 3);
    assert_eq!(records.employees[0], Employee {
      name:       "Jane Doe".into(),
      department: "Engineering".into(),
      hire_date:  Some(ymd(2023, 1, 15)),
      end_date:   None,
    });
    assert_eq!(records.employees[1].hire_date, Some(ymd(2023, 1, 20)));
    assert_eq!(records.employees[1].end_date, Some(ymd(2024, 6, 30)));

    assert_eq!(records.applicants.len(), 3);
    assert_eq!(
      records.applicants[2].application_date,
      Some(ymd(2023, 3, 1))
    );

    let types: Vec<_> = records
      .employment_types
      .iter()
      .map(|t| t.employment_type.as_str())
      .collect();
    assert_eq!(types, ["Full-time", "Contract"]);
    assert_eq!(ingested.dropped_employment_types, 1);
  }

  #[test]
  fn missing_status_becomes_unknown() {
    let dir = source_dir(EMPLOYEES, APPLICANTS, TYPES);
    let ingested = read_source(dir.path()).unwrap();
    assert_eq!(ingested.records.applicants[1].status, UNKNOWN_STATUS);
  }

  #[test]
  fn status_column_is_optional() {
    let dir = source_dir(
      EMPLOYEES,
      "name,role,application_date\nJane Doe,Engineer,2023-01-01\n",
      TYPES,
    );
    let ingested = read_source(dir.path()).unwrap();
    assert_eq!(ingested.records.applicants[0].status, UNKNOWN_STATUS);
  }

  #[test]
  fn unreadable_dates_are_counted_not_fatal() {
    let dir = source_dir(EMPLOYEES, APPLICANTS, TYPES);
    let ingested = read_source(dir.path()).unwrap();
    assert_eq!(ingested.records.employees[2].hire_date, None);
    assert_eq!(ingested.null_dates, NullDates {
      hire_dates:        1,
      application_dates: 0,
    });
  }

  #[test]
  fn duplicates_keep_first_occurrence() {
    let dir = source_dir(EMPLOYEES, APPLICANTS, TYPES);
    let ingested = read_source(dir.path()).unwrap();

    assert_eq!(ingested.dropped_employees.rows, [vec![
      "Jane Doe".to_owned(),
      "Engineering".into(),
      "2023-01-15".into(),
      String::new(),
    ]]);
    assert_eq!(ingested.dropped_employees.headers, [
      "name",
      "department",
      "start_date",
      "end_date"
    ]);
    assert_eq!(ingested.dropped_applicants.rows.len(), 1);
  }

  #[test]
  fn same_person_different_role_is_not_a_duplicate() {
    let dir = source_dir(
      EMPLOYEES,
      "name,role,application_date\n\
       Jane Doe,Engineer,2023-01-01\n\
       Jane Doe,Designer,2023-01-01\n",
      TYPES,
    );
    let ingested = read_source(dir.path()).unwrap();
    assert_eq!(ingested.records.applicants.len(), 2);
    assert!(ingested.dropped_applicants.rows.is_empty());
  }

  #[test]
  fn hire_date_header_is_accepted() {
    let dir = source_dir(
      "name,department,hire_date\nJane Doe,Engineering,2023-01-15\n",
      APPLICANTS,
      TYPES,
    );
    let ingested = read_source(dir.path()).unwrap();
    assert_eq!(
      ingested.records.employees[0].hire_date,
      Some(ymd(2023, 1, 15))
    );
  }

  #[test]
  fn missing_file_is_source_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), EMPLOYEES_FILE, EMPLOYEES);

    let err = read_source(dir.path()).unwrap_err();
    assert!(matches!(err, Error::SourceMissing(ref p) if p.ends_with(APPLICANTS_FILE)));
    assert_eq!(err.kind(), ErrorKind::SourceUnavailable);
  }

  #[test]
  fn missing_column_is_schema_violation() {
    let dir = source_dir(
      EMPLOYEES,
      "name,application_date\nJane Doe,2023-01-01\n",
      TYPES,
    );

    let err = read_source(dir.path()).unwrap_err();
    assert!(matches!(err, Error::MissingColumn {
      table:  "applicants",
      column: "role",
    }));
    assert_eq!(err.kind(), ErrorKind::SchemaViolation);
  }

  #[test]
  fn drop_logs_are_written_with_headers() {
    let dir = source_dir(EMPLOYEES, APPLICANTS, TYPES);
    let ingested = read_source(dir.path()).unwrap();
    let log_dir = dir.path().join("logs");

    let written = write_dropped(&log_dir, &ingested).unwrap();
    assert_eq!(written.len(), 2);

    let employees = fs::read_to_string(log_dir.join(DROPPED_EMPLOYEES_FILE)).unwrap();
    assert_eq!(
      employees,
      "name,department,start_date,end_date\nJane Doe,Engineering,2023-01-15,\n"
    );
    let applicants = fs::read_to_string(log_dir.join(DROPPED_APPLICANTS_FILE)).unwrap();
    assert!(applicants.starts_with("name,role,application_date,status\n"));
  }
}
