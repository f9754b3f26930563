//! [`SqliteStore`]: the SQLite implementation of [`HrisStore`].

use std::path::Path;

use hris_core::{
  derived::{
    DepartmentMetric, DerivedRelations, RoleCount, StatusSummaryRecord,
    TimeToHireRecord,
  },
  record::{Applicant, Employee, EmploymentType, RecordSet},
  store::HrisStore,
};

use crate::{
  Error, Result,
  encode::{
    RawApplicant, RawCount, RawEmployee, RawEmploymentType, RawMetric,
    RawTimeToHire, encode_count, encode_date,
  },
  schema::{
    DROP_DERIVED, SCHEMA, STATUS_SUMMARY_STAGING, SWAP_DERIVED,
    TIME_TO_HIRE_STAGING,
  },
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An HRIS store backed by a single SQLite file.
///
/// Every operation is one scoped [`call`](tokio_rusqlite::Connection::call)
/// on the connection thread; statements and transactions are dropped before
/// the call returns, on success and on error alike.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and initialise the base tables.
  ///
  /// Used by ingestion, which owns the base tables.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a store that must already exist.
  ///
  /// Used by the engine and the serving layer: a missing file is
  /// [`Error::Missing`] rather than a fresh, empty database.
  pub async fn open_existing(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if !path.is_file() {
      return Err(Error::Missing(path.to_path_buf()));
    }
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Ok(Self { conn })
  }

  /// Open an in-memory store. Useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a grouped `(label, count)` query.
  async fn counts(
    &self,
    sql: &'static str,
    param: Option<String>,
  ) -> Result<Vec<RawCount>> {
    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let map = |row: &rusqlite::Row<'_>| -> rusqlite::Result<RawCount> {
          Ok(RawCount { label: row.get(0)?, count: row.get(1)? })
        };
        let rows = match param {
          Some(p) => stmt
            .query_map(rusqlite::params![p], map)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], map)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;
    Ok(raws)
  }
}

// ─── HrisStore impl ──────────────────────────────────────────────────────────

impl HrisStore for SqliteStore {
  type Error = Error;

  // ── Record store ──────────────────────────────────────────────────────────

  async fn replace_records(&self, records: RecordSet) -> Result<()> {
    let employees: Vec<_> = records
      .employees
      .into_iter()
      .map(|e| {
        (
          e.name,
          e.department,
          e.hire_date.map(encode_date),
          e.end_date.map(encode_date),
        )
      })
      .collect();
    let applicants: Vec<_> = records
      .applicants
      .into_iter()
      .map(|a| (a.name, a.role, a.application_date.map(encode_date), a.status))
      .collect();
    let employment_types = records.employment_types;

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute_batch(
          "DELETE FROM employees;
           DELETE FROM applicants;
           DELETE FROM employment_types;",
        )?;
        tx.execute_batch(DROP_DERIVED)?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO employees (name, department, hire_date, end_date)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for (name, department, hire_date, end_date) in &employees {
            stmt.execute(rusqlite::params![name, department, hire_date, end_date])?;
          }

          let mut stmt = tx.prepare(
            "INSERT INTO applicants (name, role, application_date, status)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for (name, role, application_date, status) in &applicants {
            stmt.execute(rusqlite::params![name, role, application_date, status])?;
          }

          let mut stmt =
            tx.prepare("INSERT INTO employment_types (employment_type) VALUES (?1)")?;
          for et in &employment_types {
            stmt.execute(rusqlite::params![et.employment_type])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn employees(&self) -> Result<Vec<Employee>> {
    let raws: Vec<RawEmployee> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT name, department, hire_date, end_date
           FROM employees ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawEmployee {
              name:       row.get(0)?,
              department: row.get(1)?,
              hire_date:  row.get(2)?,
              end_date:   row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawEmployee::into_employee).collect())
  }

  async fn applicants(&self) -> Result<Vec<Applicant>> {
    let raws: Vec<RawApplicant> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT name, role, application_date, status
           FROM applicants ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawApplicant {
              name:             row.get(0)?,
              role:             row.get(1)?,
              application_date: row.get(2)?,
              status:           row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawApplicant::into_applicant).collect())
  }

  async fn employment_types(&self) -> Result<Vec<EmploymentType>> {
    let raws: Vec<RawEmploymentType> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT employment_type FROM employment_types ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawEmploymentType { employment_type: row.get(0)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      raws
        .into_iter()
        .map(RawEmploymentType::into_employment_type)
        .collect(),
    )
  }

  // ── Derived relations ─────────────────────────────────────────────────────

  async fn publish(&self, derived: DerivedRelations) -> Result<()> {
    let time_to_hire: Vec<_> = derived
      .time_to_hire
      .into_iter()
      .map(|r| {
        (
          r.name,
          r.role,
          encode_date(r.application_date),
          encode_date(r.hire_date),
          r.department,
          r.time_to_hire_days,
        )
      })
      .collect();
    let status_summary = derived
      .status_summary
      .into_iter()
      .map(|r| Ok((r.status, encode_count(r.count)?)))
      .collect::<Result<Vec<_>>>()?;

    self
      .conn
      .call(move |conn| {
        // Build aside, then swap: either both relations are replaced or,
        // on any error, the transaction rolls back on drop and the previous
        // relations stay published.
        let tx = conn.transaction()?;
        tx.execute_batch(TIME_TO_HIRE_STAGING)?;
        tx.execute_batch(STATUS_SUMMARY_STAGING)?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO time_to_hire__staging (
               name, role, application_date, hire_date, department, time_to_hire_days
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          )?;
          for (name, role, applied, hired, department, days) in &time_to_hire {
            stmt.execute(rusqlite::params![name, role, applied, hired, department, days])?;
          }

          let mut stmt = tx.prepare(
            "INSERT INTO status_summary__staging (status, count) VALUES (?1, ?2)",
          )?;
          for (status, count) in &status_summary {
            stmt.execute(rusqlite::params![status, count])?;
          }
        }
        tx.execute_batch(SWAP_DERIVED)?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn time_to_hire(&self) -> Result<Vec<TimeToHireRecord>> {
    let raws: Vec<RawTimeToHire> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT name, role, application_date, hire_date, department, time_to_hire_days
           FROM time_to_hire ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawTimeToHire {
              name:              row.get(0)?,
              role:              row.get(1)?,
              application_date:  row.get(2)?,
              hire_date:         row.get(3)?,
              department:        row.get(4)?,
              time_to_hire_days: row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTimeToHire::into_record).collect()
  }

  async fn status_summary(&self) -> Result<Vec<StatusSummaryRecord>> {
    self
      .counts("SELECT status, count FROM status_summary ORDER BY rowid", None)
      .await?
      .into_iter()
      .map(RawCount::into_status)
      .collect()
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn hiring_metrics(&self) -> Result<Vec<DepartmentMetric>> {
    let raws: Vec<RawMetric> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT department, ROUND(AVG(time_to_hire_days), 1) AS avg_time_to_hire
           FROM time_to_hire
           GROUP BY department
           ORDER BY department",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawMetric {
              department:       row.get(0)?,
              avg_time_to_hire: row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawMetric::into_metric).collect())
  }

  async fn status_summary_matching(
    &self,
    status: &str,
  ) -> Result<Vec<StatusSummaryRecord>> {
    // LOWER() folds ASCII only.
    self
      .counts(
        "SELECT status, COUNT(*) AS count
         FROM applicants
         WHERE LOWER(status) = ?1
         GROUP BY status
         ORDER BY status",
        Some(status.to_lowercase()),
      )
      .await?
      .into_iter()
      .map(RawCount::into_status)
      .collect()
  }

  async fn top_roles(&self, limit: usize) -> Result<Vec<RoleCount>> {
    // SQLite LIMIT is an i64; larger requests mean "all roles".
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let raws: Vec<RawCount> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT role, COUNT(*) AS count
           FROM applicants
           GROUP BY role
           ORDER BY count DESC, role
           LIMIT ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![limit], |row| {
            Ok(RawCount { label: row.get(0)?, count: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCount::into_role).collect()
  }
}
