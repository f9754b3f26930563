//! SQL schema for the HRIS SQLite store.
//!
//! Only the base tables are created up front. The derived relations exist
//! once the engine has published at least once; until then, reads against
//! them fail with "no such table".

/// Base table DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Dates are stored as ISO 8601 calendar dates (YYYY-MM-DD) or NULL.
CREATE TABLE IF NOT EXISTS employees (
    name        TEXT NOT NULL,
    department  TEXT NOT NULL DEFAULT '',
    hire_date   TEXT,
    end_date    TEXT
);

CREATE TABLE IF NOT EXISTS applicants (
    name             TEXT NOT NULL,
    role             TEXT NOT NULL DEFAULT '',
    application_date TEXT,
    status           TEXT NOT NULL DEFAULT 'unknown'
);

CREATE TABLE IF NOT EXISTS employment_types (
    employment_type TEXT NOT NULL UNIQUE
);

PRAGMA user_version = 1;
";

/// Staging DDL for the derived relations. [`publish`] fills these and renames
/// them over the live tables inside one transaction.
///
/// [`publish`]: hris_core::store::HrisStore::publish
pub const TIME_TO_HIRE_STAGING: &str = "
DROP TABLE IF EXISTS time_to_hire__staging;
CREATE TABLE time_to_hire__staging (
    name              TEXT    NOT NULL,
    role              TEXT    NOT NULL,
    application_date  TEXT    NOT NULL,
    hire_date         TEXT    NOT NULL,
    department        TEXT    NOT NULL,
    time_to_hire_days INTEGER NOT NULL CHECK (time_to_hire_days >= 0)
);
";

pub const STATUS_SUMMARY_STAGING: &str = "
DROP TABLE IF EXISTS status_summary__staging;
CREATE TABLE status_summary__staging (
    status TEXT    NOT NULL UNIQUE,
    count  INTEGER NOT NULL CHECK (count >= 0)
);
";

/// Swap the staging tables in.
pub const SWAP_DERIVED: &str = "
DROP TABLE IF EXISTS time_to_hire;
ALTER TABLE time_to_hire__staging RENAME TO time_to_hire;
DROP TABLE IF EXISTS status_summary;
ALTER TABLE status_summary__staging RENAME TO status_summary;
";

/// Derived relations computed from records that are about to be replaced.
pub const DROP_DERIVED: &str = "
DROP TABLE IF EXISTS time_to_hire;
DROP TABLE IF EXISTS status_summary;
";
