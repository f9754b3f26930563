//! The query surface: read-only accessors used by the serving layer.
//!
//! Every operation returns a [`Listing`] or a [`QueryFailure`]; a store error
//! never escapes as anything else. Mapping a failure onto a transport status
//! (e.g. HTTP 500) is the caller's business.
//!
//! Status counts come from two deliberately separate operations:
//! [`status_summary`] returns the precomputed relation verbatim, while
//! [`status_summary_matching`] recomputes counts live from the applicants
//! table with a case-insensitive filter.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
  derived::{DepartmentMetric, RoleCount, StatusSummaryRecord},
  error::{Classify, ErrorKind},
  store::HrisStore,
};

/// Default number of rows for [`top_roles`].
pub const DEFAULT_TOP_ROLES: usize = 10;

/// A query result: the rows and how many there are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing<T> {
  pub count: usize,
  pub data:  Vec<T>,
}

impl<T> From<Vec<T>> for Listing<T> {
  fn from(data: Vec<T>) -> Self { Self { count: data.len(), data } }
}

/// A structured query failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct QueryFailure {
  pub kind:    ErrorKind,
  pub message: String,
}

pub type QueryResult<T> = std::result::Result<Listing<T>, QueryFailure>;

fn settle<T, E>(operation: &'static str, result: Result<Vec<T>, E>) -> QueryResult<T>
where
  E: std::error::Error + Classify,
{
  match result {
    Ok(rows) => {
      tracing::debug!(operation, rows = rows.len(), "query served");
      Ok(Listing::from(rows))
    }
    Err(e) => {
      tracing::error!(operation, error = %e, "query failed");
      Err(QueryFailure { kind: e.kind(), message: e.to_string() })
    }
  }
}

/// Average time-to-hire per department. Departments with no valid rows are
/// absent rather than reported as zero.
pub async fn hiring_metrics<S: HrisStore>(store: &S) -> QueryResult<DepartmentMetric> {
  settle("hiring_metrics", store.hiring_metrics().await)
}

/// The precomputed status summary, verbatim.
pub async fn status_summary<S: HrisStore>(store: &S) -> QueryResult<StatusSummaryRecord> {
  settle("status_summary", store.status_summary().await)
}

/// Live status counts for applicants whose status equals `status`
/// case-insensitively, grouped by the status as stored.
///
/// No match yields an empty listing, not a failure.
pub async fn status_summary_matching<S: HrisStore>(
  store: &S,
  status: &str,
) -> QueryResult<StatusSummaryRecord> {
  settle(
    "status_summary_matching",
    store.status_summary_matching(status).await,
  )
}

/// The `limit` roles with the most applicants.
pub async fn top_roles<S: HrisStore>(store: &S, limit: usize) -> QueryResult<RoleCount> {
  settle("top_roles", store.top_roles(limit).await)
}
