//! Handlers for `/applicants` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/applicants/status-summary` | optional `status`; blank means unfiltered |
//! | `GET`  | `/applicants/top-roles` | optional `limit`, default 10 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use hris_core::{
  derived::{RoleCount, StatusSummaryRecord},
  query::{self, DEFAULT_TOP_ROLES, Listing},
  store::HrisStore,
};
use serde::Deserialize;

use crate::error::ApiError;

// ─── Status summary ──────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct StatusParams {
  /// Case-insensitive status filter.
  pub status: Option<String>,
}

/// `GET /applicants/status-summary[?status=...]`
///
/// Without a filter this serves the precomputed relation; with one it counts
/// live from the applicants table.
pub async fn status_summary<S: HrisStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<StatusParams>,
) -> Result<Json<Listing<StatusSummaryRecord>>, ApiError> {
  let listing = match params.status.as_deref().map(str::trim) {
    Some(status) if !status.is_empty() => {
      query::status_summary_matching(store.as_ref(), status).await?
    }
    _ => query::status_summary(store.as_ref()).await?,
  };
  Ok(Json(listing))
}

// ─── Top roles ───────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct TopRolesParams {
  pub limit: Option<usize>,
}

/// `GET /applicants/top-roles[?limit=N]`
pub async fn top_roles<S: HrisStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<TopRolesParams>,
) -> Result<Json<Listing<RoleCount>>, ApiError> {
  let limit = params.limit.unwrap_or(DEFAULT_TOP_ROLES);
  Ok(Json(query::top_roles(store.as_ref(), limit).await?))
}
