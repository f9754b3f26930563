//! `GET /hiring-metrics`

use std::sync::Arc;

use axum::{Json, extract::State};
use hris_core::{
  derived::DepartmentMetric,
  query::{self, Listing},
  store::HrisStore,
};

use crate::error::ApiError;

/// Average time-to-hire per department.
pub async fn hiring_metrics<S: HrisStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Listing<DepartmentMetric>>, ApiError> {
  Ok(Json(query::hiring_metrics(store.as_ref()).await?))
}
