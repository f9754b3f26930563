//! JSON REST API for the HRIS metrics engine.
//!
//! Exposes an axum [`Router`] over the read-only query surface, backed by any
//! [`hris_core::store::HrisStore`]. Every success body is a
//! [`Listing`](hris_core::query::Listing) (`{"count": n, "data": [...]}`);
//! every query failure is a 500 with `{"error": ..., "kind": ...}`.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = hris_api::api_router(Arc::new(store));
//! ```

pub mod applicants;
pub mod error;
pub mod metrics;

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use hris_core::store::HrisStore;
use serde_json::{Value, json};

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: HrisStore + 'static,
{
  Router::new()
    .route("/hiring-metrics", get(metrics::hiring_metrics::<S>))
    .route("/applicants/status-summary", get(applicants::status_summary::<S>))
    .route("/applicants/top-roles", get(applicants::top_roles::<S>))
    .route("/health", get(health))
    .with_state(store)
}

/// `GET /health`
async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

// ─── Integration tests ────────────────────────────────────────────────────────
