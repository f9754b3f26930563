//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use hris_core::query::QueryFailure;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Query(#[from] QueryFailure),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Query(failure) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": failure.message, "kind": failure.kind })),
      )
        .into_response(),
    }
  }
}
