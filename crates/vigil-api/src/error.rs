//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Error bodies are `{"detail": "<message>"}` across the surface. Store
//! errors pass their message through on a 500 — acceptable for an internal
//! tool, flagged as a hardening item for anything public-facing.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Malformed or out-of-range input, including business conflicts such as
  /// a duplicate vote or a taken identity.
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unauthenticated: {0}")]
  Unauthenticated(String),

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::Unauthenticated(m) => {
        let mut res =
          (StatusCode::UNAUTHORIZED, Json(json!({ "detail": m }))).into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Bearer"),
        );
        return res;
      }
      ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "detail": message }))).into_response()
  }
}
