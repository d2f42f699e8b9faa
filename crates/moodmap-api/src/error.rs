//! API error type and [`axum::response::IntoResponse`] implementation.

use std::time::Duration;

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Shown to rate-limited clients.
pub const RATE_LIMITED_MESSAGE: &str = "Too many mood submissions, please try again later.";

/// Shown for any storage failure; details stay in the server log.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("invalid mood: {0}")]
  Validation(#[from] moodmap_core::Error),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("rate limited; retry after {retry_after:?}")]
  RateLimited { retry_after: Duration },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap a storage failure, logging it since the client never sees it.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    tracing::error!(error = %e, "mood store failure");
    Self::Store(Box::new(e))
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::RateLimited { .. } => {
        (StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED_MESSAGE.to_owned())
      }
      ApiError::Store(_) => {
        (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE.to_owned())
      }
    };
    let mut res = (status, Json(json!({ "error": message }))).into_response();

    if let ApiError::RateLimited { retry_after } = self {
      // Round up so clients never retry a moment too early.
      let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
      res
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(secs.max(1)));
    }
    res
  }
}
