//! Client identity and the rate-limit extractor.
//!
//! Identity is advisory: `X-Forwarded-For` is trivially spoofed, so this is
//! a courtesy limit, not a security boundary.

use std::net::SocketAddr;

use axum::{
  extract::{ConnectInfo, FromRequestParts},
  http::request::Parts,
};
use moodmap_core::{rate_limit::Decision, store::MoodStore};

use crate::{ApiState, error::ApiError};

const FORWARDED_FOR: &str = "x-forwarded-for";
const UNKNOWN: &str = "unknown";

/// Who a request is attributed to for rate limiting: an IP address, or
/// `"unknown"` when none can be determined.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientIdentity(pub String);

impl ClientIdentity {
  /// Resolve the identity from, in order: the first `X-Forwarded-For` entry
  /// (only if `trust_forwarded_for`), the peer address, or `"unknown"`.
  ///
  /// The peer address is only present when the server was started with
  /// `into_make_service_with_connect_info::<SocketAddr>()`.
  pub fn from_parts(parts: &Parts, trust_forwarded_for: bool) -> Self {
    if trust_forwarded_for {
      let forwarded = parts
        .headers
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty());
      if let Some(ip) = forwarded {
        return Self(ip.to_owned());
      }
    }

    if let Some(ConnectInfo(addr)) = parts.extensions.get::<ConnectInfo<SocketAddr>>() {
      return Self(addr.ip().to_string());
    }

    Self(UNKNOWN.to_owned())
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

/// Present in a handler means the rate limiter admitted the request.
///
/// Runs before the body is read, so malformed submissions still count
/// against the client's window.
pub struct Admitted(pub ClientIdentity);

impl<S> FromRequestParts<ApiState<S>> for Admitted
where
  S: MoodStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &ApiState<S>,
  ) -> Result<Self, Self::Rejection> {
    let identity = ClientIdentity::from_parts(parts, state.trust_forwarded_for);
    match state.limiter.check(&identity.0) {
      Decision::Allowed { .. } => Ok(Admitted(identity)),
      Decision::Limited { retry_after } => {
        tracing::debug!(client = %identity.0, ?retry_after, "mood submission rate-limited");
        Err(ApiError::RateLimited { retry_after })
      }
    }
  }
}
