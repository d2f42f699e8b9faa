//! JSON REST API for Moodmap.
//!
//! Exposes an axum [`Router`] backed by any [`moodmap_core::store::MoodStore`].
//! CORS, tracing, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(moodmap_api::api_router(state))
//! ```

pub mod error;
pub mod identity;
pub mod moods;

use std::sync::Arc;

use axum::{Router, routing::get};
use moodmap_core::{rate_limit::RateLimiter, store::MoodStore};

pub use error::ApiError;

// ─── State ────────────────────────────────────────────────────────────────────

/// Shared state threaded through the `/moods` handlers.
pub struct ApiState<S> {
  pub store:               Arc<S>,
  /// Applied to `POST /moods` only.
  pub limiter:             Arc<RateLimiter>,
  /// Whether `X-Forwarded-For` may name the client. Enable only behind a
  /// proxy that sets it.
  pub trust_forwarded_for: bool,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:               Arc::clone(&self.store),
      limiter:             Arc::clone(&self.limiter),
      trust_forwarded_for: self.trust_forwarded_for,
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: MoodStore + 'static,
{
  Router::new()
    .route("/moods", get(moods::list::<S>).post(moods::create::<S>))
    .with_state(state)
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use moodmap_core::{
    memory::MemoryStore,
    mood::Rating,
    rate_limit::RateLimitConfig,
  };
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;

  fn make_state(trust_forwarded_for: bool) -> ApiState<MemoryStore> {
    ApiState {
      store: Arc::new(MemoryStore::new()),
      limiter: Arc::new(RateLimiter::new(RateLimitConfig {
        window:         Duration::from_secs(60),
        max_per_window: 1,
      })),
      trust_forwarded_for,
    }
  }

  async fn oneshot_raw(
    state:   ApiState<MemoryStore>,
    method:  &str,
    headers: Vec<(&str, &str)>,
    body:    &str,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri("/moods");
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    api_router(state).oneshot(req).await.unwrap()
  }

  async fn post_from(
    state:  ApiState<MemoryStore>,
    client: &str,
    body:   &Value,
  ) -> axum::response::Response {
    oneshot_raw(
      state,
      "POST",
      vec![("content-type", "application/json"), ("x-forwarded-for", client)],
      &body.to_string(),
    )
    .await
  }

  async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn feature(lon: f64, lat: f64, rating: i64) -> Value {
    json!({
      "type": "Feature",
      "geometry": { "type": "Point", "coordinates": [lon, lat] },
      "properties": { "name": rating }
    })
  }

  // ── POST ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn post_valid_feature_returns_stored_mood() {
    let state = make_state(true);
    let body = json!({
      "type": "Feature",
      "geometry": { "type": "Point", "coordinates": [-79.4, 43.7] },
      "properties": { "name": 3, "description": "ok" }
    });
    let resp = post_from(state.clone(), "203.0.113.7", &body).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let mood = json_body(resp).await;
    assert!(mood["id"].is_i64(), "id missing: {mood}");
    let coords = mood["geometry"]["coordinates"].as_array().unwrap();
    assert!((coords[0].as_f64().unwrap() - -79.4).abs() < 1e-9);
    assert!((coords[1].as_f64().unwrap() - 43.7).abs() < 1e-9);
    assert_eq!(mood["geometry"]["type"], "Point");
    assert_eq!(mood["name"], 3);
    assert_eq!(mood["description"], "ok");
    assert_eq!(mood["created_at"], mood["edited_at"]);

    assert_eq!(state.store.submitters(), vec![Some("203.0.113.7".to_string())]);
  }

  #[tokio::test]
  async fn post_out_of_range_rating_returns_400() {
    for (i, bad) in [0, 6].into_iter().enumerate() {
      let state = make_state(true);
      let resp = post_from(state.clone(), &format!("10.0.0.{i}"), &feature(0.0, 0.0, bad)).await;
      assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
      let body = json_body(resp).await;
      assert!(body["error"].as_str().unwrap().contains("between 1 and 5"), "{body}");
      assert!(state.store.is_empty());
    }
  }

  #[tokio::test]
  async fn post_malformed_structure_returns_400() {
    let cases = [
      json!({ "type": "Point", "coordinates": [0.0, 0.0] }),
      json!({ "type": "Feature", "properties": { "name": 3 } }),
      json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": [0.0, 0.0] },
        "properties": { "description": "no rating" }
      }),
      json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }
      }),
      json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": [0.0, 0.0] },
        "properties": { "name": 3, "description": "x".repeat(76) }
      }),
    ];
    for (i, case) in cases.iter().enumerate() {
      let state = make_state(true);
      let resp = post_from(state.clone(), &format!("10.0.1.{i}"), case).await;
      assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "case {i}: {case}");
      assert!(state.store.is_empty(), "case {i} inserted a row");
    }
  }

  #[tokio::test]
  async fn post_out_of_range_position_returns_400() {
    for (i, (lon, lat)) in [(200.0, 0.0), (0.0, -91.0)].into_iter().enumerate() {
      let state = make_state(true);
      let resp = post_from(state.clone(), &format!("10.0.3.{i}"), &feature(lon, lat, 3)).await;
      assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
      let body = json_body(resp).await;
      assert!(body["error"].as_str().unwrap().contains("invalid coordinates"), "{body}");
      assert!(state.store.is_empty());
    }
  }

  #[tokio::test]
  async fn post_line_string_names_the_geometry_type() {
    let state = make_state(true);
    let body = json!({
      "type": "Feature",
      "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] },
      "properties": { "name": 3 }
    });
    let resp = post_from(state.clone(), "10.0.4.1", &body).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert!(body["error"].as_str().unwrap().contains("expected a Point geometry"), "{body}");
    assert!(state.store.is_empty());
  }

  #[tokio::test]
  async fn post_unparseable_json_returns_400() {
    let state = make_state(true);
    let resp = oneshot_raw(
      state.clone(),
      "POST",
      vec![("content-type", "application/json"), ("x-forwarded-for", "10.0.2.1")],
      "{not json",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());

    let state = make_state(true);
    let resp = post_from(
      state.clone(),
      "10.0.2.2",
      &json!({ "type": "Feature", "properties": { "name": "three" } }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(state.store.is_empty());
  }

  // ── Rate limiting ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn second_post_in_window_returns_429() {
    let state = make_state(true);
    let first = post_from(state.clone(), "198.51.100.4", &feature(1.0, 1.0, 4)).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_from(state.clone(), "198.51.100.4", &feature(1.0, 1.0, 4)).await;
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry: u64 = second
      .headers()
      .get(header::RETRY_AFTER)
      .unwrap()
      .to_str()
      .unwrap()
      .parse()
      .unwrap();
    assert!((1..=60).contains(&retry));
    assert_eq!(json_body(second).await["error"], error::RATE_LIMITED_MESSAGE);

    let other = post_from(state.clone(), "198.51.100.5", &feature(1.0, 1.0, 4)).await;
    assert_eq!(other.status(), StatusCode::OK);
    assert_eq!(state.store.len(), 2);
  }

  #[tokio::test]
  async fn rejected_submissions_still_use_the_window() {
    let state = make_state(true);
    let bad = post_from(state.clone(), "198.51.100.9", &feature(0.0, 0.0, 9)).await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

    let good = post_from(state.clone(), "198.51.100.9", &feature(0.0, 0.0, 2)).await;
    assert_eq!(good.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(state.store.is_empty());
  }

  #[tokio::test]
  async fn untrusted_forwarded_for_is_ignored() {
    let state = make_state(false);
    let a = post_from(state.clone(), "10.9.9.1", &feature(0.0, 0.0, 1)).await;
    let b = post_from(state.clone(), "10.9.9.2", &feature(0.0, 0.0, 1)).await;
    assert_eq!(a.status(), StatusCode::OK);
    assert_eq!(b.status(), StatusCode::TOO_MANY_REQUESTS);
  }

  // ── GET ─────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_on_empty_store_returns_empty_array() {
    let state = make_state(true);
    let resp = oneshot_raw(state, "GET", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!([]));
  }

  #[tokio::test]
  async fn every_rating_round_trips_through_get() {
    let state = make_state(true);
    for rating in Rating::all() {
      let r = i64::from(rating.get());
      let resp = post_from(
        state.clone(),
        &format!("10.1.0.{r}"),
        &feature(r as f64 * 10.0, -(r as f64), r),
      )
      .await;
      assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = oneshot_raw(state, "GET", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let all = json_body(resp).await;
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 5);
    for r in 1..=5_i64 {
      assert!(
        all.iter().any(|m| m["name"] == r
          && m["geometry"]["coordinates"] == json!([r as f64 * 10.0, -(r as f64)])),
        "rating {r} missing"
      );
    }
    assert!(all.iter().all(|m| m.get("submitter").is_none()));
  }

  #[tokio::test]
  async fn get_is_not_rate_limited() {
    let state = make_state(true);
    for _ in 0..5 {
      let resp = oneshot_raw(state.clone(), "GET", vec![("x-forwarded-for", "10.2.0.1")], "").await;
      assert_eq!(resp.status(), StatusCode::OK);
    }
  }

  // ── Storage failures ────────────────────────────────────────────────────────

  #[tokio::test]
  async fn storage_failure_returns_generic_500() {
    let state = make_state(true);
    state.store.set_failing(true);

    let resp = post_from(state.clone(), "10.3.0.1", &feature(0.0, 0.0, 3)).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(resp).await, json!({ "error": error::INTERNAL_ERROR_MESSAGE }));

    let resp = oneshot_raw(state, "GET", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(resp).await;
    assert!(!body["error"].as_str().unwrap().contains("unavailable"));
  }
}
