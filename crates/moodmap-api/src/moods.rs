//! Handlers for `/moods`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/moods` | Every stored mood; not rate-limited |
//! | `POST` | `/moods` | Body: GeoJSON Feature; rate-limited per client |

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use moodmap_core::{geojson::FeatureInput, mood::Mood, store::MoodStore};

use crate::{ApiState, error::ApiError, identity::Admitted};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /moods`
pub async fn list<S>(State(state): State<ApiState<S>>) -> Result<Json<Vec<Mood>>, ApiError>
where
  S: MoodStore + 'static,
{
  let moods = state.store.list_all().await.map_err(ApiError::store)?;
  Ok(Json(moods))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /moods`, body:
///
/// ```json
/// {"type":"Feature",
///  "geometry":{"type":"Point","coordinates":[-79.4,43.7]},
///  "properties":{"name":3,"description":"ok"}}
/// ```
///
/// Returns 200 + the stored [`Mood`].
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Admitted(identity): Admitted,
  payload: Result<Json<FeatureInput>, JsonRejection>,
) -> Result<Json<Mood>, ApiError>
where
  S: MoodStore + 'static,
{
  let Json(feature) = payload?;
  let new_mood = feature.into_new_mood(Some(identity.0))?;

  let mood = state.store.submit(new_mood).await.map_err(ApiError::store)?;
  tracing::info!(id = mood.id, rating = %mood.rating, "mood stored");
  Ok(Json(mood))
}
