//! Bulk import of moods from a GeoJSON FeatureCollection.
//!
//! Maintenance only; not reachable over HTTP. Features go through the same
//! validation as `POST /moods` and invalid ones are skipped.

use moodmap_core::{
  geojson::{FeatureCollection, FeatureInput},
  store::MoodStore,
};

use crate::Error;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
  pub inserted: usize,
  pub rejected: usize,
}

/// Insert every valid feature in `raw`, a FeatureCollection document.
pub async fn seed_moods<S: MoodStore>(store: &S, raw: &str) -> Result<SeedReport, Error> {
  let collection: FeatureCollection<FeatureInput> = serde_json::from_str(raw)?;
  let mut report = SeedReport::default();

  for (index, feature) in collection.features.into_iter().enumerate() {
    match feature.into_new_mood(None) {
      Ok(mood) => {
        store.submit(mood).await.map_err(|e| Error::Store(Box::new(e)))?;
        report.inserted += 1;
      }
      Err(e) => {
        tracing::warn!(index, error = %e, "skipping invalid seed feature");
        report.rejected += 1;
      }
    }
  }

  Ok(report)
}
