//! The `MoodStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `moodmap-store-postgres`).
//! Higher layers (`moodmap-api`, `moodmap-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::mood::{Mood, NewMood};

/// Abstraction over a Moodmap storage backend.
///
/// Moods are append-only: there is no update or delete path. Each call is a
/// single autocommitted statement; no ordering is promised between concurrent
/// `submit` and `list_all` calls.
pub trait MoodStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a validated mood and return it as stored, with its generated
  /// `id` and timestamps.
  fn submit(
    &self,
    mood: NewMood,
  ) -> impl Future<Output = Result<Mood, Self::Error>> + Send + '_;

  /// Return every stored mood, in no particular order.
  fn list_all(&self) -> impl Future<Output = Result<Vec<Mood>, Self::Error>> + Send + '_;
}
