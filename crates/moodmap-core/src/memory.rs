//! In-memory [`MoodStore`] for tests of the layers above storage.

use std::sync::{
  Mutex, PoisonError,
  atomic::{AtomicBool, Ordering},
};

use chrono::Utc;

use crate::{
  mood::{Mood, NewMood},
  store::MoodStore,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("memory store is unavailable")]
  Unavailable,
}

#[derive(Debug, Default)]
struct Inner {
  moods:      Vec<Mood>,
  submitters: Vec<Option<String>>,
  next_id:    i64,
}

/// A [`MoodStore`] kept in a `Vec`. Can be switched into a failing mode to
/// exercise storage-error handling.
#[derive(Debug, Default)]
pub struct MemoryStore {
  inner:   Mutex<Inner>,
  failing: AtomicBool,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Make every subsequent call fail with [`Error::Unavailable`].
  pub fn set_failing(&self, failing: bool) { self.failing.store(failing, Ordering::SeqCst); }

  /// Number of stored moods.
  pub fn len(&self) -> usize { self.inner.lock().unwrap_or_else(PoisonError::into_inner).moods.len() }

  pub fn is_empty(&self) -> bool { self.len() == 0 }

  /// Submitter identities in insertion order; the public [`Mood`] omits them.
  pub fn submitters(&self) -> Vec<Option<String>> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner).submitters.clone()
  }

  fn check(&self) -> Result<(), Error> {
    if self.failing.load(Ordering::SeqCst) {
      Err(Error::Unavailable)
    } else {
      Ok(())
    }
  }
}

impl MoodStore for MemoryStore {
  type Error = Error;

  async fn submit(&self, mood: NewMood) -> Result<Mood, Error> {
    self.check()?;
    let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
    inner.next_id += 1;
    let now = Utc::now();
    let stored = Mood {
      id:          inner.next_id,
      geometry:    mood.location,
      rating:      mood.rating,
      description: mood.description,
      created_at:  now,
      edited_at:   now,
    };
    inner.moods.push(stored.clone());
    inner.submitters.push(mood.submitter);
    Ok(stored)
  }

  async fn list_all(&self) -> Result<Vec<Mood>, Error> {
    self.check()?;
    Ok(self.inner.lock().unwrap_or_else(PoisonError::into_inner).moods.clone())
  }
}
