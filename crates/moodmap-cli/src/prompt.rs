//! State of the "how are you feeling?" modal.

use moodmap_core::{
  geojson::{Feature, SubmitProperties},
  mood::{MAX_DESCRIPTION_CHARS, Point, Rating},
};

/// Rating slider plus optional free-text description.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodPrompt {
  pub rating:      Rating,
  pub description: String,
}

impl Default for MoodPrompt {
  fn default() -> Self {
    Self {
      rating:      Rating::HIGHEST,
      description: String::new(),
    }
  }
}

impl MoodPrompt {
  pub fn increase(&mut self) { self.step(1); }

  pub fn decrease(&mut self) { self.step(-1); }

  fn step(&mut self, delta: i64) {
    if let Ok(r) = Rating::new(i64::from(self.rating.get()) + delta) {
      self.rating = r;
    }
  }

  /// Append `c` unless the description is already full.
  pub fn push(&mut self, c: char) {
    if self.description.chars().count() < MAX_DESCRIPTION_CHARS {
      self.description.push(c);
    }
  }

  pub fn pop(&mut self) { self.description.pop(); }

  pub fn remaining(&self) -> usize {
    MAX_DESCRIPTION_CHARS.saturating_sub(self.description.chars().count())
  }

  /// The Feature to submit for a mood felt at `at`.
  pub fn to_feature(&self, at: Point) -> Feature<SubmitProperties> {
    let description = self.description.trim();
    Feature::new(at, SubmitProperties {
      name:        self.rating,
      description: (!description.is_empty()).then(|| description.to_owned()),
    })
  }
}
