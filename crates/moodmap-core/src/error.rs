//! Error types for `moodmap-core`.
//!
//! Every variant describes a submission the API must reject with 400.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
  #[error("expected a GeoJSON Feature, got type {0:?}")]
  NotAFeature(Option<String>),

  #[error("feature has no geometry")]
  MissingGeometry,

  #[error("expected a Point geometry, got type {0:?}")]
  NotAPoint(Option<String>),

  #[error("invalid coordinates: {0}")]
  InvalidCoordinates(String),

  #[error("feature has no properties")]
  MissingProperties,

  #[error("feature properties have no `name` (the mood rating)")]
  MissingRating,

  #[error("rating must be between 1 and 5, got {0}")]
  RatingOutOfRange(i64),

  #[error("description must be at most 75 characters, got {0}")]
  DescriptionTooLong(usize),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
