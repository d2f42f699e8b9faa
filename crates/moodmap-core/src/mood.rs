//! Mood records and the value objects they are built from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, geojson::PointGeometry};

/// Longest description a mood may carry, counted in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 75;

// ─── Point ───────────────────────────────────────────────────────────────────

/// A WGS84 (SRID 4326) position.
///
/// Serialised as a GeoJSON `Point` geometry. The persistence layer decides how
/// this maps onto a spatial column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PointGeometry", into = "PointGeometry")]
pub struct Point {
  pub lon: f64,
  pub lat: f64,
}

impl Point {
  /// Build a point, rejecting non-finite or out-of-range coordinates.
  pub fn new(lon: f64, lat: f64) -> Result<Self> {
    if !lon.is_finite() || !lat.is_finite() {
      return Err(Error::InvalidCoordinates(format!(
        "[{lon}, {lat}] is not a finite position"
      )));
    }
    if !(-180.0..=180.0).contains(&lon) {
      return Err(Error::InvalidCoordinates(format!(
        "longitude {lon} is outside [-180, 180]"
      )));
    }
    if !(-90.0..=90.0).contains(&lat) {
      return Err(Error::InvalidCoordinates(format!(
        "latitude {lat} is outside [-90, 90]"
      )));
    }
    Ok(Self { lon, lat })
  }
}

// ─── Rating ──────────────────────────────────────────────────────────────────

/// A mood rating, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
  pub const MIN: u8 = 1;
  pub const MAX: u8 = 5;
  pub const HIGHEST: Rating = Rating(Self::MAX);

  pub fn new(value: i64) -> Result<Self> {
    match u8::try_from(value) {
      Ok(v) if (Self::MIN..=Self::MAX).contains(&v) => Ok(Self(v)),
      _ => Err(Error::RatingOutOfRange(value)),
    }
  }

  pub fn get(self) -> u8 { self.0 }

  /// All valid ratings, lowest first.
  pub fn all() -> impl Iterator<Item = Rating> { (Self::MIN..=Self::MAX).map(Rating) }
}

impl TryFrom<i64> for Rating {
  type Error = Error;

  fn try_from(value: i64) -> Result<Self> { Self::new(value) }
}

impl From<Rating> for u8 {
  fn from(r: Rating) -> Self { r.0 }
}

impl std::fmt::Display for Rating {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ─── Description ─────────────────────────────────────────────────────────────

/// Trim a free-text description; blank becomes `None`.
pub fn normalize_description(raw: Option<String>) -> Result<Option<String>> {
  let Some(raw) = raw else { return Ok(None) };
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Ok(None);
  }
  let len = trimmed.chars().count();
  if len > MAX_DESCRIPTION_CHARS {
    return Err(Error::DescriptionTooLong(len));
  }
  Ok(Some(trimmed.to_owned()))
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A validated submission, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMood {
  pub location:    Point,
  pub rating:      Rating,
  pub description: Option<String>,
  /// Advisory identity of whoever submitted the mood (an IP address).
  /// Stored, never returned to clients.
  pub submitter:   Option<String>,
}

/// A stored mood as returned by `GET /moods`.
///
/// The rating travels as `name` on the wire, matching the property name the
/// map client submits it under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mood {
  pub id:          i64,
  pub geometry:    Point,
  #[serde(rename = "name")]
  pub rating:      Rating,
  pub description: Option<String>,
  pub created_at:  DateTime<Utc>,
  pub edited_at:   DateTime<Utc>,
}
