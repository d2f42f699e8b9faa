//! Mapping between `moods` rows and core types.

use chrono::{DateTime, Utc};
use moodmap_core::mood::{Mood, Point, Rating};

use crate::{Error, Result};

/// A `moods` row with the geometry split back into `lon`/`lat`.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct MoodRow {
  pub id:          i32,
  pub lon:         f64,
  pub lat:         f64,
  pub rating:      i16,
  pub description: Option<String>,
  pub created_at:  DateTime<Utc>,
  pub edited_at:   DateTime<Utc>,
}

impl TryFrom<MoodRow> for Mood {
  type Error = Error;

  fn try_from(row: MoodRow) -> Result<Self> {
    let id = i64::from(row.id);
    let corrupt = |source| Error::CorruptRow { id, source };

    Ok(Mood {
      id,
      geometry: Point::new(row.lon, row.lat).map_err(corrupt)?,
      rating: Rating::new(i64::from(row.rating)).map_err(corrupt)?,
      description: row.description,
      created_at: row.created_at,
      edited_at: row.edited_at,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn row(rating: i16) -> MoodRow {
    let now = Utc::now();
    MoodRow {
      id:          4,
      lon:         -79.4,
      lat:         43.7,
      rating,
      description: Some("ok".into()),
      created_at:  now,
      edited_at:   now,
    }
  }

  #[test]
  fn row_converts_to_mood() {
    let mood = Mood::try_from(row(3)).unwrap();
    assert_eq!(mood.id, 4);
    assert_eq!(mood.geometry, Point { lon: -79.4, lat: 43.7 });
    assert_eq!(mood.rating.get(), 3);
  }

  #[test]
  fn out_of_range_rating_is_corrupt() {
    let err = Mood::try_from(row(9)).unwrap_err();
    assert!(matches!(err, Error::CorruptRow { id: 4, .. }));
  }
}
