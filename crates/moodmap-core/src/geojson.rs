//! The slice of GeoJSON (RFC 7946) Moodmap speaks.
//!
//! Inbound submissions are parsed into the permissive [`FeatureInput`] first
//! so that structural problems surface as descriptive [`Error`]s rather than
//! opaque deserialisation failures. Outbound data uses the strict
//! [`Feature`] and [`FeatureCollection`] types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
  Error, Result,
  mood::{Mood, NewMood, Point, Rating, normalize_description},
};

// ─── Geometry ────────────────────────────────────────────────────────────────

/// Wire form of a GeoJSON `Point` geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
  #[serde(rename = "type")]
  pub kind:        String,
  pub coordinates: Vec<f64>,
}

impl From<Point> for PointGeometry {
  fn from(p: Point) -> Self {
    Self {
      kind:        "Point".to_owned(),
      coordinates: vec![p.lon, p.lat],
    }
  }
}

impl TryFrom<PointGeometry> for Point {
  type Error = Error;

  fn try_from(g: PointGeometry) -> Result<Self> {
    if g.kind != "Point" {
      return Err(Error::NotAPoint(Some(g.kind)));
    }
    point_from_coordinates(&g.coordinates)
  }
}

/// Positions are `[lon, lat]` with an optional, ignored altitude.
fn point_from_coordinates(coords: &[f64]) -> Result<Point> {
  match coords {
    [lon, lat] | [lon, lat, _] => Point::new(*lon, *lat),
    other => Err(Error::InvalidCoordinates(format!(
      "expected [lon, lat], got {} values",
      other.len()
    ))),
  }
}

/// Read a raw `coordinates` value as a flat list of numbers.
fn position(raw: &Value) -> Result<Vec<f64>> {
  let invalid = || Error::InvalidCoordinates(format!("expected [lon, lat], got {raw}"));
  raw
    .as_array()
    .ok_or_else(invalid)?
    .iter()
    .map(|v| v.as_f64().ok_or_else(invalid))
    .collect()
}

// ─── Inbound ─────────────────────────────────────────────────────────────────

/// An unvalidated submission body. Every field is optional here; validation
/// happens in [`FeatureInput::into_new_mood`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureInput {
  #[serde(rename = "type")]
  pub kind:       Option<String>,
  pub geometry:   Option<GeometryInput>,
  pub properties: Option<PropertiesInput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeometryInput {
  #[serde(rename = "type")]
  pub kind:        Option<String>,
  /// Kept as raw JSON so that non-Point geometries, whose coordinates nest,
  /// still parse and are rejected by type rather than by shape.
  pub coordinates: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertiesInput {
  /// The mood rating. Named `name` for compatibility with the map client.
  pub name:        Option<i64>,
  pub description: Option<String>,
}

impl FeatureInput {
  /// Validate the submission and attach the submitter identity.
  pub fn into_new_mood(self, submitter: Option<String>) -> Result<NewMood> {
    if self.kind.as_deref() != Some("Feature") {
      return Err(Error::NotAFeature(self.kind));
    }

    let geometry = self.geometry.ok_or(Error::MissingGeometry)?;
    if geometry.kind.as_deref() != Some("Point") {
      return Err(Error::NotAPoint(geometry.kind));
    }
    let coordinates = geometry
      .coordinates
      .ok_or_else(|| Error::InvalidCoordinates("missing coordinates".into()))?;
    let location = point_from_coordinates(&position(&coordinates)?)?;

    let properties = self.properties.ok_or(Error::MissingProperties)?;
    let rating = Rating::new(properties.name.ok_or(Error::MissingRating)?)?;
    let description = normalize_description(properties.description)?;

    Ok(NewMood {
      location,
      rating,
      description,
      submitter,
    })
  }
}

// ─── Outbound ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
  #[default]
  Feature,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureCollectionType {
  #[default]
  FeatureCollection,
}

/// A GeoJSON Feature whose geometry is always a [`Point`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature<P> {
  #[serde(rename = "type")]
  pub kind:       FeatureType,
  pub geometry:   Point,
  pub properties: P,
}

impl<P> Feature<P> {
  pub fn new(geometry: Point, properties: P) -> Self {
    Self {
      kind: FeatureType::Feature,
      geometry,
      properties,
    }
  }
}

/// Properties sent by a client submitting a mood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitProperties {
  pub name:        Rating,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

/// Properties of a stored mood when rendered as a map source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodProperties {
  pub id:          i64,
  pub name:        Rating,
  pub description: Option<String>,
  pub created_at:  DateTime<Utc>,
}

pub type MoodFeature = Feature<MoodProperties>;

impl From<&Mood> for MoodFeature {
  fn from(m: &Mood) -> Self {
    Feature::new(m.geometry, MoodProperties {
      id:          m.id,
      name:        m.rating,
      description: m.description.clone(),
      created_at:  m.created_at,
    })
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection<F> {
  #[serde(rename = "type")]
  pub kind:     FeatureCollectionType,
  pub features: Vec<F>,
}

impl<F> FeatureCollection<F> {
  pub fn new(features: Vec<F>) -> Self {
    Self {
      kind: FeatureCollectionType::FeatureCollection,
      features,
    }
  }

  pub fn len(&self) -> usize { self.features.len() }

  pub fn is_empty(&self) -> bool { self.features.is_empty() }
}

impl<F> FromIterator<F> for FeatureCollection<F> {
  fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
    Self::new(iter.into_iter().collect())
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn parse(v: serde_json::Value) -> FeatureInput { serde_json::from_value(v).unwrap() }

  #[test]
  fn valid_feature_becomes_new_mood() {
    let input = parse(json!({
      "type": "Feature",
      "geometry": { "type": "Point", "coordinates": [-79.4, 43.7] },
      "properties": { "name": 3, "description": "ok" }
    }));
    let mood = input.into_new_mood(Some("10.0.0.1".into())).unwrap();
    assert_eq!(mood.location, Point { lon: -79.4, lat: 43.7 });
    assert_eq!(mood.rating.get(), 3);
    assert_eq!(mood.description.as_deref(), Some("ok"));
    assert_eq!(mood.submitter.as_deref(), Some("10.0.0.1"));
  }

  #[test]
  fn altitude_is_ignored() {
    let input = parse(json!({
      "type": "Feature",
      "geometry": { "type": "Point", "coordinates": [2.35, 48.85, 35.0] },
      "properties": { "name": 5 }
    }));
    let mood = input.into_new_mood(None).unwrap();
    assert_eq!(mood.location, Point { lon: 2.35, lat: 48.85 });
    assert_eq!(mood.description, None);
  }

  #[test]
  fn structural_errors() {
    let wrong_type = parse(json!({ "type": "FeatureCollection", "features": [] }));
    assert_eq!(
      wrong_type.into_new_mood(None),
      Err(Error::NotAFeature(Some("FeatureCollection".into())))
    );

    let no_geometry = parse(json!({ "type": "Feature", "properties": { "name": 2 } }));
    assert_eq!(no_geometry.into_new_mood(None), Err(Error::MissingGeometry));

    let line = parse(json!({
      "type": "Feature",
      "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] },
      "properties": { "name": 2 }
    }));
    assert_eq!(line.into_new_mood(None), Err(Error::NotAPoint(Some("LineString".into()))));

    let polygon = parse(json!({
      "type": "Feature",
      "geometry": { "type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0]]] },
      "properties": { "name": 2 }
    }));
    assert_eq!(polygon.into_new_mood(None), Err(Error::NotAPoint(Some("Polygon".into()))));

    let nested_point = parse(json!({
      "type": "Feature",
      "geometry": { "type": "Point", "coordinates": [[0.0, 0.0]] },
      "properties": { "name": 2 }
    }));
    assert!(matches!(nested_point.into_new_mood(None), Err(Error::InvalidCoordinates(_))));

    let text_point = parse(json!({
      "type": "Feature",
      "geometry": { "type": "Point", "coordinates": "0,0" },
      "properties": { "name": 2 }
    }));
    assert!(matches!(text_point.into_new_mood(None), Err(Error::InvalidCoordinates(_))));

    let no_name = parse(json!({
      "type": "Feature",
      "geometry": { "type": "Point", "coordinates": [0.0, 0.0] },
      "properties": { "description": "hi" }
    }));
    assert_eq!(no_name.into_new_mood(None), Err(Error::MissingRating));

    let no_props = parse(json!({
      "type": "Feature",
      "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }
    }));
    assert_eq!(no_props.into_new_mood(None), Err(Error::MissingProperties));

    let short = parse(json!({
      "type": "Feature",
      "geometry": { "type": "Point", "coordinates": [0.0] },
      "properties": { "name": 2 }
    }));
    assert!(matches!(short.into_new_mood(None), Err(Error::InvalidCoordinates(_))));
  }

  #[test]
  fn rating_out_of_range() {
    for bad in [0, 6] {
      let input = parse(json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": [0.0, 0.0] },
        "properties": { "name": bad }
      }));
      assert_eq!(input.into_new_mood(None), Err(Error::RatingOutOfRange(bad)));
    }
  }

  #[test]
  fn submission_feature_serialises_as_geojson() {
    let feature = Feature::new(Point { lon: 1.5, lat: -2.0 }, SubmitProperties {
      name:        Rating::new(4).unwrap(),
      description: None,
    });
    assert_eq!(
      serde_json::to_value(&feature).unwrap(),
      json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": [1.5, -2.0] },
        "properties": { "name": 4 }
      })
    );
  }

  #[test]
  fn seed_collection_parses() {
    let fc: FeatureCollection<FeatureInput> = serde_json::from_value(json!({
      "type": "FeatureCollection",
      "features": [
        { "type": "Feature", "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }, "properties": { "name": 1 } },
        { "type": "Feature", "geometry": { "type": "Point", "coordinates": [10.0, 5.0] }, "properties": { "name": 5 } }
      ]
    }))
    .unwrap();
    assert_eq!(fc.len(), 2);
  }
}
