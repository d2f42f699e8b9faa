//! Map layers: which ones show at a zoom level, and how they are colored.
//!
//! Low zooms show a density heatmap; high zooms show one marker per mood
//! colored by rating. At [`HEATMAP_MAX_ZOOM`] both are drawn so the switch
//! isn't abrupt.

use moodmap_core::{
  geojson::MoodFeature,
  mood::Rating,
};
use ratatui::style::Color;

use crate::camera::Camera;

pub const HEATMAP_MAX_ZOOM: u8 = 3;
pub const POINTS_MIN_ZOOM: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
  Heatmap,
  Points,
}

impl Layer {
  pub fn label(self) -> &'static str {
    match self {
      Layer::Heatmap => "heatmap",
      Layer::Points => "points",
    }
  }
}

/// Layers drawn at `zoom`, bottom first.
pub fn visible_layers(zoom: u8) -> Vec<Layer> {
  let mut layers = Vec::with_capacity(2);
  if zoom <= HEATMAP_MAX_ZOOM {
    layers.push(Layer::Heatmap);
  }
  if zoom >= POINTS_MIN_ZOOM {
    layers.push(Layer::Points);
  }
  layers
}

// ─── Points ──────────────────────────────────────────────────────────────────

/// Fixed red → green ramp; 1 is the worst mood, 5 the best.
pub fn rating_color(rating: Rating) -> Color {
  match rating.get() {
    1 => Color::Rgb(215, 48, 39),
    2 => Color::Rgb(252, 141, 89),
    3 => Color::Rgb(254, 224, 139),
    4 => Color::Rgb(145, 207, 96),
    _ => Color::Rgb(26, 152, 80),
  }
}

// ─── Heatmap ─────────────────────────────────────────────────────────────────

/// One occupied grid cell. `weight` is the cell's density relative to the
/// densest cell, in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatCell {
  pub lon:    f64,
  pub lat:    f64,
  pub weight: f64,
}

/// Bin every visible feature into a `cols` × `rows` grid spanning the camera
/// and return the non-empty cells, positioned at their centers.
pub fn heat_cells(features: &[MoodFeature], camera: &Camera, cols: u16, rows: u16) -> Vec<HeatCell> {
  if cols == 0 || rows == 0 {
    return Vec::new();
  }
  let [x0, x1] = camera.x_bounds();
  let [y0, y1] = camera.y_bounds();
  let cell_w = (x1 - x0) / f64::from(cols);
  let cell_h = (y1 - y0) / f64::from(rows);

  let mut counts = vec![0u32; usize::from(cols) * usize::from(rows)];
  for feature in features {
    let p = feature.geometry;
    if !camera.contains(p) {
      continue;
    }
    // The far edge belongs to the last cell.
    let col = (((p.lon - x0) / cell_w) as usize).min(usize::from(cols) - 1);
    let row = (((p.lat - y0) / cell_h) as usize).min(usize::from(rows) - 1);
    counts[row * usize::from(cols) + col] += 1;
  }

  let max = counts.iter().copied().max().unwrap_or(0);
  if max == 0 {
    return Vec::new();
  }

  counts
    .iter()
    .enumerate()
    .filter(|(_, n)| **n > 0)
    .map(|(i, n)| {
      let col = i % usize::from(cols);
      let row = i / usize::from(cols);
      HeatCell {
        lon:    x0 + (col as f64 + 0.5) * cell_w,
        lat:    y0 + (row as f64 + 0.5) * cell_h,
        weight: f64::from(*n) / f64::from(max),
      }
    })
    .collect()
}

/// Cool-to-hot ramp for heat weights.
pub fn heat_color(weight: f64) -> Color {
  match weight {
    w if w < 0.2 => Color::Rgb(33, 102, 172),
    w if w < 0.4 => Color::Rgb(103, 169, 207),
    w if w < 0.6 => Color::Rgb(209, 229, 240),
    w if w < 0.8 => Color::Rgb(253, 219, 199),
    _ => Color::Rgb(178, 24, 43),
  }
}

pub fn heat_glyph(weight: f64) -> &'static str {
  match weight {
    w if w < 0.25 => "░",
    w if w < 0.5 => "▒",
    w if w < 0.75 => "▓",
    _ => "█",
  }
}
