//! The map camera: what part of the world is on screen.

use moodmap_core::mood::Point;

pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 10;

/// Fraction of the visible span moved by one pan step.
const PAN_STEP: f64 = 0.2;

/// An equirectangular viewport. At zoom 0 the whole world is visible; each
/// zoom level halves both spans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
  pub center: Point,
  pub zoom:   u8,
}

impl Default for Camera {
  fn default() -> Self {
    Self {
      center: Point { lon: 0.0, lat: 0.0 },
      zoom:   1,
    }
  }
}

impl Camera {
  /// Visible `(lon, lat)` extent in degrees.
  pub fn span(&self) -> (f64, f64) {
    let scale = f64::from(1u32 << self.zoom);
    (360.0 / scale, 180.0 / scale)
  }

  pub fn x_bounds(&self) -> [f64; 2] {
    let (w, _) = self.span();
    [self.center.lon - w / 2.0, self.center.lon + w / 2.0]
  }

  pub fn y_bounds(&self) -> [f64; 2] {
    let (_, h) = self.span();
    [self.center.lat - h / 2.0, self.center.lat + h / 2.0]
  }

  pub fn contains(&self, p: Point) -> bool {
    let [x0, x1] = self.x_bounds();
    let [y0, y1] = self.y_bounds();
    (x0..=x1).contains(&p.lon) && (y0..=y1).contains(&p.lat)
  }

  pub fn zoom_in(&mut self) { self.zoom = (self.zoom + 1).min(MAX_ZOOM); }

  pub fn zoom_out(&mut self) { self.zoom = self.zoom.saturating_sub(1).max(MIN_ZOOM); }

  /// Move by `dx`/`dy` pan steps (positive is east/north).
  pub fn pan(&mut self, dx: i8, dy: i8) {
    let (w, h) = self.span();
    self.center.lon = (self.center.lon + f64::from(dx) * w * PAN_STEP).clamp(-180.0, 180.0);
    self.center.lat = (self.center.lat + f64::from(dy) * h * PAN_STEP).clamp(-90.0, 90.0);
  }

  pub fn center_on(&mut self, p: Point) { self.center = p; }
}
