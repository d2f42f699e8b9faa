//! Application state machine and event dispatcher.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use moodmap_core::{
  geojson::{FeatureCollection, MoodFeature},
  mood::Point,
};

use crate::{camera::Camera, client::ApiClient, prompt::MoodPrompt};

pub const NO_LOCATION_NOTICE: &str =
  "No location fix. Restart with --lon/--lat to submit a mood.";

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  /// Panning and zooming the map.
  Map,
  /// The mood prompt modal is open over the map.
  Prompt,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub screen: Screen,

  pub camera: Camera,

  /// Every mood fetched from the API, as a map source.
  pub source: FeatureCollection<MoodFeature>,

  pub prompt: MoodPrompt,

  /// Last-known location fix. Submission is blocked without one.
  pub location: Option<Point>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  pub client: Arc<ApiClient>,
}

impl App {
  pub fn new(client: ApiClient, location: Option<Point>) -> Self {
    let mut camera = Camera::default();
    if let Some(p) = location {
      camera.center_on(p);
    }
    Self {
      screen: Screen::Map,
      camera,
      source: FeatureCollection::new(Vec::new()),
      prompt: MoodPrompt::default(),
      location,
      status_msg: String::new(),
      client: Arc::new(client),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch every mood and rebuild the map source.
  pub async fn load_moods(&mut self) -> anyhow::Result<()> {
    self.status_msg = "Loading moods…".into();
    match self.client.list_moods().await {
      Ok(moods) => {
        self.source = moods.iter().map(MoodFeature::from).collect();
        self.status_msg = format!("{} moods", self.source.len());
        Ok(())
      }
      Err(e) => {
        self.status_msg = format!("Error: {e}");
        Err(e)
      }
    }
  }

  /// Post the prompt's mood at the current location fix.
  async fn submit(&mut self) {
    let Some(at) = self.location else {
      self.status_msg = NO_LOCATION_NOTICE.into();
      return;
    };

    let feature = self.prompt.to_feature(at);
    match self.client.submit_mood(&feature).await {
      Ok(mood) => {
        self.source.features.push(MoodFeature::from(&mood));
        self.prompt = MoodPrompt::default();
        self.screen = Screen::Map;
        self.status_msg = format!("Mood {} recorded, thanks!", mood.rating);
      }
      Err(e) => {
        self.status_msg = format!("Error: {e}");
      }
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    match self.screen {
      Screen::Map => self.handle_map_key(key).await,
      Screen::Prompt => {
        self.handle_prompt_key(key).await;
        Ok(true)
      }
    }
  }

  async fn handle_map_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Left | KeyCode::Char('h') => self.camera.pan(-1, 0),
      KeyCode::Right | KeyCode::Char('l') => self.camera.pan(1, 0),
      KeyCode::Up | KeyCode::Char('k') => self.camera.pan(0, 1),
      KeyCode::Down | KeyCode::Char('j') => self.camera.pan(0, -1),

      KeyCode::Char('+') | KeyCode::Char('=') => self.camera.zoom_in(),
      KeyCode::Char('-') | KeyCode::Char('_') => self.camera.zoom_out(),

      KeyCode::Char('c') => match self.location {
        Some(p) => self.camera.center_on(p),
        None => self.status_msg = NO_LOCATION_NOTICE.into(),
      },

      // A failed reload keeps the previous source; the error is in the
      // status bar.
      KeyCode::Char('r') => {
        let _ = self.load_moods().await;
      }

      KeyCode::Char('m') => {
        self.screen = Screen::Prompt;
        if self.location.is_none() {
          self.status_msg = NO_LOCATION_NOTICE.into();
        }
      }

      _ => {}
    }
    Ok(true)
  }

  async fn handle_prompt_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => self.screen = Screen::Map,
      KeyCode::Left => self.prompt.decrease(),
      KeyCode::Right => self.prompt.increase(),
      KeyCode::Backspace => self.prompt.pop(),
      KeyCode::Enter => self.submit().await,
      KeyCode::Char(c) => self.prompt.push(c),
      _ => {}
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{camera::MAX_ZOOM, client::ApiConfig};

  fn app(location: Option<Point>) -> App {
    // Nothing listens here; tests below never reach the network.
    let client = ApiClient::new(ApiConfig { base_url: "http://127.0.0.1:9".into() }).unwrap();
    App::new(client, location)
  }

  fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  #[tokio::test]
  async fn quit_keys() {
    let mut a = app(None);
    assert!(!a.handle_key(key(KeyCode::Char('q'))).await.unwrap());

    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    a.screen = Screen::Prompt;
    assert!(!a.handle_key(ctrl_c).await.unwrap());
  }

  #[tokio::test]
  async fn zoom_and_pan_move_the_camera() {
    let mut a = app(None);
    let start = a.camera;
    a.handle_key(key(KeyCode::Char('+'))).await.unwrap();
    assert_eq!(a.camera.zoom, start.zoom + 1);
    a.handle_key(key(KeyCode::Char('-'))).await.unwrap();
    a.handle_key(key(KeyCode::Char('-'))).await.unwrap();
    assert_eq!(a.camera.zoom, 0);

    a.handle_key(key(KeyCode::Char('l'))).await.unwrap();
    assert!(a.camera.center.lon > start.center.lon);

    for _ in 0..20 {
      a.handle_key(key(KeyCode::Char('='))).await.unwrap();
    }
    assert_eq!(a.camera.zoom, MAX_ZOOM);
  }

  #[tokio::test]
  async fn app_starts_centered_on_the_fix() {
    let fix = Point { lon: -79.4, lat: 43.7 };
    let mut a = app(Some(fix));
    assert_eq!(a.camera.center, fix);
    a.handle_key(key(KeyCode::Right)).await.unwrap();
    assert_ne!(a.camera.center, fix);
    a.handle_key(key(KeyCode::Char('c'))).await.unwrap();
    assert_eq!(a.camera.center, fix);
  }

  #[tokio::test]
  async fn prompt_edits_rating_and_description() {
    let mut a = app(None);
    a.handle_key(key(KeyCode::Char('m'))).await.unwrap();
    assert_eq!(a.screen, Screen::Prompt);

    a.handle_key(key(KeyCode::Left)).await.unwrap();
    a.handle_key(key(KeyCode::Left)).await.unwrap();
    // Typed letters go to the description, not the map bindings.
    for c in "ok q".chars() {
      a.handle_key(key(KeyCode::Char(c))).await.unwrap();
    }
    a.handle_key(key(KeyCode::Backspace)).await.unwrap();
    assert_eq!(a.prompt.rating.get(), 3);
    assert_eq!(a.prompt.description, "ok ");
    assert_eq!(a.screen, Screen::Prompt);

    a.handle_key(key(KeyCode::Esc)).await.unwrap();
    assert_eq!(a.screen, Screen::Map);
  }

  #[tokio::test]
  async fn submit_without_fix_is_blocked() {
    let mut a = app(None);
    a.handle_key(key(KeyCode::Char('m'))).await.unwrap();
    a.status_msg.clear();
    a.handle_key(key(KeyCode::Enter)).await.unwrap();

    assert_eq!(a.status_msg, NO_LOCATION_NOTICE);
    assert_eq!(a.screen, Screen::Prompt);
    assert!(a.source.is_empty());
  }
}
