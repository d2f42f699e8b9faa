//! `moodmap`: terminal map view for a Moodmap server.
//!
//! # Usage
//!
//! ```
//! moodmap --url http://localhost:3000 --lon -79.38 --lat 43.65
//! moodmap --config ~/.config/moodmap/config.toml
//! ```
//!
//! Without a location fix the map is browsable but moods cannot be
//! submitted.

mod app;
mod camera;
mod client;
mod layers;
mod prompt;
mod ui;

use std::{io, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use client::{ApiClient, ApiConfig};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use moodmap_core::mood::Point;
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "moodmap", about = "Terminal map of everyone's moods")]
struct Args {
  /// Path to a TOML config file (url, lon, lat).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the moodmap server (default: http://localhost:3000).
  #[arg(long, env = "MOODMAP_URL")]
  url: Option<String>,

  /// Longitude of your location fix.
  #[arg(long, requires = "lat", allow_negative_numbers = true)]
  lon: Option<f64>,

  /// Latitude of your location fix.
  #[arg(long, requires = "lon", allow_negative_numbers = true)]
  lat: Option<f64>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
  lon: Option<f64>,
  lat: Option<f64>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:3000".to_string()),
  };

  let location = match (args.lon.or(file_cfg.lon), args.lat.or(file_cfg.lat)) {
    (Some(lon), Some(lat)) => Some(Point::new(lon, lat).context("invalid location fix")?),
    _ => None,
  };

  let client = ApiClient::new(api_config)?;
  let mut app = App::new(client, location);

  // Fail before touching the terminal if the server is unreachable.
  app
    .load_moods()
    .await
    .with_context(|| format!("loading moods from {}", app.client.base_url()))?;

  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event {
      if !app.handle_key(key).await? {
        break;
      }
    }
  }

  Ok(())
}
