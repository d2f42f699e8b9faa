//! Server assembly for Moodmap.
//!
//! Turns a [`ServerConfig`] into a ready-to-serve axum [`Router`]: the
//! `/moods` API from [`moodmap_api`], wrapped in CORS and request tracing.

pub mod error;
pub mod seed;

pub use error::Error;

use std::{sync::Arc, time::Duration};

use axum::{
  Router,
  http::{HeaderValue, Method, header::CONTENT_TYPE},
};
use moodmap_api::ApiState;
use moodmap_core::{
  rate_limit::{RateLimitConfig, RateLimiter},
  store::MoodStore,
};
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use tokio::task::JoinHandle;
use tower_http::{
  cors::{AllowOrigin, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `MOODMAP_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  /// Origins allowed to call the API from a browser.
  pub allowed_origins:     Vec<String>,
  /// Attribute requests to the first `X-Forwarded-For` hop.
  pub trust_forwarded_for: bool,
  pub rate_limit:          RateLimitSettings,
  pub database:            DatabaseConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                "0.0.0.0".to_string(),
      port:                3000,
      allowed_origins:     [
        "http://localhost",
        "http://127.0.0.1",
        "http://localhost:3000",
        "http://127.0.0.1:3000",
        "http://localhost:5173",
        "http://127.0.0.1:5173",
      ]
      .map(String::from)
      .to_vec(),
      trust_forwarded_for: true,
      rate_limit:          RateLimitSettings::default(),
      database:            DatabaseConfig::default(),
    }
  }
}

impl ServerConfig {
  /// Reject settings that would make the server misbehave at runtime.
  pub fn validate(&self) -> Result<(), Error> {
    if self.rate_limit.window_secs == 0 {
      return Err(Error::Config("rate_limit.window_secs must be at least 1".into()));
    }
    if self.rate_limit.max_per_window == 0 {
      return Err(Error::Config("rate_limit.max_per_window must be at least 1".into()));
    }
    if self.database.max_connections == 0 {
      return Err(Error::Config("database.max_connections must be at least 1".into()));
    }
    Ok(())
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RateLimitSettings {
  pub window_secs:    u64,
  pub max_per_window: u32,
}

impl Default for RateLimitSettings {
  fn default() -> Self {
    let d = RateLimitConfig::default();
    Self {
      window_secs:    d.window.as_secs(),
      max_per_window: d.max_per_window,
    }
  }
}

impl From<&RateLimitSettings> for RateLimitConfig {
  fn from(s: &RateLimitSettings) -> Self {
    RateLimitConfig {
      window:         Duration::from_secs(s.window_secs),
      max_per_window: s.max_per_window,
    }
  }
}

/// Postgres connection parameters.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
  pub host:            String,
  pub port:            u16,
  pub user:            String,
  pub password:        String,
  /// Defaults to the user name, as libpq does.
  pub dbname:          Option<String>,
  pub max_connections: u32,
}

impl Default for DatabaseConfig {
  fn default() -> Self {
    Self {
      host:            "127.0.0.1".to_string(),
      port:            5432,
      user:            "postgres".to_string(),
      password:        "password".to_string(),
      dbname:          None,
      max_connections: 5,
    }
  }
}

impl DatabaseConfig {
  pub fn connect_options(&self) -> PgConnectOptions {
    let options = PgConnectOptions::new()
      .host(&self.host)
      .port(self.port)
      .username(&self.user)
      .password(&self.password);
    match &self.dbname {
      Some(db) => options.database(db),
      None => options,
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application state for `store` from `config`.
pub fn app_state<S: MoodStore>(store: Arc<S>, config: &ServerConfig) -> ApiState<S> {
  ApiState {
    store,
    limiter: Arc::new(RateLimiter::new(RateLimitConfig::from(&config.rate_limit))),
    trust_forwarded_for: config.trust_forwarded_for,
  }
}

/// CORS policy for the configured origins.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, Error> {
  let origins = origins
    .iter()
    .map(|o| HeaderValue::from_str(o).map_err(|_| Error::InvalidOrigin(o.clone())))
    .collect::<Result<Vec<_>, _>>()?;

  Ok(
    CorsLayer::new()
      .allow_origin(AllowOrigin::list(origins))
      .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
      .allow_headers([CONTENT_TYPE]),
  )
}

/// Build the full HTTP application.
pub fn router<S>(state: ApiState<S>, config: &ServerConfig) -> Result<Router, Error>
where
  S: MoodStore + 'static,
{
  Ok(
    moodmap_api::api_router(state)
      .layer(cors_layer(&config.allowed_origins)?)
      .layer(TraceLayer::new_for_http()),
  )
}

// ─── Background tasks ─────────────────────────────────────────────────────────

/// Periodically drop elapsed rate-limit windows so idle clients don't
/// accumulate forever.
pub fn spawn_limiter_sweeper(limiter: Arc<RateLimiter>) -> JoinHandle<()> {
  let period = limiter.config().window;
  tokio::spawn(async move {
    let mut ticker = tokio::time::interval(period);
    // The first tick completes immediately.
    ticker.tick().await;
    loop {
      ticker.tick().await;
      let purged = limiter.purge_expired(std::time::Instant::now());
      if purged > 0 {
        tracing::debug!(purged, remaining = limiter.tracked(), "purged rate-limit windows");
      }
    }
  })
}

/// Resolves on Ctrl-C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::error!(error = %e, "failed to listen for Ctrl-C");
      std::future::pending::<()>().await;
    }
    tracing::info!("received Ctrl-C, shutting down");
  };

  #[cfg(unix)]
  let terminate = async {
    use tokio::signal::unix::{SignalKind, signal};
    match signal(SignalKind::terminate()) {
      Ok(mut s) => {
        s.recv().await;
        tracing::info!("received SIGTERM, shutting down");
      }
      Err(e) => {
        tracing::error!(error = %e, "failed to install SIGTERM handler");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => {},
    _ = terminate => {},
  }
}
