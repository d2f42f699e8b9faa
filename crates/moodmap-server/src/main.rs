//! moodmap-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus `MOODMAP_*`
//! environment variables, connects to PostGIS, ensures the schema, and serves
//! the `/moods` API over HTTP.
//!
//! Nested keys use `__` in the environment, e.g.
//! `MOODMAP_DATABASE__HOST=db MOODMAP_RATE_LIMIT__WINDOW_SECS=30`.
//!
//! # Maintenance
//!
//! ```text
//! moodmap-server seed moods.geojson   # import a FeatureCollection
//! moodmap-server reset --yes          # drop the moods table
//! ```

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand};
use moodmap_server::{ServerConfig, seed::seed_moods};
use moodmap_store_postgres::PgStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Moodmap API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve,
  /// Import moods from a GeoJSON FeatureCollection file.
  Seed {
    file: PathBuf,
  },
  /// Drop the moods table and everything in it.
  Reset {
    /// Confirm the destructive operation.
    #[arg(long)]
    yes: bool,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("MOODMAP")
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("allowed_origins")
        .try_parsing(true),
    )
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  server_cfg.validate()?;

  let db = &server_cfg.database;
  let store = PgStore::connect(db.connect_options(), db.max_connections)
    .await
    .with_context(|| format!("failed to connect to postgres at {}:{}", db.host, db.port))?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(store, server_cfg).await,
    Command::Seed { file } => {
      store.init_schema().await.context("failed to initialise schema")?;
      let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;
      let report = seed_moods(&store, &raw).await?;
      tracing::info!(inserted = report.inserted, rejected = report.rejected, "seed complete");
      Ok(())
    }
    Command::Reset { yes } => {
      if !yes {
        bail!("refusing to drop the moods table without --yes");
      }
      store.drop_schema().await.context("failed to drop moods table")?;
      Ok(())
    }
  }
}

async fn serve(store: PgStore, server_cfg: ServerConfig) -> anyhow::Result<()> {
  // The server must not accept traffic without its table.
  store.init_schema().await.context("failed to initialise schema")?;
  tracing::info!("schema ready");

  let state = moodmap_server::app_state(Arc::new(store), &server_cfg);
  let _sweeper = moodmap_server::spawn_limiter_sweeper(Arc::clone(&state.limiter));

  let app = moodmap_server::router(state, &server_cfg)?;
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
    .with_graceful_shutdown(moodmap_server::shutdown_signal())
    .await
    .context("server error")?;

  Ok(())
}
