//! [`PgStore`], the PostGIS implementation of [`MoodStore`].

use moodmap_core::{
  mood::{Mood, NewMood},
  store::MoodStore,
};
use sqlx::{
  PgPool,
  postgres::{PgConnectOptions, PgPoolOptions},
};

use crate::{
  Result,
  row::MoodRow,
  schema::{DROP_SCHEMA, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Moodmap store backed by a Postgres connection pool.
///
/// Cloning is cheap; the pool is reference-counted.
#[derive(Clone, Debug)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  /// Open a pool of at most `max_connections` connections.
  ///
  /// The schema is *not* touched; call [`init_schema`](Self::init_schema)
  /// before serving traffic.
  pub async fn connect(options: PgConnectOptions, max_connections: u32) -> Result<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(max_connections)
      .connect_with(options)
      .await?;
    Ok(Self { pool })
  }

  pub fn pool(&self) -> &PgPool { &self.pool }

  /// Create the PostGIS extension and `moods` table if absent.
  ///
  /// Safe to call repeatedly. Errors are returned, not swallowed: a server
  /// without its table must not start.
  pub async fn init_schema(&self) -> Result<()> {
    sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
    tracing::debug!("moods schema ensured");
    Ok(())
  }

  /// Drop the `moods` table and everything in it.
  pub async fn drop_schema(&self) -> Result<()> {
    sqlx::raw_sql(DROP_SCHEMA).execute(&self.pool).await?;
    tracing::warn!("moods table dropped");
    Ok(())
  }
}

// ─── MoodStore impl ──────────────────────────────────────────────────────────

impl MoodStore for PgStore {
  type Error = crate::Error;

  async fn submit(&self, mood: NewMood) -> Result<Mood> {
    let row: MoodRow = sqlx::query_as(
      "INSERT INTO moods (location, rating, description, submitter)
       VALUES (ST_SetSRID(ST_MakePoint($1, $2), 4326), $3, $4, $5)
       RETURNING id, ST_X(location) AS lon, ST_Y(location) AS lat,
                 rating, description, created_at, edited_at",
    )
    .bind(mood.location.lon)
    .bind(mood.location.lat)
    .bind(i16::from(mood.rating.get()))
    .bind(mood.description)
    .bind(mood.submitter)
    .fetch_one(&self.pool)
    .await?;

    Mood::try_from(row)
  }

  async fn list_all(&self) -> Result<Vec<Mood>> {
    let rows: Vec<MoodRow> = sqlx::query_as(
      "SELECT id, ST_X(location) AS lon, ST_Y(location) AS lat,
              rating, description, created_at, edited_at
       FROM moods",
    )
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(Mood::try_from).collect()
  }
}
