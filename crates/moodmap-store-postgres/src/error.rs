//! Error type for `moodmap-store-postgres`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] sqlx::Error),

  /// A stored row violates a domain invariant (e.g. a rating outside 1..=5
  /// written by something other than this crate).
  #[error("corrupt row {id}: {source}")]
  CorruptRow {
    id:     i64,
    #[source]
    source: moodmap_core::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
