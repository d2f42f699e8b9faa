//! Error type for server assembly.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid allowed origin {0:?}")]
  InvalidOrigin(String),

  #[error("invalid configuration: {0}")]
  Config(String),

  #[error("seed file is not a GeoJSON FeatureCollection: {0}")]
  SeedFormat(#[from] serde_json::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}
