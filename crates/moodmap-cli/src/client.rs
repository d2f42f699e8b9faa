//! Async HTTP client wrapping the Moodmap JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use moodmap_core::{
  geojson::{Feature, SubmitProperties},
  mood::Mood,
};
use reqwest::{Client, Response};
use serde::Deserialize;

/// Connection settings for the Moodmap API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the Moodmap JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  pub fn base_url(&self) -> &str { &self.config.base_url }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// Turn a non-2xx response into an error carrying the server's message.
  async fn fail(resp: Response, what: &str) -> anyhow::Error {
    let status = resp.status();
    match resp.json::<ErrorBody>().await {
      Ok(body) => anyhow!("{what}: {status}: {}", body.error),
      Err(_) => anyhow!("{what}: {status}"),
    }
  }

  /// `GET /moods`
  pub async fn list_moods(&self) -> Result<Vec<Mood>> {
    let resp = self
      .client
      .get(self.url("/moods"))
      .send()
      .await
      .context("GET /moods failed")?;

    if !resp.status().is_success() {
      return Err(Self::fail(resp, "GET /moods").await);
    }
    resp.json().await.context("deserialising moods")
  }

  /// `POST /moods`
  pub async fn submit_mood(&self, feature: &Feature<SubmitProperties>) -> Result<Mood> {
    let resp = self
      .client
      .post(self.url("/moods"))
      .json(feature)
      .send()
      .await
      .context("POST /moods failed")?;

    if !resp.status().is_success() {
      return Err(Self::fail(resp, "POST /moods").await);
    }
    resp.json().await.context("deserialising stored mood")
  }
}
