//! Client for the podcast-hosting API.
//!
//! [`EpisodeSource`] is the capability the routes depend on; [`BuzzsproutClient`]
//! is the real implementation. Tests substitute their own source.
//!
//! One outbound request per call: no retries, no caching. The API token is
//! sent as an `Authorization: Token token=...` header and never appears in a
//! URL or a log line.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{EpisodeRecord, PodcastStats};

/// Failure talking to the upstream API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Upstream answered with a non-2xx status.
    #[error("upstream returned status {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response (DNS, connect, reset, timeout).
    #[error("network error: {message}")]
    Network { message: String },

    /// Upstream answered 2xx with a body that is not an episode list.
    #[error("invalid upstream response: {message}")]
    Decode { message: String },
}

impl UpstreamError {
    /// Status the proxy should answer with, when one follows from the cause.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Decode { .. } | Self::Network { .. } => None,
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode { message: e.to_string() }
        } else {
            // strip the URL so the podcast id and path do not leak into responses
            Self::Network { message: e.without_url().to_string() }
        }
    }
}

/// Source of episode data for one podcast.
#[async_trait]
pub trait EpisodeSource: Send + Sync {
    /// The upstream episode array, untouched.
    async fn fetch_raw_episodes(&self) -> Result<Vec<Value>, UpstreamError>;

    /// Episodes normalised to [`EpisodeRecord`], in upstream order.
    async fn fetch_episodes(&self) -> Result<Vec<EpisodeRecord>, UpstreamError> {
        self.fetch_raw_episodes()
            .await?
            .into_iter()
            .map(|v| {
                EpisodeRecord::from_upstream(v)
                    .map_err(|e| UpstreamError::Decode { message: e.to_string() })
            })
            .collect()
    }

    /// Download summary over every episode. All or nothing.
    async fn fetch_stats(&self) -> Result<PodcastStats, UpstreamError> {
        Ok(PodcastStats::from_episodes(self.fetch_episodes().await?))
    }
}

/// Upstream connection settings, injected at startup.
#[derive(Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub api_token: String,
    pub podcast_id: String,
    /// Request `episodes.json` instead of `episodes`.
    #[serde(default)]
    pub json_suffix: bool,
    /// Whole-request timeout. None leaves it to the transport.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "https://www.buzzsprout.com/api".to_owned()
}

impl UpstreamConfig {
    pub fn new(api_token: impl Into<String>, podcast_id: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            api_token: api_token.into(),
            podcast_id: podcast_id.into(),
            json_suffix: false,
            timeout_secs: None,
        }
    }

    pub fn episodes_url(&self) -> String {
        format!(
            "{}/v1/{}/episodes{}",
            self.base_url.trim_end_matches('/'),
            self.podcast_id,
            if self.json_suffix { ".json" } else { "" },
        )
    }
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"<redacted>")
            .field("podcast_id", &self.podcast_id)
            .field("json_suffix", &self.json_suffix)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// [`EpisodeSource`] backed by the Buzzsprout REST API.
pub struct BuzzsproutClient {
    http: reqwest::Client,
    config: UpstreamConfig,
}

impl BuzzsproutClient {
    pub fn new(config: UpstreamConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self { http: builder.build()?, config })
    }
}

#[async_trait]
impl EpisodeSource for BuzzsproutClient {
    async fn fetch_raw_episodes(&self) -> Result<Vec<Value>, UpstreamError> {
        let podcast_id = self.config.podcast_id.as_str();
        debug!(podcast_id, "fetching episodes");

        let res = self.http
            .get(self.config.episodes_url())
            .header(AUTHORIZATION, format!("Token token={}", self.config.api_token))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .inspect_err(|e| warn!(podcast_id, "upstream request failed: {e}"))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(podcast_id, status = status.as_u16(), "upstream returned an error status");
            return Err(UpstreamError::Http { status: status.as_u16(), body });
        }

        let bytes = res.bytes().await?;
        let episodes: Vec<Value> = serde_json::from_slice(&bytes).map_err(|e| {
            warn!(podcast_id, "upstream body is not an episode list: {e}");
            UpstreamError::Decode { message: e.to_string() }
        })?;
        debug!(podcast_id, count = episodes.len(), "fetched episodes");
        Ok(episodes)
    }
}
