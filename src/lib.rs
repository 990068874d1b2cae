//! # podstats
//!
//! A small HTTP edge service in front of the Buzzsprout podcast-hosting API.
//! The browser frontend gets three simplified endpoints and never sees the
//! API token:
//!
//! - `GET /api/health`: liveness payload, no upstream call
//! - `GET /api/stats`: total episodes and downloads, plus per-episode counts
//! - `GET /api/episodes`: the upstream episode list, passed through
//!
//! Every response carries the configured CORS headers, and `OPTIONS` on any
//! path is answered as a preflight without touching the upstream API.
//!
//! Nothing is cached or stored. Each request makes at most one upstream call
//! and either fully succeeds or answers `{"error", "details"}` with the
//! upstream status (or 500).
//!
//! ## Embedding
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use podstats::{BuzzsproutClient, CorsPolicy, Server, UpstreamConfig, api};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), podstats::Error> {
//!     let client = BuzzsproutClient::new(UpstreamConfig::new("token", "2124284"))?;
//!     let app = api::router(Arc::new(client), CorsPolicy::default());
//!
//!     Server::bind("0.0.0.0:8000".parse().unwrap()).await?.serve(app).await
//! }
//! ```

mod cors;
mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod api;
pub mod config;
pub mod health;
pub mod model;
pub mod upstream;

pub use cors::CorsPolicy;
pub use error::{ApiError, Error};
pub use handler::Handler;
pub use method::Method;
pub use model::{EpisodeRecord, PodcastStats};
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
pub use upstream::{BuzzsproutClient, EpisodeSource, UpstreamConfig, UpstreamError};
