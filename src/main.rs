//! podstats server binary.
//!
//! Run with:
//!   PODSTATS__UPSTREAM__API_TOKEN=... PODSTATS__UPSTREAM__PODCAST_ID=... cargo run
//!
//! An optional config file path may be passed as the first argument
//! (default `podstats.toml`, ignored if missing). See `podstats --help`.
//!
//! Try:
//!   curl http://localhost:8000/api/health
//!   curl http://localhost:8000/api/stats
//!   curl -X OPTIONS -i http://localhost:8000/api/stats

use std::sync::Arc;

use clap::Parser;
use podstats::config::{DEFAULT_CONFIG_FILE, Settings};
use podstats::{BuzzsproutClient, Server, api};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "podstats")]
#[command(about = "HTTP edge service exposing podcast download statistics")]
#[command(version)]
struct Cli {
    /// Config file (TOML); `PODSTATS__*` environment variables override it
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    config: String,
}

#[tokio::main]
async fn main() -> Result<(), podstats::Error> {
    let cli = Cli::parse();
    let settings = Settings::load_from(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level)),
        )
        .init();

    info!(upstream = ?settings.upstream, "configuration loaded");

    let addr = settings.socket_addr()?;
    let client = BuzzsproutClient::new(settings.upstream)?;
    let app = api::router(Arc::new(client), settings.cors);

    Server::bind(addr).await?.serve(app).await
}
