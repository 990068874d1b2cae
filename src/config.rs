//! Service configuration.
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `PODSTATS__*` environment variables (double underscore between
//! section and key, e.g. `PODSTATS__UPSTREAM__API_TOKEN`).
//!
//! ```toml
//! [server]
//! addr = "0.0.0.0:8000"
//!
//! [upstream]
//! api_token = "..."
//! podcast_id = "2124284"
//!
//! [cors]
//! allow_origin = "https://pod.example"
//! ```

use std::net::SocketAddr;

use serde::Deserialize;

use crate::cors::CorsPolicy;
use crate::error::Error;
use crate::upstream::UpstreamConfig;

pub const ENV_PREFIX: &str = "PODSTATS";
pub const DEFAULT_CONFIG_FILE: &str = "podstats.toml";

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub cors: CorsPolicy,
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    pub addr: String,
}

#[derive(Debug, Deserialize)]
pub struct LoggingSettings {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Settings {
    /// Loads settings from `path` (optional file) and the environment.
    pub fn load_from(path: &str) -> Result<Self, Error> {
        let source = config::Config::builder()
            .set_default("server.addr", "0.0.0.0:8000")?
            .set_default("logging.level", "info")?
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"));
        Self::from_builder(source)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, Error> {
        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.upstream.api_token.trim().is_empty() {
            return Err(config::ConfigError::Message("upstream.api_token must not be empty".into()).into());
        }
        if self.upstream.podcast_id.trim().is_empty() {
            return Err(config::ConfigError::Message("upstream.podcast_id must not be empty".into()).into());
        }
        self.socket_addr().map(|_| ())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, Error> {
        self.server.addr.parse().map_err(|_| Error::InvalidAddress(self.server.addr.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn from_toml(toml: &str) -> Result<Settings, Error> {
        let builder = config::Config::builder()
            .set_default("server.addr", "0.0.0.0:8000")
            .unwrap()
            .set_default("logging.level", "info")
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml));
        Settings::from_builder(builder)
    }

    #[test]
    fn defaults_fill_everything_but_credentials() {
        let s = from_toml(
            r#"
            [upstream]
            api_token = "tok"
            podcast_id = "42"
            "#,
        )
        .unwrap();
        assert_eq!(s.socket_addr().unwrap(), "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(s.logging.level, "info");
        assert_eq!(s.cors, CorsPolicy::default());
        assert_eq!(s.upstream.base_url, "https://www.buzzsprout.com/api");
        assert!(!s.upstream.json_suffix);
        assert_eq!(s.upstream.timeout_secs, None);
    }

    #[test]
    fn partial_cors_section_keeps_other_defaults() {
        let s = from_toml(
            r#"
            [upstream]
            api_token = "tok"
            podcast_id = "42"

            [cors]
            allow_origin = "https://pod.example"
            "#,
        )
        .unwrap();
        assert_eq!(s.cors.allow_origin, "https://pod.example");
        assert_eq!(s.cors.max_age, 86_400);
    }

    #[test]
    fn missing_credentials_are_rejected() {
        assert!(matches!(from_toml(""), Err(Error::Config(_))));
        let empty = from_toml(
            r#"
            [upstream]
            api_token = "  "
            podcast_id = "42"
            "#,
        );
        assert!(matches!(empty, Err(Error::Config(_))));
    }

    #[test]
    fn bad_listen_address_is_rejected() {
        let s = from_toml(
            r#"
            [server]
            addr = "not-an-addr"

            [upstream]
            api_token = "tok"
            podcast_id = "42"
            "#,
        );
        assert!(matches!(s, Err(Error::InvalidAddress(_))));
    }
}
