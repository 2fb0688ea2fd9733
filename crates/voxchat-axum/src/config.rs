//! Server configuration for the Axum adapter.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use url::Url;

pub const PORT_ENV: &str = "VOXCHAT_PORT";
pub const API_KEY_ENV: &str = "GROQ_API_KEY";
pub const UPSTREAM_URL_ENV: &str = "VOXCHAT_UPSTREAM_TTS_URL";
pub const CORS_ORIGINS_ENV: &str = "VOXCHAT_CORS_ORIGINS";

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.groq.com/openai/v1/audio/speech";

/// Upstream speech requests give up after this long.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP server.
    pub port: u16,
    /// Bearer key for the upstream speech API. Speech requests fail without it.
    pub api_key: Option<String>,
    /// OpenAI-compatible `audio/speech` endpoint.
    pub upstream_url: Url,
    /// Timeout for one upstream speech request.
    pub upstream_timeout: Duration,
    /// CORS configuration.
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_key: None,
            upstream_url: Url::parse(DEFAULT_UPSTREAM_URL).expect("default upstream is a valid URL"),
            upstream_timeout: UPSTREAM_TIMEOUT,
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Unset or blank keys keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        if let Some(raw) = get(PORT_ENV) {
            config.port = raw
                .parse()
                .with_context(|| format!("{PORT_ENV} must be a port number, got '{raw}'"))?;
        }

        config.api_key = get(API_KEY_ENV);

        if let Some(raw) = get(UPSTREAM_URL_ENV) {
            config.upstream_url =
                Url::parse(&raw).with_context(|| format!("{UPSTREAM_URL_ENV} is not a URL"))?;
        }

        if let Some(raw) = get(CORS_ORIGINS_ENV) {
            let origins: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
            if origins.is_empty() {
                bail!("{CORS_ORIGINS_ENV} lists no origins");
            }
            config.cors = CorsConfig::AllowOrigins(origins);
        }

        Ok(config)
    }

    /// Set the listening port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        move |key: &str| map.get(key).map(|v| (*v).to_string())
    }

    #[test]
    fn defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.api_key, None);
        assert_eq!(config.upstream_url.as_str(), DEFAULT_UPSTREAM_URL);
        assert_eq!(config.cors, CorsConfig::AllowAll);
    }

    #[test]
    fn reads_every_key() {
        let config = ServerConfig::from_lookup(lookup(&[
            (PORT_ENV, "8080"),
            (API_KEY_ENV, " gsk_test "),
            (UPSTREAM_URL_ENV, "http://127.0.0.1:9/v1/audio/speech"),
            (CORS_ORIGINS_ENV, "http://localhost:3000, https://chat.example"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.api_key.as_deref(), Some("gsk_test"));
        assert_eq!(config.upstream_url.port(), Some(9));
        assert_eq!(
            config.cors,
            CorsConfig::AllowOrigins(vec![
                "http://localhost:3000".into(),
                "https://chat.example".into()
            ])
        );
    }

    #[test]
    fn blank_api_key_is_unset() {
        let config = ServerConfig::from_lookup(lookup(&[(API_KEY_ENV, "   ")])).unwrap();
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn builders_override_port_and_origins() {
        let config = ServerConfig::default()
            .with_port(8080)
            .with_allowed_origins(vec!["https://chat.example".into()]);
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.cors,
            CorsConfig::AllowOrigins(vec!["https://chat.example".into()])
        );
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(ServerConfig::from_lookup(lookup(&[(PORT_ENV, "eighty")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[(UPSTREAM_URL_ENV, "::")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[(CORS_ORIGINS_ENV, " , ")])).is_err());
    }
}
