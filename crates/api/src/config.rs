use std::str::FromStr;
use std::time::Duration;

use sparkle_core::spam::SpamConfig;

const DEFAULT_INBOX_CAPACITY: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long to wait for background sinks on shutdown (default: `5`).
    pub shutdown_timeout_secs: u64,
    /// Spam thresholds applied to incoming quotes.
    pub spam: SpamConfig,
    /// Collector that receives every analytics event, if set.
    pub analytics_webhook_url: Option<String>,
    /// Bearer token for operator routes. Unset disables them.
    pub operator_token: Option<String>,
    /// Received quotes kept in memory; the oldest are evicted past this.
    pub inbox_capacity: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `5`                        |
    /// | `SPAM_MIN_FILL_SECS`    | `5`                        |
    /// | `SPAM_MIN_UNIQUE_RATIO` | `0.4`                      |
    /// | `ANALYTICS_WEBHOOK_URL` | unset                      |
    /// | `OPERATOR_TOKEN`        | unset                      |
    /// | `INBOX_CAPACITY`        | `1000`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = parse_env("PORT", 3000u16)?;

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = parse_env("REQUEST_TIMEOUT_SECS", 30u64)?;
        let shutdown_timeout_secs = parse_env("SHUTDOWN_TIMEOUT_SECS", 5u64)?;

        let defaults = SpamConfig::default();
        let spam = SpamConfig {
            min_fill_time: Duration::from_secs(parse_env(
                "SPAM_MIN_FILL_SECS",
                defaults.min_fill_time.as_secs(),
            )?),
            min_unique_ratio: parse_env("SPAM_MIN_UNIQUE_RATIO", defaults.min_unique_ratio)?,
            ..defaults
        };

        let analytics_webhook_url = optional_env("ANALYTICS_WEBHOOK_URL");
        let operator_token = optional_env("OPERATOR_TOKEN");

        let inbox_capacity = parse_env("INBOX_CAPACITY", DEFAULT_INBOX_CAPACITY)?;
        if inbox_capacity == 0 {
            return Err(ConfigError::Invalid {
                key: "INBOX_CAPACITY",
                value: "0".into(),
            });
        }

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            spam,
            analytics_webhook_url,
            operator_token,
            inbox_capacity,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            cors_origins: vec!["http://localhost:5173".into()],
            request_timeout_secs: 30,
            shutdown_timeout_secs: 5,
            spam: SpamConfig::default(),
            analytics_webhook_url: None,
            operator_token: None,
            inbox_capacity: DEFAULT_INBOX_CAPACITY,
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_env<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}
