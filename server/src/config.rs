//! Gateway configuration parsed from environment variables.

pub const DEFAULT_BASE_HOST: &str = "https://game.maj-soul.com";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required env var {0}")]
    MissingVar(&'static str),

    /// An environment variable holds an unparseable value.
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Bounded timeouts applied to every outbound HTTP fetch and remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the backend host, scheme included, no trailing slash.
    pub base_host: String,
    /// Account identifier used for login.
    pub account: String,
    /// Account secret. Hashed before it goes on the wire, never logged.
    pub secret: String,
    /// HTTP listen port.
    pub port: u16,
    pub timeouts: Timeouts,
}

impl Config {
    /// Build typed gateway config from environment variables.
    ///
    /// Required:
    /// - `MS_ACCOUNT`, `MS_PASSWORD`
    ///
    /// Optional:
    /// - `MS_HOST`: backend base URL (default `https://game.maj-soul.com`)
    /// - `PORT`: listen port (default 3000)
    /// - `MS_REQUEST_TIMEOUT_SECS` (default 30), `MS_CONNECT_TIMEOUT_SECS` (default 10)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for missing required variables or
    /// unparseable numeric values.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_host = std::env::var("MS_HOST")
            .unwrap_or_else(|_| DEFAULT_BASE_HOST.to_string())
            .trim_end_matches('/')
            .to_string();
        let account = std::env::var("MS_ACCOUNT").map_err(|_| ConfigError::MissingVar("MS_ACCOUNT"))?;
        let secret = std::env::var("MS_PASSWORD").map_err(|_| ConfigError::MissingVar("MS_PASSWORD"))?;
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue { var: "PORT", value: raw })?,
            Err(_) => DEFAULT_PORT,
        };
        let timeouts = Timeouts {
            request_secs: env_parse_u64("MS_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("MS_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { base_host, account, secret, port, timeouts })
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
