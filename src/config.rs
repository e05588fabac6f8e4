//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_SESSION_FILE: &str = ".quickleave/session.json";
/// Proactive refresh period; access tokens live for two hours on the backend.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 110 * 60;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors produced while building [`ClientConfig`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The API base URL is not an `http(s)` URL.
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// A numeric setting could not be parsed.
    #[error("invalid value for {key}: {value}")]
    InvalidNumber { key: &'static str, value: String },

    /// The refresh interval must be non-zero.
    #[error("refresh interval must be greater than zero")]
    ZeroRefreshInterval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub session_path: PathBuf,
    pub refresh_interval: Duration,
    pub timeouts: HttpTimeouts,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_owned(),
            session_path: PathBuf::from(DEFAULT_SESSION_FILE),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
            timeouts: HttpTimeouts {
                request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `QUICKLEAVE_API_URL`: backend base URL, default `http://127.0.0.1:8000`
    /// - `QUICKLEAVE_SESSION_FILE`: persisted session path
    /// - `QUICKLEAVE_REFRESH_INTERVAL_SECS`: default 6600 (110 minutes)
    /// - `QUICKLEAVE_REQUEST_TIMEOUT_SECS`: default 30
    /// - `QUICKLEAVE_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a present value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Build config from an arbitrary key lookup. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a present value is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base_url = normalize_base_url(&get("QUICKLEAVE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned()))?;
        let session_path = get("QUICKLEAVE_SESSION_FILE").map_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);

        let refresh_secs = parse_u64(
            "QUICKLEAVE_REFRESH_INTERVAL_SECS",
            get("QUICKLEAVE_REFRESH_INTERVAL_SECS"),
            DEFAULT_REFRESH_INTERVAL_SECS,
        )?;
        if refresh_secs == 0 {
            return Err(ConfigError::ZeroRefreshInterval);
        }

        let timeouts = HttpTimeouts {
            request_secs: parse_u64(
                "QUICKLEAVE_REQUEST_TIMEOUT_SECS",
                get("QUICKLEAVE_REQUEST_TIMEOUT_SECS"),
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?,
            connect_secs: parse_u64(
                "QUICKLEAVE_CONNECT_TIMEOUT_SECS",
                get("QUICKLEAVE_CONNECT_TIMEOUT_SECS"),
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )?,
        };

        Ok(Self { api_base_url, session_path, refresh_interval: Duration::from_secs(refresh_secs), timeouts })
    }
}

/// Trim whitespace and trailing slashes; require an `http(s)` scheme.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidBaseUrl`] for anything that is not `http(s)://host...`.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(trimmed.to_owned()),
        _ => Err(ConfigError::InvalidBaseUrl(raw.to_owned())),
    }
}

fn parse_u64(key: &'static str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
