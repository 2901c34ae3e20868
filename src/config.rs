//! Client configuration parsed from environment variables.

use std::time::Duration;

use crate::error::BookingError;

pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_HOLD_SECS: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeouts: HttpTimeouts,
    pub hold_secs: u32,
    pub token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            timeouts: HttpTimeouts {
                request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
            hold_secs: DEFAULT_HOLD_SECS,
            token: None,
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `MESA_API_URL`: backend base URL, trailing slashes trimmed
    /// - `MESA_REQUEST_TIMEOUT_SECS`: default 30
    /// - `MESA_CONNECT_TIMEOUT_SECS`: default 10
    /// - `MESA_HOLD_SECS`: hold countdown length, default 600
    /// - `MESA_TOKEN`: bearer token for reservation calls
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Config`] if `MESA_HOLD_SECS` is not a positive integer.
    pub fn from_env() -> Result<Self, BookingError> {
        let api_url = normalize_base_url(
            std::env::var("MESA_API_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .as_deref()
                .unwrap_or(DEFAULT_API_URL),
        );
        let timeouts = HttpTimeouts {
            request_secs: env_parse("MESA_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("MESA_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let hold_secs = parse_hold_secs(std::env::var("MESA_HOLD_SECS").ok().as_deref())?;
        let token = std::env::var("MESA_TOKEN").ok().filter(|s| !s.is_empty());

        Ok(Self { api_url, timeouts, hold_secs, token })
    }

    #[must_use]
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = normalize_base_url(api_url);
        self
    }

    #[must_use]
    pub fn with_hold_secs(mut self, hold_secs: u32) -> Self {
        self.hold_secs = hold_secs;
        self
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.request_secs)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.connect_secs)
    }
}

/// Strip trailing slashes so endpoint concatenation never yields `//`.
#[must_use]
pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn parse_hold_secs(raw: Option<&str>) -> Result<u32, BookingError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_HOLD_SECS);
    };
    match raw.trim().parse::<u32>() {
        Ok(0) => Err(BookingError::Config("MESA_HOLD_SECS must be greater than zero".into())),
        Ok(secs) => Ok(secs),
        Err(_) => Err(BookingError::Config(format!("invalid MESA_HOLD_SECS: {raw}"))),
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
