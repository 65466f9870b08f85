//! Configuration for the Sigil Scrolls client.
//!
//! All configuration is loaded from environment variables (a `.env` file is
//! honoured by the binary). The service base URL is always injected here,
//! never hard-coded at call sites, so tests can point the client at a mock.

use std::time::Duration;

/// Base URL used when `SIGIL_API_URL` is unset (local development service).
pub const DEFAULT_API_URL: &str = "http://localhost:8083";

/// Dashboard refresh interval when `SIGIL_METRICS_REFRESH_MS` is unset.
pub const DEFAULT_METRICS_REFRESH: Duration = Duration::from_secs(3);

/// Client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Service base URL, without trailing slash
    pub api_url: String,

    /// Per-request timeout (default: 15 seconds)
    pub request_timeout: Duration,

    /// Usage dashboard refresh interval (default: 3 seconds)
    pub metrics_refresh: Duration,
}

impl Config {
    /// Configuration for the given base URL with default timings.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: normalize_url(api_url.into()),
            request_timeout: Duration::from_secs(15),
            metrics_refresh: DEFAULT_METRICS_REFRESH,
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::new(
            std::env::var("SIGIL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        );

        if let Some(secs) = std::env::var("SIGIL_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(ms) = std::env::var("SIGIL_METRICS_REFRESH_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
        {
            config.metrics_refresh = Duration::from_millis(ms);
        }

        config
    }

    /// Replace the base URL (CLI override).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = normalize_url(api_url.into());
        self
    }

    /// Absolute URL of an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn normalize_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_trimmed() {
        let config = Config::new("http://127.0.0.1:9000//");
        assert_eq!(config.api_url, "http://127.0.0.1:9000");
        assert_eq!(
            config.endpoint("/doors-of-durin/sigil-scrolls/view"),
            "http://127.0.0.1:9000/doors-of-durin/sigil-scrolls/view"
        );
    }

    #[test]
    fn override_keeps_timings() {
        let mut config = Config::new(DEFAULT_API_URL);
        config.metrics_refresh = Duration::from_millis(500);
        let config = config.with_api_url("https://scrolls.example/");
        assert_eq!(config.api_url, "https://scrolls.example");
        assert_eq!(config.metrics_refresh, Duration::from_millis(500));
    }
}
