use std::time::Duration;

use crate::error::TripPlannerError;

/// Environment variable holding the remote store's base URL
pub const API_URL_VAR: &str = "TRIP_PLANNER_API_URL";
/// Environment variable holding the request timeout in seconds
pub const TIMEOUT_VAR: &str = "TRIP_PLANNER_TIMEOUT_SECS";
/// Environment variable holding the bearer token sent with every request
pub const TOKEN_VAR: &str = "TRIP_PLANNER_TOKEN";

/// Connection settings for the HTTP gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Base URL every resource path is appended to (default: http://127.0.0.1:5000)
    pub base_url: String,

    /// Per-request timeout (default: 10 seconds)
    pub timeout: Duration,

    /// Token sent as `Authorization: Bearer <token>`, if any
    pub bearer_token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout: Duration::from_secs(10),
            bearer_token: None,
        }
    }
}

impl GatewayConfig {
    /// Reads the configuration from the process environment, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, TripPlannerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`GatewayConfig::from_env`] but reading from an arbitrary source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TripPlannerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = match lookup(API_URL_VAR) {
            Some(url) => parse_base_url(&url)?,
            None => defaults.base_url,
        };

        let timeout = match lookup(TIMEOUT_VAR) {
            Some(secs) => parse_timeout(&secs)?,
            None => defaults.timeout,
        };

        let bearer_token = lookup(TOKEN_VAR)
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());

        Ok(Self {
            base_url,
            timeout,
            bearer_token,
        })
    }

    /// Returns a copy pointed at `url`, checked the same way as `TRIP_PLANNER_API_URL`
    pub fn with_base_url(mut self, url: &str) -> Result<Self, TripPlannerError> {
        self.base_url = parse_base_url(url)?;
        Ok(self)
    }

    /// Returns a copy that authenticates with `token`
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

fn parse_base_url(raw: &str) -> Result<String, TripPlannerError> {
    let url = raw.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(TripPlannerError::Config(format!(
            "{} must be an http(s) URL, got '{}'",
            API_URL_VAR, raw
        )));
    }
    Ok(url.to_string())
}

fn parse_timeout(raw: &str) -> Result<Duration, TripPlannerError> {
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(TripPlannerError::Config(format!(
            "{} must be a positive number of seconds, got '{}'",
            TIMEOUT_VAR, raw
        ))),
        Ok(secs) => Ok(Duration::from_secs(secs)),
    }
}
