//! Backend client configuration parsed from environment variables.

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8091";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_STREAM_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for ApiTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub demo_mode: bool,
    pub timeouts: ApiTimeouts,
    /// Bound on buffered generation events before the reader waits.
    pub stream_capacity: usize,
}

impl ApiConfig {
    /// Config pointing at `base_url` with every other field defaulted.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
            demo_mode: false,
            timeouts: ApiTimeouts::default(),
            stream_capacity: DEFAULT_STREAM_CAPACITY,
        }
    }

    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `OFFICE_API_BASE_URL`: default `http://127.0.0.1:8091`
    /// - `OFFICE_API_KEY_ENV`: names the env var containing the API key
    /// - `OFFICE_DEMO_MODE`: `true`/`false`, default false
    /// - `OFFICE_REQUEST_TIMEOUT_SECS`: default 30
    /// - `OFFICE_CONNECT_TIMEOUT_SECS`: default 10
    /// - `OFFICE_STREAM_CAPACITY`: default 64
    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = std::env::var("OFFICE_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let api_key = match std::env::var("OFFICE_API_KEY_ENV") {
            Ok(key_var) => {
                Some(std::env::var(&key_var).map_err(|_| ApiError::MissingApiKey { var: key_var.clone() })?)
            }
            Err(_) => None,
        };

        let demo_mode = parse_flag("OFFICE_DEMO_MODE", std::env::var("OFFICE_DEMO_MODE").ok().as_deref())?;
        let timeouts = ApiTimeouts {
            request_secs: env_parse("OFFICE_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("OFFICE_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let stream_capacity = env_parse("OFFICE_STREAM_CAPACITY", DEFAULT_STREAM_CAPACITY).max(1);

        Ok(Self { api_key, demo_mode, timeouts, stream_capacity, ..Self::new(&base_url) })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_flag(key: &str, raw: Option<&str>) -> Result<bool, ApiError> {
    match raw.map(str::trim).map(str::to_ascii_lowercase).as_deref() {
        None | Some("" | "0" | "false" | "no" | "off") => Ok(false),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some(other) => Err(ApiError::ConfigParse(format!("invalid {key}: {other}"))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
