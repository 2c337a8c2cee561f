//! Backend client errors.

/// Grepable error code and retryable flag, surfaced to hosts and logs.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// Errors produced by backend client operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// `OFFICE_API_KEY_ENV` names a variable that is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// A mutation was attempted while the backend is in demo mode.
    #[error("{operation} is disabled in demo mode")]
    ReadOnly { operation: &'static str },

    /// The request was rejected locally before being sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The HTTP request failed in transport.
    #[error("API request failed: {0}")]
    Request(String),

    /// The backend returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    Response { status: u16, body: String },

    /// The response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    Parse(String),

    /// The event stream broke mid-flight.
    #[error("event stream failed: {0}")]
    Stream(String),
}

impl ApiError {
    /// The backend's `detail` message, when the error body carries one.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        let Self::Response { body, .. } = self else {
            return None;
        };
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        value.get("detail")?.as_str().map(str::to_string)
    }
}

impl ErrorCode for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::MissingApiKey { .. } => "E_MISSING_API_KEY",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::ReadOnly { .. } => "E_READ_ONLY",
            Self::InvalidRequest(_) => "E_INVALID_REQUEST",
            Self::Request(_) => "E_API_REQUEST",
            Self::Response { status: 404, .. } => "E_NOT_FOUND",
            Self::Response { status: 409, .. } => "E_CONFLICT",
            Self::Response { .. } => "E_API_RESPONSE",
            Self::Parse(_) => "E_API_PARSE",
            Self::Stream(_) => "E_STREAM",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Stream(_) | Self::Response { status: 429 | 500..=599, .. })
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;
