//! Error types for the query endpoint, the settings backend and configuration.
//!
//! None of these are fatal to a running browser: fetch errors end up as the
//! controller's error line, settings errors are logged and swallowed, and
//! configuration errors stop the program before the terminal is taken over.

use thiserror::Error;

/// Failure of a single page fetch against the query endpoint.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (connect, timeout, TLS, ...).
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("server returned {status}{}", detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    Status {
        status: u16,
        detail: Option<String>,
    },

    /// The body could not be decoded as a page response.
    #[error("malformed response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The endpoint answered 2xx but flagged the result as an error.
    #[error("server error {code}: {message}")]
    Server { code: String, message: String },
}

/// Failure to persist a settings value.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings serialization error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Invalid startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid endpoint URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("endpoint URL must use http or https, got {scheme}")]
    UnsupportedScheme { scheme: String },

    #[error("debounce window must be positive")]
    ZeroDebounce,
}
