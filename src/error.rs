//! Error types for PV Console
//!
//! Centralized error handling using snafu for ergonomic error definitions.

use snafu::Snafu;

/// Main error type for the application
#[derive(Debug, Snafu)]
pub enum Error {
    /// A required form field is missing or malformed; nothing was sent
    #[snafu(display("{message}"))]
    Validation { message: String },

    /// The backend answered with a non-2xx status
    #[snafu(display("{message}"))]
    Remote { status: u16, message: String },

    /// The request never produced a response (connect, timeout, body read)
    #[snafu(display("Network error: {message}"))]
    Network { message: String },

    /// Invalid input or configuration
    #[snafu(display("Invalid: {message}"))]
    Invalid { message: String },

    /// IO error (file operations, stdin, etc.)
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// JSON serialization/deserialization error
    #[snafu(display("JSON error: {source}"))]
    Json { source: serde_json::Error },

    /// TOML deserialization error
    #[snafu(display("TOML parse error: {source}"))]
    TomlDe { source: toml::de::Error },

    /// TOML serialization error
    #[snafu(display("TOML serialize error: {source}"))]
    TomlSe { source: toml::ser::Error },

    /// CSV writer error
    #[snafu(display("CSV error: {source}"))]
    Csv { source: csv::Error },
}

impl Error {
    /// Build a remote error from a status code and the raw response body.
    ///
    /// The message is the body's `detail` field when present, else `HTTP <status>`.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| match v.get("detail") {
                Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
                Some(serde_json::Value::Null) | None => None,
                Some(other) => Some(other.to_string()),
            });

        Error::Remote {
            status,
            message: detail.unwrap_or_else(|| format!("HTTP {status}")),
        }
    }

    /// Whether the error was raised before any request went out
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Json { source }
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::TomlDe { source }
    }
}

impl From<toml::ser::Error> for Error {
    fn from(source: toml::ser::Error) -> Self {
        Error::TomlSe { source }
    }
}

impl From<csv::Error> for Error {
    fn from(source: csv::Error) -> Self {
        Error::Csv { source }
    }
}

impl From<reqwest::Error> for Error {
    fn from(source: reqwest::Error) -> Self {
        Error::Network {
            message: source.to_string(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;
