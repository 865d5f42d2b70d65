//! Error taxonomy.
//!
//! API failures are split into transient and fatal classes so callers can
//! decide whether a retry makes sense. Configuration, validation and
//! authentication failures get their own types; `main` wraps all of them
//! in `anyhow` at the process edge.

use std::path::PathBuf;
use thiserror::Error;

/// Failure talking to a Google API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network failure, timeout, quota exhaustion or a 5xx response.
    #[error("transient API error{}: {message}", status_suffix(.status))]
    Transient {
        status: Option<u16>,
        message: String,
    },

    /// Permission denied, bad request or any other non-retryable response.
    #[error("Google API error{}: {message}", status_suffix(.status))]
    Fatal {
        status: Option<u16>,
        message: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("failed to decode API response from {url}: {message}")]
    Decode { url: String, message: String },

    /// A field in an otherwise valid response held an unusable value.
    #[error("malformed API data: {0}")]
    Malformed(String),

    /// The requested data was still empty after every allowed attempt.
    #[error("report unavailable: {0}")]
    Unavailable(String),

    /// The request could not be built from the given arguments.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] ValidationError),
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" {}", code),
        None => String::new(),
    }
}

impl ApiError {
    /// Whether repeating the same request later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Transient { .. })
    }

    /// HTTP status attached to the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transient { status, .. } | ApiError::Fatal { status, .. } => *status,
            _ => None,
        }
    }

    /// HTTP 403: the credential lacks the scope or the admin role.
    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(403)
    }

    /// Classify an HTTP status and message into the taxonomy.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if status == 429 || status >= 500 {
            ApiError::Transient {
                status: Some(status),
                message,
            }
        } else {
            ApiError::Fatal {
                status: Some(status),
                message,
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() || e.is_connect() || e.is_request() {
            ApiError::Transient {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            }
        } else if let Some(status) = e.status() {
            ApiError::from_status(status.as_u16(), e.to_string())
        } else {
            ApiError::Fatal {
                status: None,
                message: e.to_string(),
            }
        }
    }
}

/// Problems with the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("missing required config field: {0}")]
    MissingField(&'static str),

    #[error("network '{network}' lists '{value}', which is not an IP address")]
    InvalidNetworkAddress { network: String, value: String },

    #[error("{field} = {value} is outside 1..={max}")]
    DaysOutOfRange {
        field: &'static str,
        value: u32,
        max: u32,
    },
}

/// Malformed command-line input that clap's own parsing cannot catch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("wrong email format: {0}")]
    InvalidEmail(String),

    #[error("search keyword must not be empty")]
    EmptyKeyword,

    #[error("day count must be at least 1")]
    ZeroDays,

    #[error("invalid day count '{0}'")]
    InvalidDays(String),

    #[error("day count {days} exceeds the maximum of {max}")]
    DaysOutOfRange { days: u32, max: u32 },

    #[error("cannot use both --verbose and --quiet")]
    ConflictingVerbosity,
}

/// Failure obtaining an OAuth access token.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unable to read client secret file {path}: {source}")]
    ClientSecret {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to prepare credential cache at {path}: {source}")]
    CacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not determine home directory for the credential cache")]
    NoHomeDir,

    #[error("failed to build authenticator: {0}")]
    Authenticator(#[source] std::io::Error),

    #[error("unable to retrieve access token: {0}")]
    Token(String),
}
