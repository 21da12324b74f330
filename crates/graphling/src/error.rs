//! Error types for the client.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid client configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Credentials keyfile could not be read or parsed.
    #[error("credentials file {path}: {message}")]
    Credentials {
        /// Keyfile path.
        path: PathBuf,
        /// Read or parse failure details.
        message: String,
    },

    /// The token endpoint rejected the credential exchange.
    #[error("authentication failed with status {status}: {body}")]
    Authentication {
        /// HTTP status returned by the token endpoint.
        status: StatusCode,
        /// Response body.
        body: String,
    },

    /// The GraphQL or session endpoint returned a failure status.
    #[error("request failed with status {status}: {body}")]
    Request {
        /// HTTP status returned by the endpoint.
        status: StatusCode,
        /// Response body.
        body: String,
    },

    /// HTTP transport failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encode/decode failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Token file could not be written or removed.
    #[error("token file {path}: {source}")]
    TokenFile {
        /// Token file path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns `true` for configuration-level failures: bad builder input or
    /// an unreadable credentials keyfile.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Credentials { .. })
    }

    /// HTTP status carried by the error, when one exists.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Authentication { status, .. } | Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}
