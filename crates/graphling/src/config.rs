//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::{DEFAULT_GRAPHQL_PATH, DEFAULT_SESSION_PATH, DEFAULT_TIMEOUT};

/// Immutable client configuration.
///
/// Every recognized option and its effect is enumerated here; values are set
/// through [`crate::GraphClientBuilder`] and frozen at construction.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL. Derived from the credentials keyfile when absent.
    pub base_url: Option<String>,
    /// Credentials keyfile path; `None` selects anonymous mode.
    pub keyfile: Option<PathBuf>,
    /// Session-deletion endpoint path, relative to the base URL.
    pub session_path: String,
    /// GraphQL endpoint path, relative to the base URL.
    pub graphql_path: String,
    /// Default HTTP round-trip timeout.
    pub timeout: Duration,
    /// Skip TLS certificate validation.
    pub insecure: bool,
    /// Proxy URL applied to every request.
    pub proxy: Option<String>,
    /// Manage the token lifecycle: load, refresh, persist.
    pub manage_token: bool,
    /// Persist issued tokens to the token file.
    pub keep_token: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            keyfile: None,
            session_path: DEFAULT_SESSION_PATH.to_string(),
            graphql_path: DEFAULT_GRAPHQL_PATH.to_string(),
            timeout: DEFAULT_TIMEOUT,
            insecure: false,
            proxy: None,
            manage_token: true,
            keep_token: true,
        }
    }
}
