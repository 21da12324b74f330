//! Credentials keyfile model and loading.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

/// Client credentials loaded from a JSON keyfile.
///
/// Loaded once and immutable for the process lifetime. `Debug` output
/// redacts the secret.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    /// Client identifier presented to the token endpoint.
    pub client_id: String,
    /// Client secret exchanged for a bearer token.
    pub client_secret: String,
    /// Client name sent with the exchange payload.
    pub name: String,
    /// Absolute URL of the token-exchange endpoint.
    pub access_token_uri: String,
}

impl Credentials {
    /// Load credentials from a JSON keyfile.
    pub fn from_keyfile(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading credentials keyfile");
        let contents = fs::read_to_string(path).map_err(|err| Error::Credentials {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        serde_json::from_str(&contents).map_err(|err| Error::Credentials {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Derive the API base URL by stripping the final path segment of the
    /// token-exchange URL.
    pub fn base_url(&self) -> Result<String> {
        let mut url = Url::parse(&self.access_token_uri)
            .map_err(|err| Error::Config(format!("access_token_uri: {err}")))?;
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|()| Error::Config("access_token_uri cannot be a base URL".into()))?
            .pop();
        Ok(url.to_string().trim_end_matches('/').to_string())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // client_secret stays out of logs and debug output
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("name", &self.name)
            .field("access_token_uri", &self.access_token_uri)
            .finish()
    }
}
