//! GraphQL HTTP client and builder.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::provider::TokenProvider;
use crate::session::{SessionManager, SessionState};
use crate::store::TokenStore;

/// Builder for [`GraphClient`].
///
/// Exactly one of [`with_keyfile`](Self::with_keyfile) or
/// [`with_base_url`](Self::with_base_url) must be set before
/// [`connect`](Self::connect); a keyfile selects the credentials-based
/// session, a bare base URL selects anonymous mode.
#[derive(Debug, Clone, Default)]
pub struct GraphClientBuilder {
    config: ClientConfig,
}

impl GraphClientBuilder {
    /// Create a builder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the credentials keyfile path.
    #[must_use]
    pub fn with_keyfile(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.keyfile = Some(path.into());
        self
    }

    /// Set the API base URL.
    ///
    /// With a keyfile this overrides the URL derived from
    /// `access_token_uri`; without one it selects anonymous mode.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Override the session-deletion endpoint path.
    #[must_use]
    pub fn with_session_path(mut self, path: impl Into<String>) -> Self {
        self.config.session_path = path.into();
        self
    }

    /// Override the GraphQL endpoint path.
    #[must_use]
    pub fn with_graphql_path(mut self, path: impl Into<String>) -> Self {
        self.config.graphql_path = path.into();
        self
    }

    /// Set the default HTTP round-trip timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Skip TLS certificate validation.
    #[must_use]
    pub const fn with_insecure(mut self, insecure: bool) -> Self {
        self.config.insecure = insecure;
        self
    }

    /// Route every request through a proxy.
    #[must_use]
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.config.proxy = Some(proxy.into());
        self
    }

    /// Enable or disable token-lifecycle management.
    #[must_use]
    pub const fn with_manage_token(mut self, manage_token: bool) -> Self {
        self.config.manage_token = manage_token;
        self
    }

    /// Enable or disable token persistence.
    #[must_use]
    pub const fn with_keep_token(mut self, keep_token: bool) -> Self {
        self.config.keep_token = keep_token;
        self
    }

    /// Validate the configuration and open the client.
    pub async fn connect(self) -> Result<GraphClient> {
        GraphClient::connect(self.config).await
    }
}

/// Generic GraphQL client.
///
/// Query text is passed through verbatim and responses come back as raw
/// JSON; GraphQL-level `errors` payloads are the caller's to inspect.
#[derive(Debug)]
pub struct GraphClient {
    http: reqwest::Client,
    base_url: String,
    graphql_url: String,
    session_url: String,
    config: ClientConfig,
    session: Option<SessionManager>,
}

impl GraphClient {
    /// Start building a client.
    #[must_use]
    pub fn builder() -> GraphClientBuilder {
        GraphClientBuilder::new()
    }

    /// Open a client from a full configuration.
    ///
    /// With a keyfile this loads the credentials, consults the token store,
    /// and fetches a token when needed; with only a base URL the client is
    /// anonymous and no token logic runs.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let http = build_http_client(&config)?;

        let (base_url, session) = match (&config.keyfile, &config.base_url) {
            (Some(keyfile), base_override) => {
                let credentials = Credentials::from_keyfile(keyfile)?;
                let base_url = match base_override {
                    Some(base) => base.clone(),
                    None => credentials.base_url()?,
                };
                let store = TokenStore::for_keyfile(keyfile, config.keep_token);
                let provider = TokenProvider::new(http.clone());
                let session =
                    SessionManager::open(credentials, store, provider, config.manage_token)
                        .await?;
                (base_url, Some(session))
            }
            (None, Some(base)) => {
                debug!("anonymous mode, token management skipped");
                (base.clone(), None)
            }
            (None, None) => {
                return Err(Error::Config(
                    "either a credentials keyfile or a base URL is required".into(),
                ));
            }
        };

        let base_url = base_url.trim_end_matches('/').to_string();
        info!(base_url = %base_url, "client ready");
        Ok(Self {
            graphql_url: format!("{base_url}/{}", config.graphql_path),
            session_url: format!("{base_url}/{}", config.session_path),
            base_url,
            http,
            config,
            session,
        })
    }

    /// Base URL queried by this client.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Session state, or `None` for anonymous clients.
    #[must_use]
    pub fn session_state(&self) -> Option<SessionState> {
        self.session.as_ref().map(SessionManager::state)
    }

    /// Issue a GraphQL query with the default timeout.
    pub async fn query(&self, query: &str, variables: Option<Value>) -> Result<Value> {
        self.query_with_timeout(query, variables, self.config.timeout)
            .await
    }

    /// Issue a GraphQL query bounded by `timeout`.
    ///
    /// The timeout covers the single HTTP round trip; there are no retries.
    /// A status of 400 or above becomes [`Error::Request`] carrying the
    /// status and response body.
    pub async fn query_with_timeout(
        &self,
        query: &str,
        variables: Option<Value>,
        timeout: Duration,
    ) -> Result<Value> {
        let mut body = serde_json::Map::new();
        body.insert("query".to_string(), Value::String(query.to_string()));
        if let Some(variables) = variables {
            body.insert("variables".to_string(), variables);
        }

        debug!(endpoint = %self.graphql_url, "sending GraphQL request");
        let mut request = self
            .http
            .post(&self.graphql_url)
            .json(&Value::Object(body))
            .timeout(timeout);
        if let Some(token) = self.access_token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Request { status, body });
        }
        Ok(response.json().await?)
    }

    /// Force a token renewal, regardless of the current token's validity.
    ///
    /// Intended for dedicated refresh processes sharing a token file.
    /// Configuration error in anonymous mode.
    pub async fn renew_token(&mut self) -> Result<()> {
        match self.session.as_mut() {
            Some(session) => session.renew().await,
            None => Err(Error::Config(
                "token renewal requires a credentials keyfile".into(),
            )),
        }
    }

    /// Invalidate the session server-side and drop the persisted token.
    ///
    /// Must be called explicitly when token persistence is disabled, since no
    /// token file exists for a later process to reuse or invalidate.
    /// Configuration error in anonymous mode.
    pub async fn close_session(&mut self) -> Result<()> {
        match self.session.as_mut() {
            Some(session) => session.close(&self.http, &self.session_url).await,
            None => Err(Error::Config("no session to close in anonymous mode".into())),
        }
    }

    fn access_token(&self) -> Option<&str> {
        self.session.as_ref().and_then(SessionManager::access_token)
    }
}

fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(config.timeout);
    if config.insecure {
        builder = builder.danger_accept_invalid_certs(true);
    }
    if let Some(proxy) = &config.proxy {
        let proxy =
            reqwest::Proxy::all(proxy).map_err(|err| Error::Config(format!("proxy: {err}")))?;
        builder = builder.proxy(proxy);
    }
    Ok(builder.build()?)
}
