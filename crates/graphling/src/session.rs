//! Session lifecycle and token-management state machine.

use reqwest::Client;
use tracing::{debug, info};

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::provider::TokenProvider;
use crate::store::TokenStore;
use crate::token::TokenRecord;

/// Token-management states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No token is held.
    NoToken,
    /// A token is held and its expiry is in the future.
    Valid,
    /// A token was held but has passed its expiry.
    Expired,
    /// Token management is disabled; freshness is the caller's concern.
    Disabled,
}

/// Manages the token lifecycle for a credentials-based client.
///
/// The manager owns the persisted token record: it decides when to reuse,
/// refresh, or discard it. When token management is disabled the record is
/// treated as read-only external state.
#[derive(Debug)]
pub struct SessionManager {
    credentials: Credentials,
    store: TokenStore,
    provider: TokenProvider,
    state: SessionState,
    record: Option<TokenRecord>,
}

impl SessionManager {
    /// Open a session: reuse the persisted token when fresh, otherwise fetch
    /// a new one and persist it.
    ///
    /// With `manage_token` disabled the persisted record (if any) is used
    /// as-is and the provider is never consulted.
    pub async fn open(
        credentials: Credentials,
        store: TokenStore,
        provider: TokenProvider,
        manage_token: bool,
    ) -> Result<Self> {
        let mut session = Self {
            credentials,
            store,
            provider,
            state: SessionState::NoToken,
            record: None,
        };

        if !manage_token {
            session.state = SessionState::Disabled;
            session.record = session.store.load();
            if session.record.is_some() {
                debug!("token management disabled, using persisted token as-is");
            }
            return Ok(session);
        }

        match session.store.load() {
            Some(record) if !record.is_expired() => {
                debug!("reusing persisted token");
                session.record = Some(record);
                session.state = SessionState::Valid;
            }
            Some(_) => {
                debug!("persisted token expired");
                session.state = SessionState::Expired;
                session.fetch_and_persist().await?;
            }
            None => {
                session.fetch_and_persist().await?;
            }
        }
        Ok(session)
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Access token held by the session, if any.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.record
            .as_ref()
            .map(|record| record.access_token.as_str())
    }

    /// Token record held by the session, if any.
    #[must_use]
    pub const fn record(&self) -> Option<&TokenRecord> {
        self.record.as_ref()
    }

    /// Force a token refresh regardless of the current state.
    pub async fn renew(&mut self) -> Result<()> {
        info!("token renewal requested");
        self.state = SessionState::Expired;
        self.record = None;
        self.fetch_and_persist().await
    }

    /// Invalidate the token server-side and clear the store entry.
    ///
    /// Local state is cleared even when the server rejects the call; the
    /// non-2xx status is then surfaced as [`Error::Request`].
    pub async fn close(&mut self, http: &Client, session_url: &str) -> Result<()> {
        info!(endpoint = session_url, "closing session");
        let mut request = http.delete(session_url);
        if let Some(record) = &self.record {
            request = request.bearer_auth(&record.access_token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = if status.is_success() {
            String::new()
        } else {
            response.text().await.unwrap_or_default()
        };

        self.record = None;
        self.state = SessionState::NoToken;
        self.store.delete()?;

        if !status.is_success() {
            return Err(Error::Request { status, body });
        }
        Ok(())
    }

    async fn fetch_and_persist(&mut self) -> Result<()> {
        let record = self.provider.fetch(&self.credentials).await?;
        self.store.save(&record)?;
        self.record = Some(record);
        self.state = SessionState::Valid;
        Ok(())
    }
}
