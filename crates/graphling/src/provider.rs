//! Client-credentials token exchange.

use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::token::{TokenRecord, TokenResponse};

/// Exchange payload sent to the token endpoint.
#[derive(Serialize)]
struct ExchangeRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    name: &'a str,
}

/// Exchanges client credentials for bearer tokens.
#[derive(Debug, Clone)]
pub struct TokenProvider {
    http: Client,
}

impl TokenProvider {
    /// Create a provider using the given HTTP client.
    #[must_use]
    pub const fn new(http: Client) -> Self {
        Self { http }
    }

    /// Trade credentials for a fresh token record.
    ///
    /// A non-2xx response from the token endpoint becomes
    /// [`Error::Authentication`] carrying the HTTP status and body.
    pub async fn fetch(&self, credentials: &Credentials) -> Result<TokenRecord> {
        debug!(endpoint = %credentials.access_token_uri, "requesting access token");
        let payload = ExchangeRequest {
            client_id: &credentials.client_id,
            client_secret: &credentials.client_secret,
            name: &credentials.name,
        };

        let response = self
            .http
            .post(&credentials.access_token_uri)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Authentication { status, body });
        }

        let issued_at = Utc::now();
        let token: TokenResponse = response.json().await?;
        info!("access token issued");
        Ok(TokenRecord::from_response(token, issued_at))
    }
}
