//! Token record and exchange-response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DEFAULT_TOKEN_TTL;

/// Token-exchange response returned by the credential endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// The issued access token.
    pub access_token: String,

    /// Token type (usually "Bearer").
    #[serde(default)]
    pub token_type: Option<String>,

    /// Lifetime in seconds, when the server reports one.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// A bearer token with its absolute expiry.
///
/// Persisted as a small JSON file next to the credentials keyfile; `expires_at`
/// always reflects issuance time plus the token lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// The access token.
    pub access_token: String,
    /// When the token stops being valid.
    pub expires_at: DateTime<Utc>,
}

impl TokenRecord {
    /// Build a record from an exchange response issued at `issued_at`.
    ///
    /// Expiry is `issued_at + expires_in` when the server reports a lifetime,
    /// `issued_at` plus [`DEFAULT_TOKEN_TTL`] otherwise.
    #[must_use]
    pub fn from_response(response: TokenResponse, issued_at: DateTime<Utc>) -> Self {
        let ttl = response.expires_in.map_or_else(
            || chrono::Duration::from_std(DEFAULT_TOKEN_TTL).unwrap_or(chrono::TimeDelta::MAX),
            |secs| chrono::Duration::seconds(secs.min(i64::MAX as u64) as i64),
        );
        Self {
            access_token: response.access_token,
            expires_at: issued_at + ttl,
        }
    }

    /// `true` once the expiry timestamp has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Authorization header value for this token.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}
