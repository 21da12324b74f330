//! Graphling - generic GraphQL client with session-token management.
//!
//! This crate provides:
//! - A schema-agnostic GraphQL-over-HTTP client: query text is passed
//!   through verbatim and responses come back as raw JSON.
//! - Client-credentials token exchange against a configurable endpoint.
//! - A file-backed token cache co-located with the credentials keyfile, so
//!   independent processes can share one bearer token.
//! - Explicit session lifecycle control: reuse, forced renewal, and
//!   server-side invalidation.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use graphling::GraphClient;
//!
//! // Credentials-based client; token is loaded, refreshed, and persisted
//! // next to the keyfile.
//! let client = GraphClient::builder()
//!     .with_keyfile("/etc/svc/api-key.json")
//!     .connect()
//!     .await?;
//!
//! let reply = client.query("query { viewer { id } }", None).await?;
//!
//! // Anonymous client for open endpoints.
//! let open = GraphClient::builder()
//!     .with_base_url("https://fruits-api.netlify.app")
//!     .connect()
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod client;
mod config;
mod credentials;
mod error;
mod provider;
mod session;
mod store;
mod token;

pub use client::{GraphClient, GraphClientBuilder};
pub use config::ClientConfig;
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use provider::TokenProvider;
pub use session::{SessionManager, SessionState};
pub use store::TokenStore;
pub use token::{TokenRecord, TokenResponse};

use std::time::Duration;

/// Default token lifetime applied when the exchange response does not report
/// one.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(3600); // 1 hour

/// Default HTTP round-trip timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default session-deletion endpoint path, relative to the base URL.
pub const DEFAULT_SESSION_PATH: &str = "session";

/// Default GraphQL endpoint path, relative to the base URL.
pub const DEFAULT_GRAPHQL_PATH: &str = "graphql";

/// File extension of the persisted token file.
pub const TOKEN_FILE_EXT: &str = "token";
