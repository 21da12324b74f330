//! Shared connection flags.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use graphling::GraphClient;

/// Flags selecting and configuring the client connection.
#[derive(Debug, Args)]
pub(crate) struct ConnectArgs {
    /// JSON credentials keyfile.
    #[arg(short, long, env = "GRAPHLING_KEYFILE")]
    pub keyfile: Option<PathBuf>,

    /// API base URL (anonymous mode when no keyfile is given).
    #[arg(short, long, env = "GRAPHLING_BASE_URL")]
    pub base_url: Option<String>,

    /// Session-deletion endpoint path, relative to the base URL.
    #[arg(long)]
    pub session_path: Option<String>,

    /// GraphQL endpoint path, relative to the base URL.
    #[arg(long)]
    pub graphql_path: Option<String>,

    /// HTTP timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Skip TLS certificate validation.
    #[arg(long)]
    pub insecure: bool,

    /// Proxy URL applied to every request.
    #[arg(long, env = "GRAPHLING_PROXY")]
    pub proxy: Option<String>,

    /// Do not manage the token lifecycle; use the token file as-is.
    #[arg(long)]
    pub no_manage_token: bool,

    /// Do not persist issued tokens to the token file.
    #[arg(long)]
    pub no_keep_token: bool,
}

impl ConnectArgs {
    /// Open a client from the flags.
    pub(crate) async fn connect(&self) -> anyhow::Result<GraphClient> {
        let mut builder = GraphClient::builder()
            .with_timeout(Duration::from_secs(self.timeout))
            .with_insecure(self.insecure)
            .with_manage_token(!self.no_manage_token)
            .with_keep_token(!self.no_keep_token);

        if let Some(keyfile) = &self.keyfile {
            builder = builder.with_keyfile(keyfile.clone());
        }
        if let Some(base_url) = &self.base_url {
            builder = builder.with_base_url(base_url.clone());
        }
        if let Some(session_path) = &self.session_path {
            builder = builder.with_session_path(session_path.clone());
        }
        if let Some(graphql_path) = &self.graphql_path {
            builder = builder.with_graphql_path(graphql_path.clone());
        }
        if let Some(proxy) = &self.proxy {
            builder = builder.with_proxy(proxy.clone());
        }

        builder.connect().await.context("failed to open the client")
    }
}
