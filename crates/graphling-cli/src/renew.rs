//! `graphling renew` - force a token renewal.

use clap::Args;

use crate::connect::ConnectArgs;

/// Arguments for `graphling renew`.
#[derive(Debug, Args)]
pub(crate) struct RenewArgs {
    #[command(flatten)]
    pub connection: ConnectArgs,
}

/// Open the session with token management disabled, then force a single
/// renewal. The fresh token lands in the shared token file.
pub(crate) async fn run(args: RenewArgs) -> anyhow::Result<()> {
    let mut connection = args.connection;
    connection.no_manage_token = true;

    let mut client = connection.connect().await?;
    client.renew_token().await?;
    tracing::info!("token renewed");
    Ok(())
}
