//! `graphling close` - invalidate the session.

use clap::Args;

use crate::connect::ConnectArgs;

/// Arguments for `graphling close`.
#[derive(Debug, Args)]
pub(crate) struct CloseArgs {
    #[command(flatten)]
    pub connection: ConnectArgs,
}

/// Close the session using whatever token is persisted, without fetching a
/// new one first.
pub(crate) async fn run(args: CloseArgs) -> anyhow::Result<()> {
    let mut connection = args.connection;
    connection.no_manage_token = true;

    let mut client = connection.connect().await?;
    client.close_session().await?;
    tracing::info!("session closed");
    Ok(())
}
