//! graphling command-line front end.
//!
//! Thin scripts over the graphling client library:
//! - `graphling query` - run a GraphQL query and print the JSON reply
//! - `graphling renew` - force a token renewal for a shared token file
//! - `graphling close` - invalidate the session and drop the token file

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

mod close;
mod connect;
mod query;
mod renew;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// Process exit statuses for scripts built on the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitStatus {
    /// Command completed.
    Ok,
    /// Command failed.
    Failure,
    /// Configuration problem: bad flags or an unreadable keyfile.
    Config,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Ok => Self::SUCCESS,
            ExitStatus::Failure => Self::from(1u8),
            ExitStatus::Config => Self::from(78u8), // EX_CONFIG
        }
    }
}

/// Generic GraphQL client CLI.
#[derive(Parser)]
#[command(name = "graphling")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a GraphQL query and print the JSON reply to stdout.
    Query(query::QueryArgs),

    /// Force a token renewal.
    ///
    /// Meant for dedicated refresh processes sharing a token file with
    /// query scripts.
    Renew(renew::RenewArgs),

    /// Invalidate the session server-side and drop the token file.
    Close(close::CloseArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Query(args) => query::run(args).await,
        Commands::Renew(args) => renew::run(args).await,
        Commands::Close(args) => close::run(args).await,
    };

    match result {
        Ok(()) => ExitStatus::Ok.into(),
        Err(err) => {
            tracing::error!("command failed: {err:#}");
            exit_status(&err).into()
        }
    }
}

/// Initialize tracing. Logs go to stderr so stdout stays clean for JSON
/// output.
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.into()),
        )
        .init();
}

fn exit_status(err: &anyhow::Error) -> ExitStatus {
    match err.downcast_ref::<graphling::Error>() {
        Some(err) if err.is_config() => ExitStatus::Config,
        _ => ExitStatus::Failure,
    }
}
