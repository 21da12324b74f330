//! `graphling query` - run a query and print the JSON reply.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde_json::Value;

use crate::connect::ConnectArgs;

/// Arguments for `graphling query`.
#[derive(Debug, Args)]
pub(crate) struct QueryArgs {
    #[command(flatten)]
    pub connection: ConnectArgs,

    /// Query text; read from --file or stdin when omitted.
    pub query: Option<String>,

    /// Read the query from a file.
    #[arg(short, long, conflicts_with = "query")]
    pub file: Option<PathBuf>,

    /// Query variables as a JSON object.
    #[arg(short, long)]
    pub variables: Option<String>,
}

/// Run the query and pretty-print the reply to stdout.
pub(crate) async fn run(args: QueryArgs) -> anyhow::Result<()> {
    let query = read_query(&args)?;
    let variables = args
        .variables
        .as_deref()
        .map(serde_json::from_str::<Value>)
        .transpose()
        .context("variables must be a JSON document")?;

    let client = args.connection.connect().await?;
    let reply = client.query(&query, variables).await?;

    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}

fn read_query(args: &QueryArgs) -> anyhow::Result<String> {
    if let Some(query) = &args.query {
        return Ok(query.clone());
    }
    if let Some(file) = &args.file {
        return std::fs::read_to_string(file)
            .with_context(|| format!("failed to read query file {}", file.display()));
    }
    let mut query = String::new();
    std::io::stdin()
        .read_to_string(&mut query)
        .context("failed to read query from stdin")?;
    Ok(query)
}
