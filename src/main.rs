mod archive;
mod cli;
mod commands;
mod error;
mod mcp;
mod names;
mod page_range;
mod pdf;
mod plan;
mod splitter;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout belongs to the command output (and to the MCP transport)
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Split { input, output } => {
            commands::split::run(&input, &output)?;
        }
        Commands::Plan { input } => {
            commands::plan::run(&input)?;
        }
        Commands::Names { path, names_format } => {
            commands::names::run(&path, names_format)?;
        }
    }

    Ok(())
}
