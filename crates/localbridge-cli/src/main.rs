//! Command-line front end for the local platform bridge.
//!
//! Stands in for the browser UI: each subcommand is one bridge call, and
//! `watch` holds the lifecycle connection the way a running UI would.
//!
//! Run against a backend on the default port:
//!   localbridge info
//!   localbridge write /tmp/x.txt --content hello
//!   localbridge save boards project-1 '{"title": "Roadmap"}'
//!   localbridge get boards/project-1
//!   localbridge watch

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("localbridge=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    let config = cli.bridge_config()?;

    tracing::debug!("Using backend at {}", config.base_url());

    commands::run(cli.command, config).await
}
