//! Command-line arguments.

use anyhow::Context;
use clap::{Parser, Subcommand};
use localbridge_client::{BridgeConfig, DocumentAddress};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "localbridge", version, about = "Talk to a local platform backend")]
pub struct Cli {
    /// TOML config file.
    #[arg(long, env = "LOCALBRIDGE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL; overrides the config file.
    #[arg(long, env = "LOCALBRIDGE_BASE_URL", global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the backend's platform, runtime version and working directory.
    Info,
    /// Open a URL or path with the backend host's default application.
    Open { target: String },
    /// Print the text of a file on the backend host.
    Read { path: String },
    /// Write text to a file on the backend host (stdin when --content is omitted).
    Write {
        path: String,
        #[arg(long)]
        content: Option<String>,
    },
    /// Save a JSON document. Pass the JSON inline or as @file.
    Save {
        collection: String,
        id: String,
        json: String,
    },
    /// Fetch a JSON document, as `<collection> <id>` or `<collection>/<id>`.
    Get { address: String, id: Option<String> },
    /// Hold the lifecycle connection and report backend availability.
    Watch,
}

impl Cli {
    /// Defaults, then the config file, then `--base-url`.
    pub fn bridge_config(&self) -> anyhow::Result<BridgeConfig> {
        let config = match &self.config {
            Some(path) => BridgeConfig::load(path)?,
            None => BridgeConfig::default(),
        };
        Ok(match &self.base_url {
            Some(url) => config.with_base_url(url)?,
            None => config,
        })
    }
}

/// Resolve the `get` arguments into an address.
pub fn document_address(address: &str, id: Option<&str>) -> anyhow::Result<DocumentAddress> {
    match id {
        Some(id) => Ok(DocumentAddress::new(address, id)),
        None => Ok(address.parse()?),
    }
}

/// Parse the `save` payload, reading it from a file when it starts with `@`.
///
/// Bad JSON is reported here, before anything is sent.
pub fn document_json(arg: &str) -> anyhow::Result<serde_json::Value> {
    let text = match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read document file {path}"))?,
        None => arg.to_string(),
    };
    serde_json::from_str(&text).context("Invalid JSON format")
}
