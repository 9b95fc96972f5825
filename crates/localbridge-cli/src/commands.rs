//! Subcommand handlers.

use crate::cli::{self, Command};
use localbridge_client::{Bridge, BridgeConfig, ConnectionState, Platform, SystemInfo};

pub async fn run(command: Command, config: BridgeConfig) -> anyhow::Result<()> {
    let bridge = Bridge::new(config);

    match command {
        // Only `watch` opens the lifecycle socket: the backend shuts down
        // when that socket closes.
        Command::Watch => watch(bridge.config().clone()).await?,
        Command::Info => {
            let info = bridge.sys().info().await?;
            print_info(&info);
        }
        Command::Open { target } => {
            bridge.sys().open_external(&target).await?;
            println!("Opened {target}");
        }
        Command::Read { path } => {
            let content = bridge.io().read_text(&path).await?;
            print!("{content}");
        }
        Command::Write { path, content } => {
            let content = match content {
                Some(content) => content,
                None => std::io::read_to_string(std::io::stdin())?,
            };
            let ack = bridge.io().write_text(&path, &content).await?;
            println!("Saved to disk: {}", ack.path().unwrap_or(&path));
        }
        Command::Save {
            collection,
            id,
            json,
        } => {
            let data = cli::document_json(&json)?;
            let ack = bridge.store().save_document(&collection, &id, &data).await?;
            match ack.path() {
                Some(path) => println!("Saved JSON to: {path}"),
                None => println!("Saved {collection}/{id}"),
            }
        }
        Command::Get { address, id } => {
            let address = cli::document_address(&address, id.as_deref())?;
            let data = bridge
                .store()
                .get_document(address.collection(), address.id())
                .await?;
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
    }

    Ok(())
}

fn print_info(info: &SystemInfo) {
    println!("OS:      {}", info.platform().unwrap_or("-"));
    println!("Runtime: {}", info.runtime_version().unwrap_or("-"));
    println!("CWD:     {}", info.current_working_directory().unwrap_or("-"));
}

/// Hold the lifecycle connection until the backend goes away or Ctrl-C.
async fn watch(config: BridgeConfig) -> anyhow::Result<()> {
    let platform = Platform::start(config);

    let status = platform.lifecycle().observe(|state: ConnectionState| match state {
        ConnectionState::Connected => println!("Connected"),
        ConnectionState::Disconnected => println!("Disconnected (backend closing)"),
        ConnectionState::Unconnected => {}
    });

    match platform.bridge().sys().info().await {
        Ok(info) => print_info(&info),
        Err(e) => tracing::warn!("Error connecting to API: {}", e),
    }

    tokio::select! {
        () = platform.lifecycle().wait_for_disconnect() => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("Interrupted; closing lifecycle connection");
            platform.lifecycle().close().await;
        }
    }

    // Let the observer print the final state before exiting.
    status.await?;
    Ok(())
}
