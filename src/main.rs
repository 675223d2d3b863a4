//! cuelink - Main entry point
//!
//! Resolves the controller endpoint, initializes tracing, and hands control
//! to the connection supervisor, which runs until the process is killed.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cuelink::actions::SystemActions;
use cuelink::{ConnectionSupervisor, ServerEndpoint};

/// Command-line arguments for cuelink
#[derive(Parser, Debug)]
#[command(name = "cuelink")]
#[command(about = "Persistent-connection cue client")]
#[command(version)]
struct Args {
    /// Controller endpoint override: "host:port" or "ws://host:port/path".
    /// Defaults to the compiled-in controller address.
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cuelink=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // A malformed override is a configuration mistake, not a transient
    // condition: fail the process instead of retrying.
    let endpoint = match args.endpoint {
        Some(value) => ServerEndpoint::parse_override(&value)
            .with_context(|| format!("invalid endpoint override '{}'", value))?,
        None => ServerEndpoint::default_endpoint(),
    };

    info!("Starting cuelink, controller at {}", endpoint.ws_url());

    let supervisor = ConnectionSupervisor::new(endpoint, Arc::new(SystemActions));
    supervisor.run().await;

    Ok(())
}
