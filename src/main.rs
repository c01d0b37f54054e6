//! Adapter server runner (default binary).
//!
//! Serves board engines over line-delimited JSON until Ctrl-C.

use std::str::FromStr;

use anyhow::Result;
use tokio::sync::watch;
use tracing::{info, warn, Level};
use tracing_subscriber::prelude::*;

use tetris_harness::adapter::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let level = std::env::var("TETRIS_HARNESS_LOG")
        .ok()
        .and_then(|s| Level::from_str(s.trim()).ok())
        .unwrap_or(Level::INFO);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();

    let config = ServerConfig::from_env();
    info!(
        host = %config.host,
        port = config.port,
        width = config.engine.width,
        height = config.engine.height,
        randomizer = config.engine.randomizer.as_str(),
        seed = config.engine.seed,
        "starting adapter"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            // Dropping the sender would stop the server.
            std::future::pending::<()>().await;
        }
        let _ = shutdown_tx.send(true);
    });

    run_server(config, None, shutdown_rx).await
}
