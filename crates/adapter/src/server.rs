//! TCP server for the engine adapter
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking. Every connection owns its own engine.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::core::EngineConfig;
use crate::runtime::{ClientSession, OutboundMessage};
use crate::types::RandomizerKind;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Settings every new connection's engine starts from.
    pub engine: EngineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7777,
            engine: EngineConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create from `TETRIS_HARNESS_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] over an arbitrary key lookup.
    ///
    /// Missing or unparseable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).map(|s| s.trim().to_string());

        let host = parsed("TETRIS_HARNESS_HOST")
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = parsed("TETRIS_HARNESS_PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let mut engine = defaults.engine;
        if let Some(width) = parsed("TETRIS_HARNESS_WIDTH").and_then(|s| s.parse().ok()) {
            engine.width = width;
        }
        if let Some(height) = parsed("TETRIS_HARNESS_HEIGHT").and_then(|s| s.parse().ok()) {
            engine.height = height;
        }
        if let Some(kind) =
            parsed("TETRIS_HARNESS_RANDOMIZER").and_then(|s| RandomizerKind::from_str(&s))
        {
            engine.randomizer = kind;
        }
        if let Some(seed) = parsed("TETRIS_HARNESS_SEED").and_then(|s| s.parse().ok()) {
            engine.seed = seed;
        }

        Self { host, port, engine }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid socket address {}:{}", self.host, self.port))
    }
}

/// Start the TCP server
///
/// The bound address goes out on `ready_tx` once the listener is up, which is
/// how tests find a port-0 server. The accept loop ends when `shutdown` turns
/// true or its sender is dropped.
pub async fn run_server(
    config: ServerConfig,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
    mut shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    // Fail before binding if connections could never get an engine.
    config.engine.validate()?;

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr).await?;
    let bound = listener.local_addr()?;
    info!(%bound, "adapter listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let mut client_id_counter = 0usize;

    loop {
        let (socket, peer) = tokio::select! {
            accepted = listener.accept() => accepted?,
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!("adapter shutting down");
                    return Ok(());
                }
                continue;
            }
        };

        client_id_counter += 1;
        let client_id = client_id_counter;
        info!(client_id, %peer, "client connected");

        let engine = config.engine;
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, client_id, engine, shutdown).await {
                warn!(client_id, error = %e, "client error");
            }
            info!(client_id, "client disconnected");
        });
    }
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    client_id: usize,
    engine: EngineConfig,
    mut shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let mut session = ClientSession::new(engine)?;

    let (reader, mut writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);

    let (tx, mut rx) = mpsc::unbounded_channel::<OutboundMessage>();

    let write_task = tokio::spawn(async move {
        let mut buf: Vec<u8> = Vec::with_capacity(4096);
        while let Some(msg) = rx.recv().await {
            buf.clear();
            let encoded = match &msg {
                OutboundMessage::Ack(ack) => serde_json::to_writer(&mut buf, ack),
                OutboundMessage::Error(err) => serde_json::to_writer(&mut buf, err),
                OutboundMessage::Observation(obs) => serde_json::to_writer(&mut buf, obs),
            };
            if encoded.is_err() {
                continue;
            }
            buf.push(b'\n');
            if writer.write_all(&buf).await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
    });

    let mut line = String::new();
    loop {
        line.clear();
        let bytes_read = tokio::select! {
            read = reader.read_line(&mut line) => read?,
            _ = shutdown.changed() => break,
        };
        if bytes_read == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        debug!(client_id, line = trimmed, "inbound");
        for reply in session.handle_line(trimmed) {
            if let OutboundMessage::Error(err) = &reply {
                warn!(client_id, seq = err.seq, code = ?err.code, message = %err.message, "request rejected");
            }
            if tx.send(reply).is_err() {
                break;
            }
        }
    }

    drop(tx);
    let _ = write_task.await;
    Ok(())
}
