//! Peer sync protocol.
//!
//! One long-lived TCP stream per peer. Each side independently ships
//! its chain as a JSON line on a timer and reconciles every chain it
//! reads, after validating it block-by-block. Malformed lines are
//! dropped without closing the connection — a noisy peer costs us a
//! log line, not the process.

use crate::error::SyncError;
use crate::wire::{decode_chain_line, encode_chain_line};
use pulse_consensus::{validate_chain, ChainStore};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

/// Peer link tunables.
#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// Period between outbound chain broadcasts.
    pub sync_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            sync_interval: Duration::from_secs(5),
        }
    }
}

/// Accept peers forever, one sync task per connection.
pub async fn serve(
    listener: TcpListener,
    store: Arc<ChainStore>,
    config: SyncConfig,
) -> Result<(), SyncError> {
    loop {
        let (stream, addr) = listener.accept().await?;
        info!(peer = %addr, "peer connected");
        let store = Arc::clone(&store);
        let config = config.clone();
        tokio::spawn(async move {
            if let Err(err) = run_peer(stream, store, config).await {
                warn!(peer = %addr, %err, "peer session ended");
            }
        });
    }
}

/// Dial a peer and sync with it until the link drops.
pub async fn dial(
    addr: &str,
    store: Arc<ChainStore>,
    config: SyncConfig,
) -> Result<(), SyncError> {
    let stream = TcpStream::connect(addr).await?;
    info!(peer = %addr, "dialed peer");
    run_peer(stream, store, config).await
}

/// Drive one peer link: periodic outbound chain, inbound line intake.
///
/// Returns `Ok(())` when the peer closes the stream cleanly.
pub async fn run_peer(
    stream: TcpStream,
    store: Arc<ChainStore>,
    config: SyncConfig,
) -> Result<(), SyncError> {
    let peer = stream.peer_addr().ok();
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();
    let mut ticker = tokio::time::interval(config.sync_interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let line = encode_chain_line(&store.snapshot())?;
                write_half.write_all(line.as_bytes()).await?;
            }
            line = lines.next_line() => {
                match line? {
                    None => return Ok(()),
                    Some(line) => handle_inbound_line(&line, &store, peer),
                }
            }
        }
    }
}

/// Decode, validate and reconcile one inbound chain line.
///
/// Every failure mode here is local: the message is dropped and the
/// link stays up. Committed chain state is never rolled back.
fn handle_inbound_line(line: &str, store: &ChainStore, peer: Option<SocketAddr>) {
    if line.trim().is_empty() {
        return;
    }
    let chain = match decode_chain_line(line) {
        Ok(chain) => chain,
        Err(err) => {
            warn!(peer = ?peer, %err, "dropping malformed peer message");
            return;
        }
    };
    if let Err(err) = validate_chain(&chain) {
        warn!(peer = ?peer, %err, "dropping invalid peer chain");
        return;
    }
    store.reconcile(chain);
}
