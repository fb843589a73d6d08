//! # Pulse-Chain Node
//!
//! Entry point wiring the consensus core, the propagation coordinator
//! and the two listeners (peer sync, producer console) together.
//!
//! ## Startup sequence
//!
//! 1. Initialize logging (env-filterable, `info` by default)
//! 2. Load configuration from the environment
//! 3. Seed the chain store with the genesis block
//! 4. Start lottery rounds (stake mode)
//! 5. Bind the peer sync listener, dial the configured peer (if any)
//! 6. Bind the producer console listener
//! 7. Run until ctrl-c

use anyhow::{Context, Result};
use node_runtime::session::serve_console;
use node_runtime::{now_ms, Mode, NodeConfig};
use pulse_consensus::{ChainStore, ValidatorRegistry};
use pulse_propagation::coordinator::{Coordinator, CoordinatorConfig};
use pulse_propagation::sync::{self, SyncConfig};
use pulse_types::Block;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = NodeConfig::from_env();

    info!("===========================================");
    info!("  Pulse-Chain Node v0.1.0");
    info!("  Mode: {:?}", config.mode);
    info!("===========================================");

    let genesis = Block::genesis(now_ms());
    info!(hash = %genesis.hash, "genesis block created");

    let store = Arc::new(ChainStore::new(genesis));
    let registry = Arc::new(ValidatorRegistry::new());
    let coordinator = Arc::new(Coordinator::new(
        Arc::clone(&store),
        Arc::clone(&registry),
        CoordinatorConfig {
            round_interval: config.round_interval,
        },
    ));

    if config.mode == Mode::ProofOfStake {
        tokio::spawn(Arc::clone(&coordinator).run_rounds());
        info!(period = ?config.round_interval, "lottery rounds running");
    }

    let sync_config = SyncConfig {
        sync_interval: config.sync_interval,
    };

    let p2p_listener = TcpListener::bind(("0.0.0.0", config.p2p_port))
        .await
        .with_context(|| format!("failed to bind p2p port {}", config.p2p_port))?;
    info!(port = config.p2p_port, "peer sync listening");
    {
        let store = Arc::clone(&store);
        let sync_config = sync_config.clone();
        tokio::spawn(async move {
            if let Err(err) = sync::serve(p2p_listener, store, sync_config).await {
                warn!(%err, "peer sync listener stopped");
            }
        });
    }

    if let Some(peer) = config.peer.clone() {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            if let Err(err) = sync::dial(&peer, store, sync_config).await {
                warn!(peer = %peer, %err, "peer link closed");
            }
        });
    }

    let console_listener = TcpListener::bind(("0.0.0.0", config.console_port))
        .await
        .with_context(|| format!("failed to bind console port {}", config.console_port))?;
    info!(port = config.console_port, "producer console listening");
    {
        let coordinator = Arc::clone(&coordinator);
        let config = config.clone();
        tokio::spawn(async move {
            if let Err(err) = serve_console(console_listener, coordinator, config).await {
                warn!(%err, "console listener stopped");
            }
        });
    }

    info!("node is running, ctrl-c to stop");
    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    Ok(())
}
