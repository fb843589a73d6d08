//! # End-to-End Console Tests
//!
//! Drives a full node over real loopback sockets, exactly the way a
//! producer's terminal would:
//!
//! ```text
//! [Producer socket] ──"100"──→ [Console session] ── register ──→ [Registry]
//!        │                            │
//!        └────"62"────→ candidate ──→ [Coordinator pool]
//!                                     │  (round timer)
//!                                     ↓
//!                               [Lottery round] ── append ──→ [ChainStore]
//!                                     │
//!                                     └──"winning validator"──→ [Producer socket]
//! ```
//!
//! PoW mode skips the registry and the round timer: a reading is
//! sealed and appended inline.

#[cfg(test)]
use std::net::SocketAddr;

#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use std::time::Duration;

#[cfg(test)]
use node_runtime::{now_ms, session, Mode, NodeConfig};

#[cfg(test)]
use pulse_consensus::{meets_difficulty, ChainStore, ValidatorRegistry};

#[cfg(test)]
use pulse_propagation::{Coordinator, CoordinatorConfig};

#[cfg(test)]
use pulse_types::Block;

#[cfg(test)]
use tokio::io::{AsyncReadExt, AsyncWriteExt};

#[cfg(test)]
use tokio::net::{TcpListener, TcpStream};

#[cfg(test)]
use crate::integration::wait_until;

/// A running node's handles: the coordinator plus the console address
/// producers dial.
#[cfg(test)]
struct NodeHarness {
    coordinator: Arc<Coordinator>,
    console_addr: SocketAddr,
}

#[cfg(test)]
async fn start_node(config: NodeConfig) -> NodeHarness {
    let store = Arc::new(ChainStore::new(Block::genesis(now_ms())));
    let registry = Arc::new(ValidatorRegistry::new());
    let coordinator = Arc::new(Coordinator::new(
        store,
        registry,
        CoordinatorConfig {
            round_interval: config.round_interval,
        },
    ));
    if config.mode == Mode::ProofOfStake {
        tokio::spawn(Arc::clone(&coordinator).run_rounds());
    }

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let console_addr = listener.local_addr().unwrap();
    tokio::spawn(session::serve_console(
        listener,
        Arc::clone(&coordinator),
        config,
    ));
    NodeHarness {
        coordinator,
        console_addr,
    }
}

#[cfg(test)]
fn stake_config(round_ms: u64) -> NodeConfig {
    NodeConfig {
        mode: Mode::ProofOfStake,
        round_interval: Duration::from_millis(round_ms),
        // Keep periodic dumps out of the prompt exchange.
        dump_interval: Duration::from_secs(3600),
        ..NodeConfig::default()
    }
}

#[cfg(test)]
fn pow_config(difficulty: u32) -> NodeConfig {
    NodeConfig {
        mode: Mode::ProofOfWork,
        difficulty,
        dump_interval: Duration::from_secs(3600),
        ..NodeConfig::default()
    }
}

/// Accumulate socket bytes until `pattern` shows up, returning
/// everything read so far. Panics if the peer closes first.
#[cfg(test)]
async fn read_until(stream: &mut TcpStream, pattern: &str) -> String {
    let mut seen = String::new();
    let mut buf = [0u8; 512];
    loop {
        if seen.contains(pattern) {
            return seen;
        }
        let n = stream.read(&mut buf).await.unwrap();
        assert!(n > 0, "session closed while waiting for {pattern:?}: {seen:?}");
        seen.push_str(&String::from_utf8_lossy(&buf[..n]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_node_starts_from_a_well_formed_genesis() {
        let node = start_node(stake_config(30_000)).await;
        let store = node.coordinator.store();

        assert_eq!(store.len(), 1);
        let genesis = store.tip();
        assert_eq!(genesis.index, 0);
        assert_eq!(genesis.prev_hash, "");
        assert_eq!(genesis.payload, 0);
        assert_eq!(genesis.hash, genesis.computed_hash());
    }

    #[tokio::test]
    async fn test_staked_reading_is_elected_and_announced() {
        let node = start_node(stake_config(100)).await;
        let mut producer = TcpStream::connect(node.console_addr).await.unwrap();

        read_until(&mut producer, "Enter token balance:").await;
        producer.write_all(b"100\n").await.unwrap();
        read_until(&mut producer, "Enter a new BPM:").await;
        producer.write_all(b"62\n").await.unwrap();

        let store = node.coordinator.store();
        assert!(
            wait_until(5, || store.len() == 2).await,
            "reading never became a block"
        );

        let chain = store.snapshot();
        let block = &chain[1];
        assert_eq!(block.index, 1);
        assert_eq!(block.payload, 62);
        assert_eq!(block.prev_hash, chain[0].hash);
        assert_eq!(block.hash, block.computed_hash());

        let registry = node.coordinator.registry();
        let address = block.validator.clone().unwrap();
        assert_eq!(registry.stake_of(&address), Some(100));

        // The round outcome is fanned back to the producer's terminal.
        let output = read_until(&mut producer, "winning validator:").await;
        assert!(output.contains(&address));
    }

    #[tokio::test]
    async fn test_non_numeric_reading_forfeits_stake_and_closes_session() {
        let node = start_node(stake_config(30_000)).await;
        let mut producer = TcpStream::connect(node.console_addr).await.unwrap();

        read_until(&mut producer, "Enter token balance:").await;
        producer.write_all(b"50\n").await.unwrap();
        read_until(&mut producer, "Enter a new BPM:").await;

        let registry = node.coordinator.registry();
        assert!(wait_until(5, || registry.len() == 1).await);

        producer.write_all(b"abc\n").await.unwrap();

        assert!(
            wait_until(5, || registry.is_empty()).await,
            "stake was never forfeited"
        );
        assert_eq!(node.coordinator.store().len(), 1);

        // The session is gone: the read side drains to EOF.
        let mut sink = Vec::new();
        producer.read_to_end(&mut sink).await.unwrap();
    }

    #[tokio::test]
    async fn test_pow_reading_is_sealed_at_difficulty() {
        let node = start_node(pow_config(1)).await;
        let mut producer = TcpStream::connect(node.console_addr).await.unwrap();

        // No balance prompt in PoW mode.
        let opening = read_until(&mut producer, "Enter a new BPM:").await;
        assert!(!opening.contains("token balance"));
        producer.write_all(b"72\n").await.unwrap();

        let store = node.coordinator.store();
        assert!(wait_until(10, || store.len() == 2).await);

        let tip = store.tip();
        assert_eq!(tip.payload, 72);
        assert!(tip.nonce.is_some());
        assert_eq!(tip.difficulty, Some(1));
        assert!(meets_difficulty(&tip.hash, 1));
        assert!(tip.validator.is_none());
        assert_eq!(tip.hash, tip.computed_hash());
    }

    #[tokio::test]
    async fn test_console_periodically_dumps_the_chain() {
        let mut config = pow_config(0);
        config.dump_interval = Duration::from_millis(200);
        let node = start_node(config).await;
        let mut producer = TcpStream::connect(node.console_addr).await.unwrap();

        let output = read_until(&mut producer, "]\n").await;
        let start = output.find('[').unwrap();
        let end = output.find(']').unwrap();
        let chain: Vec<Block> = serde_json::from_str(&output[start..=end]).unwrap();

        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0], node.coordinator.store().tip());
    }
}
