//! # Peer Convergence Tests
//!
//! Real nodes over real loopback links. Each link is symmetric: both
//! sides broadcast on a timer and reconcile what they read, so height
//! flows in whichever direction has more of it.
//!
//! ```text
//! [Node A: 4 blocks] ⇄ [Node B: 1 block] ⇄ [Node C: 1 block]
//!                    ──→ everyone at 4 blocks ←──
//! ```

#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use std::time::Duration;

#[cfg(test)]
use node_runtime::now_ms;

#[cfg(test)]
use pulse_consensus::{seal_block, ChainStore};

#[cfg(test)]
use pulse_propagation::sync::{self, SyncConfig};

#[cfg(test)]
use pulse_types::Block;

#[cfg(test)]
use tokio::net::TcpListener;

#[cfg(test)]
use crate::integration::wait_until;

/// A store holding genesis plus `extra` sealed readings.
#[cfg(test)]
fn store_with_height(extra: usize) -> Arc<ChainStore> {
    let store = Arc::new(ChainStore::new(Block::genesis(now_ms())));
    for i in 0..extra {
        let sealed = seal_block(&store.tip(), 60 + i as i64, 0, now_ms());
        store.try_append(sealed).unwrap();
    }
    store
}

#[cfg(test)]
fn fast_sync() -> SyncConfig {
    SyncConfig {
        sync_interval: Duration::from_millis(50),
    }
}

/// Listen on an ephemeral port for `store` and return the address.
#[cfg(test)]
async fn listen(store: Arc<ChainStore>) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(sync::serve(listener, store, fast_sync()));
    addr
}

/// Dial `addr` for `store` on a background task.
#[cfg(test)]
fn connect(addr: std::net::SocketAddr, store: Arc<ChainStore>) {
    tokio::spawn(async move {
        let _ = sync::dial(&addr.to_string(), store, fast_sync()).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fresh_node_adopts_the_longer_chain() {
        let seeded = store_with_height(3);
        let fresh = store_with_height(0);

        let addr = listen(Arc::clone(&seeded)).await;
        connect(addr, Arc::clone(&fresh));

        assert!(wait_until(5, || fresh.len() == 4).await);
        assert_eq!(fresh.snapshot(), seeded.snapshot());
    }

    #[tokio::test]
    async fn test_height_flows_against_the_dial_direction() {
        let seeded = store_with_height(3);
        let fresh = store_with_height(0);

        // The short side listens; the long side dials. Convergence
        // must not care who connected to whom.
        let addr = listen(Arc::clone(&fresh)).await;
        connect(addr, Arc::clone(&seeded));

        assert!(wait_until(5, || fresh.len() == 4).await);
        assert_eq!(fresh.snapshot(), seeded.snapshot());

        // Now grow the formerly fresh side and watch it flow back.
        let sealed = seal_block(&fresh.tip(), 99, 0, now_ms());
        fresh.try_append(sealed).unwrap();
        assert!(wait_until(5, || seeded.len() == 5).await);
        assert_eq!(seeded.tip().payload, 99);
    }

    #[tokio::test]
    async fn test_height_relays_across_a_line_of_three_nodes() {
        let node_a = store_with_height(3);
        let node_b = store_with_height(0);
        let node_c = store_with_height(0);

        let addr_a = listen(Arc::clone(&node_a)).await;
        let addr_b = listen(Arc::clone(&node_b)).await;
        connect(addr_a, Arc::clone(&node_b));
        connect(addr_b, Arc::clone(&node_c));

        // C never talks to A; B's own broadcasts carry the chain over.
        assert!(wait_until(5, || node_c.len() == 4).await);
        assert_eq!(node_c.snapshot(), node_a.snapshot());
    }
}
