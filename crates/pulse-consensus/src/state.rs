//! The node's canonical chain state.
//!
//! One `ChainStore` per process, shared via `Arc`. All mutation goes
//! through a single mutex so the read-tip / validate / append sequence
//! is one critical section: two producers can never both extend the
//! same tip. Critical sections stay short — no I/O while locked.

use crate::error::ConsensusResult;
use crate::validation::is_valid_next;
use parking_lot::Mutex;
use pulse_types::Block;
use tracing::{debug, info};

/// The ordered sequence of accepted blocks, index 0 being genesis.
///
/// Grows monotonically by validated append, or is replaced wholesale
/// by a strictly longer chain under the fork-choice rule. Never
/// shrinks otherwise; appended indices are permanent.
pub struct ChainStore {
    chain: Mutex<Vec<Block>>,
}

impl ChainStore {
    /// Create a store seeded with a genesis block.
    pub fn new(genesis: Block) -> Self {
        Self {
            chain: Mutex::new(vec![genesis]),
        }
    }

    /// Clone of the current tip.
    pub fn tip(&self) -> Block {
        self.chain
            .lock()
            .last()
            .cloned()
            .expect("chain always holds genesis")
    }

    pub fn len(&self) -> usize {
        self.chain.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.lock().is_empty()
    }

    /// Snapshot the full chain for serialization or inspection.
    pub fn snapshot(&self) -> Vec<Block> {
        self.chain.lock().clone()
    }

    /// Validate `block` against the current tip and append it.
    ///
    /// Tip read, validation and append happen under one lock, which is
    /// the serialization guarantee: at most one block joins the chain
    /// at a time, and a block built against a stale tip fails the
    /// linkage check instead of forking the store.
    pub fn try_append(&self, block: Block) -> ConsensusResult<()> {
        let mut chain = self.chain.lock();
        let tip = chain.last().expect("chain always holds genesis");
        is_valid_next(&block, tip)?;
        debug!(index = block.index, payload = block.payload, "block appended");
        chain.push(block);
        Ok(())
    }

    /// Longest-chain fork choice.
    ///
    /// Adopts `candidate` iff it is strictly longer than the local
    /// chain; ties keep local. Pure length comparison — callers are
    /// expected to have validated the candidate block-by-block, which
    /// keeps this O(1) under the lock and atomic with respect to
    /// concurrent appends and other reconciliations.
    pub fn reconcile(&self, candidate: Vec<Block>) -> bool {
        let mut chain = self.chain.lock();
        if candidate.len() > chain.len() {
            info!(
                local_len = chain.len(),
                adopted_len = candidate.len(),
                "adopting longer chain from peer"
            );
            *chain = candidate;
            true
        } else {
            false
        }
    }
}
