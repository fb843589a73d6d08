//! Propagation coordinator.
//!
//! Per-node state machine: stake mode cycles
//! `AWAIT_CANDIDATES -> ELECTION -> BROADCAST`, PoW/plain mode goes
//! straight `VALIDATE -> APPEND -> BROADCAST`. Many producer sessions
//! call in concurrently; admission to the canonical chain is
//! serialized by the chain store's lock, so two producers can never
//! both extend the same tip.

use parking_lot::Mutex;
use pulse_consensus::{elect, ChainStore, ConsensusResult, ValidatorRegistry};
use pulse_types::Block;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Outcome of a round or an append, fanned out to connected sessions.
///
/// Sent on a broadcast channel: a closed or lagging receiver never
/// blocks or fails the round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Announcement {
    /// A stake-lottery round elected this validator's block.
    WinnerElected { validator: String, index: u64 },
    /// A PoW/plain block was appended.
    BlockAppended { index: u64, payload: i64 },
}

/// Coordinator tunables.
#[derive(Clone, Debug)]
pub struct CoordinatorConfig {
    /// Period between stake-lottery rounds. Long enough for producers
    /// to submit.
    pub round_interval: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            round_interval: Duration::from_secs(30),
        }
    }
}

/// Candidate intake, election rounds and announcement fan-out.
pub struct Coordinator {
    store: Arc<ChainStore>,
    registry: Arc<ValidatorRegistry>,
    /// Not-yet-ratified proposals for the current round. Unbounded per
    /// round; accepted limitation at this scale.
    pool: Mutex<Vec<Block>>,
    announcements: broadcast::Sender<Announcement>,
    config: CoordinatorConfig,
}

impl Coordinator {
    pub fn new(
        store: Arc<ChainStore>,
        registry: Arc<ValidatorRegistry>,
        config: CoordinatorConfig,
    ) -> Self {
        let (announcements, _) = broadcast::channel(64);
        Self {
            store,
            registry,
            pool: Mutex::new(Vec::new()),
            announcements,
            config,
        }
    }

    pub fn store(&self) -> Arc<ChainStore> {
        Arc::clone(&self.store)
    }

    pub fn registry(&self) -> Arc<ValidatorRegistry> {
        Arc::clone(&self.registry)
    }

    /// Subscribe a session sink to round outcomes.
    pub fn subscribe(&self) -> broadcast::Receiver<Announcement> {
        self.announcements.subscribe()
    }

    /// Non-blocking enqueue of a stake-mode candidate. Ratification
    /// happens at the next election round.
    pub fn submit_candidate(&self, block: Block) {
        debug!(
            index = block.index,
            validator = block.validator.as_deref().unwrap_or(""),
            "candidate submitted"
        );
        self.pool.lock().push(block);
    }

    /// PoW/plain path: validate against the tip and append, in one
    /// critical section, then announce.
    pub fn submit_block(&self, block: Block) -> ConsensusResult<()> {
        let index = block.index;
        let payload = block.payload;
        self.store.try_append(block)?;
        // Send errors just mean nobody is listening right now.
        let _ = self
            .announcements
            .send(Announcement::BlockAppended { index, payload });
        Ok(())
    }

    /// Run one stake-lottery round: drain the pool, snapshot the
    /// registry, draw a winner, and append it if it still extends the
    /// tip.
    ///
    /// Returns the appended block, if any. An empty or fully
    /// disqualified pool is not an error — the round simply produces
    /// nothing, and the pool is cleared either way.
    pub fn run_election_round(&self) -> Option<Block> {
        let candidates: Vec<Block> = std::mem::take(&mut *self.pool.lock());
        if candidates.is_empty() {
            return None;
        }

        let stakes = self.registry.snapshot();
        let winner = elect(&candidates, &stakes, &mut rand::thread_rng())?;

        // The chain may have been replaced since the candidate was
        // built; the admission gate decides under the store's lock.
        if let Err(err) = self.store.try_append(winner.clone()) {
            debug!(index = winner.index, %err, "elected block went stale, dropped");
            return None;
        }

        let validator = winner.validator.clone().unwrap_or_default();
        info!(index = winner.index, validator = %validator, "winning validator");
        let _ = self.announcements.send(Announcement::WinnerElected {
            validator,
            index: winner.index,
        });
        Some(winner)
    }

    /// Drive election rounds forever at the configured period.
    pub async fn run_rounds(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.config.round_interval);
        // The first tick fires immediately; skip it so producers get a
        // full period before the first draw.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            self.run_election_round();
        }
    }
}
