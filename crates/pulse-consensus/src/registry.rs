//! Staked validator registry.
//!
//! Maps validator identities (salted digests of the registration
//! instant) to staked weight. Entries are added when a producer
//! registers a stake and removed — with loss of stake — when that
//! producer submits malformed input. Forfeiture is the economic
//! deterrent; there is no way back in.

use parking_lot::Mutex;
use pulse_types::digest::address_digest;
use rand::Rng;
use std::collections::HashMap;
use tracing::{info, warn};

/// Shared registry of staked validators, mutated under exclusion.
#[derive(Default)]
pub struct ValidatorRegistry {
    stakes: Mutex<HashMap<String, u64>>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new validator with `stake` tokens and return its
    /// derived address.
    ///
    /// No balance checks — there is no wallet model, the stake is
    /// whatever the producer claims.
    pub fn register(&self, stake: u64, registered_at_ms: u64) -> String {
        let salt = rand::thread_rng().gen::<u64>();
        let address = address_digest(registered_at_ms, salt);
        self.stakes.lock().insert(address.clone(), stake);
        info!(address = %address, stake, "validator registered");
        address
    }

    /// Staked weight of `address`, if registered.
    pub fn stake_of(&self, address: &str) -> Option<u64> {
        self.stakes.lock().get(address).copied()
    }

    pub fn contains(&self, address: &str) -> bool {
        self.stakes.lock().contains_key(address)
    }

    /// Snapshot for a lottery round, taken under the lock at round
    /// start.
    pub fn snapshot(&self) -> HashMap<String, u64> {
        self.stakes.lock().clone()
    }

    /// Remove `address` and forfeit its stake. Returns the forfeited
    /// amount if the validator was registered.
    pub fn forfeit(&self, address: &str) -> Option<u64> {
        let removed = self.stakes.lock().remove(address);
        if let Some(stake) = removed {
            warn!(address = %address, stake, "validator disqualified, stake forfeited");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.stakes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stakes.lock().is_empty()
    }
}
