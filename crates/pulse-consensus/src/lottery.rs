//! Stake-weighted leader election.
//!
//! One round: take the candidate pool and a registry snapshot, build a
//! flat pool with each eligible validator repeated once per staked
//! token, draw uniformly. A validator staking 100 tokens gets 100
//! entries, one staking 1 gets 1 — win probability is exactly
//! `w / sum(weights)`.

use pulse_types::Block;
use rand::Rng;
use std::collections::HashMap;
use tracing::debug;

/// Elect a winner among `candidates` given the staked weights.
///
/// A validator gets one chance per round no matter how many candidates
/// it submitted (the first one counts); candidates from unregistered
/// validators are disqualified. Returns `None` when nothing is
/// eligible — not an error, the round simply appends no block.
pub fn elect<R: Rng>(
    candidates: &[Block],
    stakes: &HashMap<String, u64>,
    rng: &mut R,
) -> Option<Block> {
    let mut lottery_pool: Vec<&str> = Vec::new();
    let mut entrants: Vec<&Block> = Vec::new();

    for block in candidates {
        let Some(validator) = block.validator.as_deref() else {
            continue;
        };
        // One chance per validator per round.
        if entrants
            .iter()
            .any(|b| b.validator.as_deref() == Some(validator))
        {
            continue;
        }
        // Unregistered or disqualified validators never win.
        let Some(&weight) = stakes.get(validator) else {
            continue;
        };
        for _ in 0..weight {
            lottery_pool.push(validator);
        }
        entrants.push(block);
    }

    if lottery_pool.is_empty() {
        return None;
    }

    let winner = lottery_pool[rng.gen_range(0..lottery_pool.len())];
    debug!(
        winner = %winner,
        entrants = entrants.len(),
        pool = lottery_pool.len(),
        "lottery drawn"
    );
    entrants
        .into_iter()
        .find(|b| b.validator.as_deref() == Some(winner))
        .cloned()
}
