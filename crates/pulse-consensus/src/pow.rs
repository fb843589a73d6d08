//! Proof-of-work sealer.
//!
//! Difficulty is the number of leading zero hex characters the block
//! digest must carry. The search enumerates nonces sequentially from
//! zero — deterministic and reproducible — and runs until it succeeds;
//! any time bound is the caller's to impose. Difficulty 0 accepts the
//! very first candidate.

use crate::meets_difficulty;
use pulse_types::{digest::block_digest, Block};
use tracing::debug;

/// Seal a successor of `prev` carrying `payload` at the given
/// difficulty.
///
/// Returns the block with its winning nonce, difficulty and digest
/// filled in. The digest of the returned block always satisfies the
/// difficulty predicate.
pub fn seal_block(prev: &Block, payload: i64, difficulty: u32, timestamp: u64) -> Block {
    let index = prev.index + 1;
    let mut nonce = 0u64;
    loop {
        let hash = block_digest(index, timestamp, payload, &prev.hash, Some(nonce));
        if meets_difficulty(&hash, difficulty) {
            debug!(index, nonce, difficulty, "proof-of-work found");
            return Block {
                index,
                timestamp,
                payload,
                prev_hash: prev.hash.clone(),
                hash,
                nonce: Some(nonce),
                difficulty: Some(difficulty),
                validator: None,
            };
        }
        nonce += 1;
    }
}
