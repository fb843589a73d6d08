//! Structural and hash-linkage checks.
//!
//! [`is_valid_next`] is the sole admission gate: every block, whether
//! produced locally or ingested from a peer, passes through it before
//! touching the canonical chain. A failing block is discarded; in
//! stake mode the session layer additionally forfeits the author's
//! stake.

use crate::error::{ConsensusError, ConsensusResult};
use pulse_types::Block;

/// Check that `new` is a valid successor of `tip`.
///
/// Three checks, in order: index increments by exactly one, the parent
/// link matches the tip's hash, and the sealed hash matches the digest
/// recomputed from the block's own content (including its nonce when
/// present).
pub fn is_valid_next(new: &Block, tip: &Block) -> ConsensusResult<()> {
    if new.index != tip.index + 1 {
        return Err(ConsensusError::IndexMismatch {
            expected: tip.index + 1,
            actual: new.index,
        });
    }
    if new.prev_hash != tip.hash {
        return Err(ConsensusError::BrokenLinkage { index: new.index });
    }
    if new.computed_hash() != new.hash {
        return Err(ConsensusError::DigestMismatch { index: new.index });
    }
    Ok(())
}

/// Validate an entire chain received from a peer, genesis to tip.
///
/// The fork-choice rule compares lengths only, so every hop must run
/// this before offering a chain for reconciliation.
pub fn validate_chain(chain: &[Block]) -> ConsensusResult<()> {
    let Some(genesis) = chain.first() else {
        return Err(ConsensusError::MissingGenesis);
    };
    if !genesis.is_genesis() || genesis.computed_hash() != genesis.hash {
        return Err(ConsensusError::MissingGenesis);
    }
    for pair in chain.windows(2) {
        is_valid_next(&pair[1], &pair[0])?;
    }
    Ok(())
}
