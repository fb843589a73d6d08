//! # pulse-consensus
//!
//! The consensus and validation core of Pulse-Chain.
//!
//! ## Components
//!
//! - [`ChainStore`]: the node's canonical chain behind a single lock,
//!   with serialized append and the longest-chain fork choice.
//! - [`validation`]: structural and hash-linkage checks — the sole
//!   admission gate for every block, local or remote.
//! - [`pow`]: the proof-of-work sealer (leading-zero hex prefix).
//! - [`lottery`]: stake-weighted leader election over the registry.
//! - [`ValidatorRegistry`]: staked identities, with forfeiture as the
//!   misbehavior deterrent.
//!
//! Both election mechanisms produce plain [`Block`]s; which one a node
//! runs is wiring, not a type-level split.

pub mod error;
pub mod lottery;
pub mod pow;
pub mod registry;
pub mod state;
pub mod validation;

pub use error::{ConsensusError, ConsensusResult};
pub use lottery::elect;
pub use pow::seal_block;
pub use registry::ValidatorRegistry;
pub use state::ChainStore;
pub use validation::{is_valid_next, validate_chain};

/// Does this hex digest satisfy `difficulty` leading zero characters?
pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    hash.len() >= difficulty as usize
        && hash.chars().take(difficulty as usize).all(|c| c == '0')
}
