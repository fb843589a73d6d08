//! Error types for the consensus core.

/// Why a block or chain was refused admission.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConsensusError {
    #[error("invalid block index: expected {expected}, got {actual}")]
    IndexMismatch { expected: u64, actual: u64 },

    #[error("prev_hash does not match tip hash at index {index}")]
    BrokenLinkage { index: u64 },

    #[error("block hash does not match recomputed digest at index {index}")]
    DigestMismatch { index: u64 },

    #[error("chain does not start with a genesis block")]
    MissingGenesis,
}

/// Result type for consensus operations.
pub type ConsensusResult<T> = Result<T, ConsensusError>;
