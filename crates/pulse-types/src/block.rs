//! Block record.

use crate::digest::block_digest;
use serde::{Deserialize, Serialize};

/// One sealed, hash-linked unit of the chain.
///
/// Immutable once sealed. `prev_hash` is empty only for the genesis
/// block. Depending on consensus mode a block carries either a
/// proof-of-work seal (`nonce` + `difficulty`) or the elected
/// `validator` identity; the unused fields are omitted on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    /// Creation instant in Unix millis. Opaque to validation logic.
    pub timestamp: u64,
    /// The BPM reading. Domain-unchecked.
    pub payload: i64,
    pub prev_hash: String,
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<String>,
}

impl Block {
    /// The fixed genesis block: index 0, empty payload, empty parent.
    pub fn genesis(timestamp: u64) -> Self {
        let hash = block_digest(0, timestamp, 0, "", None);
        Self {
            index: 0,
            timestamp,
            payload: 0,
            prev_hash: String::new(),
            hash,
            nonce: None,
            difficulty: None,
            validator: None,
        }
    }

    /// Build an unsealed successor of `prev` carrying `payload`.
    ///
    /// The hash covers the content but no nonce; proof-of-work
    /// sealing replaces it. Stake-mode candidates use it as-is after
    /// stamping their validator.
    pub fn next(prev: &Block, payload: i64, timestamp: u64) -> Self {
        let index = prev.index + 1;
        let hash = block_digest(index, timestamp, payload, &prev.hash, None);
        Self {
            index,
            timestamp,
            payload,
            prev_hash: prev.hash.clone(),
            hash,
            nonce: None,
            difficulty: None,
            validator: None,
        }
    }

    /// Recompute this block's digest from its content and sealed nonce.
    pub fn computed_hash(&self) -> String {
        block_digest(
            self.index,
            self.timestamp,
            self.payload,
            &self.prev_hash,
            self.nonce,
        )
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.prev_hash.is_empty()
    }
}
