//! Block digest engine.
//!
//! SHA-256 over the block's fields in a fixed order, rendered as
//! lowercase hex. Determinism and field-order stability are the only
//! hard requirements: peers must compute identical digests for
//! identical blocks, or fork choice falls apart.

use sha2::{Digest, Sha256};

/// Compute the canonical digest of a block's content.
///
/// Field order is fixed: index, timestamp, payload, prev_hash, and the
/// nonce when the block carries a proof-of-work seal. Numbers go in as
/// their decimal renderings so the preimage is unambiguous across
/// platforms.
pub fn block_digest(
    index: u64,
    timestamp: u64,
    payload: i64,
    prev_hash: &str,
    nonce: Option<u64>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(index.to_string());
    hasher.update(timestamp.to_string());
    hasher.update(payload.to_string());
    hasher.update(prev_hash.as_bytes());
    if let Some(nonce) = nonce {
        hasher.update(nonce.to_string());
    }
    hex::encode(hasher.finalize())
}

/// Derive a validator address from its registration instant.
///
/// Salted so two validators registering in the same millisecond do not
/// collide.
pub fn address_digest(registered_at_ms: u64, salt: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(registered_at_ms.to_string());
    hasher.update(salt.to_le_bytes());
    hex::encode(hasher.finalize())
}
