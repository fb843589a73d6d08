//! Serialized chain wire format.
//!
//! One full chain per message: a JSON array of blocks, newline
//! terminated, so receivers can frame messages with a plain line
//! reader. Field names are self-describing; unused seal fields are
//! omitted per `pulse_types::Block`.

use crate::error::SyncError;
use pulse_types::Block;

/// Encode the chain as a single newline-terminated JSON line.
pub fn encode_chain_line(chain: &[Block]) -> Result<String, SyncError> {
    let mut line = serde_json::to_string(chain)?;
    line.push('\n');
    Ok(line)
}

/// Decode one received line into a chain.
///
/// The caller still owes the chain a full validation pass before
/// offering it for reconciliation.
pub fn decode_chain_line(line: &str) -> Result<Vec<Block>, SyncError> {
    Ok(serde_json::from_str(line.trim_end())?)
}
