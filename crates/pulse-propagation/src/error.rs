//! Error types for propagation and peer sync.

/// Failures on the peer link or the wire format.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("peer i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed peer message: {0}")]
    MalformedMessage(#[from] serde_json::Error),
}
