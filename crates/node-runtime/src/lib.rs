//! # node-runtime
//!
//! The Pulse-Chain node binary's wiring: configuration, producer
//! console sessions and peer link startup. The consensus core lives in
//! `pulse-consensus`; the propagation machinery in
//! `pulse-propagation`. Everything here is a thin I/O shell around
//! them.

pub mod config;
pub mod session;

pub use config::{Mode, NodeConfig};

/// Current instant in Unix millis, the timestamp domain blocks use.
pub fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}
