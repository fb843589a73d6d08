//! # pulse-propagation
//!
//! The machinery that lets many producers submit blocks safely and
//! converges every node onto one shared chain.
//!
//! ## Components
//!
//! - [`Coordinator`]: candidate intake, periodic lottery rounds (stake
//!   mode) or immediate serialized append (PoW mode), and the
//!   announcement fan-out to connected sessions.
//! - [`sync`]: the peer protocol — each side of a long-lived TCP
//!   stream periodically ships its chain as one JSON line and
//!   reconciles whatever it reads back, longest chain winning.
//!
//! No acknowledgements, no handshake, no versioning: any structurally
//! parseable longer chain wins.

pub mod coordinator;
pub mod error;
pub mod sync;
pub mod wire;

pub use coordinator::{Announcement, Coordinator, CoordinatorConfig};
pub use error::SyncError;
pub use wire::{decode_chain_line, encode_chain_line};
