//! # pulse-types
//!
//! Shared primitives for Pulse-Chain: the [`Block`] record and the
//! digest engine every node must agree on.
//!
//! Everything here is deliberately dumb data. Validation, fork choice
//! and leader election live in `pulse-consensus`; this crate only
//! guarantees that two nodes hashing the same block get the same hex
//! string back.

pub mod block;
pub mod digest;

pub use block::Block;
pub use digest::{address_digest, block_digest};
