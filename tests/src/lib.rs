//! # Pulse-Chain Test Suite
//!
//! Unified test crate exercising the node across crate boundaries:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── end_to_end.rs       # Producer console -> chain, both modes
//!     ├── concurrency.rs      # Many producers racing for the tip
//!     └── peer_convergence.rs # Multi-node longest-chain convergence
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p pulse-tests
//!
//! # By scenario
//! cargo test -p pulse-tests integration::end_to_end
//! cargo test -p pulse-tests integration::peer_convergence
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]
