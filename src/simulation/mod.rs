//! Coin and dice trials.
//!
//! Outcomes are drawn from an injected [`rand::Rng`] and tallied in the
//! experiment's fixed label order.

pub mod aggregator;
pub mod random;

pub use aggregator::*;
pub use random::create_rng;
