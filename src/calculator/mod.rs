//! Checked arithmetic and logarithm evaluation.

pub mod evaluator;

pub use evaluator::*;
