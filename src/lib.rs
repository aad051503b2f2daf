//! # calclab
//!
//! Checked arithmetic/logarithm evaluation and coin/dice trial simulation.
//!
//! ## Modules
//!
//! - [`calculator`] — `evaluate(op, a, b)` returning a value or an [`EvalError`]
//! - [`simulation`] — `run_trials(kind, n)` with an injectable random source
//! - [`report`] — text, Markdown and JSON rendering with ASCII bar charts
//!
//! Both core operations are pure functions of their inputs (plus the random
//! source) and hold no state between calls.

pub mod calculator;
pub mod error;
pub mod models;
pub mod report;
pub mod simulation;

pub use error::{EvalError, InvalidReason};
