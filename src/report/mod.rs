//! Report rendering: plain text, Markdown and JSON.

pub mod chart;
pub mod generator;

pub use chart::ChartStyle;
pub use generator::*;
