//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use calclab::models::{ExperimentKind, Operation};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// CalcLab - checked calculator and probability simulator
///
/// Evaluate arithmetic and logarithm expressions with explicit error
/// messages, or simulate coin tosses and dice rolls and chart the results.
///
/// Examples:
///   calclab calc add 2 3
///   calclab calc log 100 10
///   calclab calc % -7 3
///   calclab simulate dice --trials 6000 --seed 42
///   calclab --format markdown --output coin.md simulate coin -n 1000
///   calclab init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    ///
    /// If not specified, looks for .calclab.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format (text, markdown, json)
    #[arg(long, value_name = "FORMAT", global = true)]
    pub format: Option<OutputFormat>,

    /// Write the output to a file instead of stdout
    #[arg(short, long, value_name = "FILE", global = true)]
    pub output: Option<PathBuf>,

    /// Digits after the decimal point for calculation results
    #[arg(long, value_name = "DIGITS", global = true)]
    pub precision: Option<usize>,

    /// Width of the bar charts in columns
    #[arg(long, value_name = "COLUMNS", global = true)]
    pub chart_width: Option<usize>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Evaluate `a OP b`
    ///
    /// OP is one of add (+), sub (-), mul (*, x), div (/), mod (%),
    /// pow (^) or log. For log, a is the argument and b the base.
    /// Missing operands default to 0, or to a=1, b=10 for log.
    #[command(allow_negative_numbers = true)]
    Calc {
        /// Operation name or symbol
        #[arg(value_name = "OP")]
        operation: Operation,

        /// First operand
        a: Option<f64>,

        /// Second operand
        b: Option<f64>,
    },

    /// Simulate coin tosses or dice rolls
    Simulate {
        /// Experiment to run (coin, dice)
        #[arg(value_name = "EXPERIMENT")]
        experiment: ExperimentKind,

        /// Number of trials (clamped to 1..=100000)
        #[arg(short = 'n', long, value_name = "COUNT")]
        trials: Option<usize>,

        /// Seed for a reproducible run
        #[arg(short, long, value_name = "SEED", env = "CALCLAB_SEED")]
        seed: Option<u64>,
    },

    /// Generate a default .calclab.toml configuration file
    InitConfig,
}

/// Output format for rendered results.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text with ASCII charts (default)
    #[default]
    Text,
    /// Markdown format
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(width) = self.chart_width {
            if width == 0 {
                return Err("Chart width must be at least 1".to_string());
            }
        }

        if let Some(precision) = self.precision {
            if precision > 17 {
                return Err("Precision must be between 0 and 17".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
