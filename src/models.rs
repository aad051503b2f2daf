//! Data models for the calculator and the trial simulator.
//!
//! This module contains the core data structures shared by the evaluator,
//! the aggregator and the report generator.

use crate::error::EvalError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Arithmetic or logarithm operation selectable by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    /// Logarithm of `a` in base `b`.
    Log,
}

impl Operation {
    /// Every operation, in menu order.
    pub const ALL: [Operation; 7] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
        Operation::Modulo,
        Operation::Power,
        Operation::Log,
    ];

    /// Returns the operator symbol used when echoing an expression.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "×",
            Operation::Divide => "÷",
            Operation::Modulo => "%",
            Operation::Power => "^",
            Operation::Log => "log",
        }
    }

    /// Operands used when the user leaves them out.
    ///
    /// A logarithm defaults to `log_10(1)`, everything else to `0 op 0`.
    pub fn default_operands(&self) -> (f64, f64) {
        match self {
            Operation::Log => (1.0, 10.0),
            _ => (0.0, 0.0),
        }
    }

    /// Formats the expression `a op b` for display.
    pub fn expression(&self, a: f64, b: f64) -> String {
        match self {
            Operation::Log => format!("log_{}({})", b, a),
            _ => format!("{} {} {}", a, self.symbol(), b),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Add => write!(f, "Addition"),
            Operation::Subtract => write!(f, "Subtraction"),
            Operation::Multiply => write!(f, "Multiplication"),
            Operation::Divide => write!(f, "Division"),
            Operation::Modulo => write!(f, "Modulo"),
            Operation::Power => write!(f, "Power"),
            Operation::Log => write!(f, "Logarithm"),
        }
    }
}

/// Error returned when a string names no known operation or experiment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized {what}: '{input}'")]
pub struct ParseLabelError {
    what: &'static str,
    input: String,
}

impl FromStr for Operation {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "add" | "plus" | "+" => Ok(Operation::Add),
            "sub" | "subtract" | "minus" | "-" => Ok(Operation::Subtract),
            "mul" | "multiply" | "times" | "*" | "x" | "×" => Ok(Operation::Multiply),
            "div" | "divide" | "/" | "÷" => Ok(Operation::Divide),
            "mod" | "modulo" | "%" => Ok(Operation::Modulo),
            "pow" | "power" | "^" | "**" => Ok(Operation::Power),
            "log" | "logarithm" => Ok(Operation::Log),
            _ => Err(ParseLabelError {
                what: "operation",
                input: s.to_string(),
            }),
        }
    }
}

/// Kind of random experiment to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperimentKind {
    Coin,
    Dice,
}

impl ExperimentKind {
    /// The ordered outcome labels of this experiment.
    pub fn labels(&self) -> &'static [Outcome] {
        match self {
            ExperimentKind::Coin => &COIN_LABELS,
            ExperimentKind::Dice => &DICE_LABELS,
        }
    }
}

impl fmt::Display for ExperimentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperimentKind::Coin => write!(f, "Coin toss"),
            ExperimentKind::Dice => write!(f, "Dice roll"),
        }
    }
}

impl FromStr for ExperimentKind {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "coin" | "coins" | "flip" => Ok(ExperimentKind::Coin),
            "dice" | "die" | "roll" => Ok(ExperimentKind::Dice),
            _ => Err(ParseLabelError {
                what: "experiment",
                input: s.to_string(),
            }),
        }
    }
}

/// Face of a coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoinFace {
    Heads,
    Tails,
}

/// A single outcome label: a coin face or a die face (1-6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    Coin(CoinFace),
    Die(u8),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Coin(CoinFace::Heads) => write!(f, "Heads"),
            Outcome::Coin(CoinFace::Tails) => write!(f, "Tails"),
            Outcome::Die(face) => write!(f, "{}", face),
        }
    }
}

/// Coin outcomes in display order.
pub const COIN_LABELS: [Outcome; 2] = [
    Outcome::Coin(CoinFace::Heads),
    Outcome::Coin(CoinFace::Tails),
];

/// Die outcomes in display order.
pub const DICE_LABELS: [Outcome; 6] = [
    Outcome::Die(1),
    Outcome::Die(2),
    Outcome::Die(3),
    Outcome::Die(4),
    Outcome::Die(5),
    Outcome::Die(6),
];

/// Count and relative frequency of one outcome label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelTally {
    /// The outcome label.
    pub outcome: Outcome,
    /// Number of trials that produced this outcome.
    pub count: usize,
    /// `count / total`, or 0.0 when no trials ran.
    pub frequency: f64,
}

/// Aggregated result of a batch of trials.
///
/// `tallies` follows the experiment's label order and always holds one entry
/// per label, zero counts included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialReport {
    /// Experiment that was run.
    pub kind: ExperimentKind,
    /// Number of trials.
    pub total: usize,
    /// Per-label counts and relative frequencies.
    pub tallies: Vec<LabelTally>,
}

impl TrialReport {
    /// Looks up the tally for an outcome.
    pub fn tally(&self, outcome: Outcome) -> Option<&LabelTally> {
        self.tallies.iter().find(|t| t.outcome == outcome)
    }

    /// Sum of all counts; equals `total`.
    pub fn count_sum(&self) -> usize {
        self.tallies.iter().map(|t| t.count).sum()
    }

    /// Sum of all relative frequencies; 1.0 up to rounding when `total > 0`.
    pub fn frequency_sum(&self) -> f64 {
        self.tallies.iter().map(|t| t.frequency).sum()
    }
}

/// Summary statistics comparing a trial report with a fair experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialSummary {
    /// Probability of each label under a fair coin or die.
    pub expected_frequency: f64,
    /// Largest absolute gap between observed and expected frequency.
    pub max_deviation: f64,
    /// Pearson's chi-square statistic against the uniform distribution.
    pub chi_square: f64,
    /// Label with the highest count (earliest label wins ties).
    pub most_frequent: Option<Outcome>,
}

impl TrialSummary {
    /// Computes the summary of a trial report.
    pub fn from_report(report: &TrialReport) -> Self {
        let labels = report.tallies.len();
        let expected_frequency = if labels == 0 {
            0.0
        } else {
            1.0 / labels as f64
        };

        let max_deviation = report
            .tallies
            .iter()
            .map(|t| (t.frequency - expected_frequency).abs())
            .fold(0.0, f64::max);

        let chi_square = if report.total == 0 || labels == 0 {
            0.0
        } else {
            let expected_count = report.total as f64 * expected_frequency;
            report
                .tallies
                .iter()
                .map(|t| {
                    let diff = t.count as f64 - expected_count;
                    diff * diff / expected_count
                })
                .sum()
        };

        let mut most_frequent: Option<&LabelTally> = None;
        for tally in &report.tallies {
            if tally.count > 0 && most_frequent.map_or(true, |best| tally.count > best.count) {
                most_frequent = Some(tally);
            }
        }

        Self {
            expected_frequency,
            max_deviation,
            chi_square,
            most_frequent: most_frequent.map(|t| t.outcome),
        }
    }
}

/// One evaluated expression, successful or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    /// Operation that was applied.
    pub operation: Operation,
    /// First operand (the argument for a logarithm).
    #[serde(with = "float_label")]
    pub a: f64,
    /// Second operand (the base for a logarithm).
    #[serde(with = "float_label")]
    pub b: f64,
    /// Numeric result, when evaluation succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "float_label::option")]
    pub value: Option<f64>,
    /// Error classification, when evaluation failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<EvalError>,
    /// User-facing error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Calculation {
    /// Records the outcome of `evaluate(operation, a, b)`.
    pub fn new(operation: Operation, a: f64, b: f64, result: Result<f64, EvalError>) -> Self {
        match result {
            Ok(value) => Self {
                operation,
                a,
                b,
                value: Some(value),
                error: None,
                message: None,
            },
            Err(error) => Self {
                operation,
                a,
                b,
                value: None,
                error: Some(error),
                message: Some(error.describe(operation).to_string()),
            },
        }
    }

    /// Returns true if the evaluation failed.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Serde helpers writing non-finite floats as `"inf"`, `"-inf"` and `"NaN"`.
///
/// JSON has no representation for them and `serde_json` would emit `null`.
mod float_label {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Label(String),
    }

    fn from_repr<E: serde::de::Error>(repr: Repr) -> Result<f64, E> {
        match repr {
            Repr::Number(v) => Ok(v),
            Repr::Label(label) => match label.as_str() {
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                "NaN" => Ok(f64::NAN),
                other => Err(E::custom(format!("invalid number: '{}'", other))),
            },
        }
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_infinite() {
            serializer.serialize_str(if *value > 0.0 { "inf" } else { "-inf" })
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        from_repr(Repr::deserialize(deserializer)?)
    }

    pub mod option {
        use super::{from_repr, Repr};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<f64>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => super::serialize(v, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<f64>, D::Error> {
            Option::<Repr>::deserialize(deserializer)?
                .map(from_repr)
                .transpose()
        }
    }
}

/// Metadata attached to every rendered report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Version of the tool that produced the report.
    pub tool_version: String,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Seed of the random source, if one was fixed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl ReportMetadata {
    /// Metadata stamped with the current time.
    pub fn now(seed: Option<u64>) -> Self {
        Self {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now(),
            seed,
        }
    }
}

/// Report for a single calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationReport {
    pub metadata: ReportMetadata,
    pub calculation: Calculation,
}

/// Report for a batch of trials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub metadata: ReportMetadata,
    pub trials: TrialReport,
    pub summary: TrialSummary,
    /// Trial count the user asked for, if it had to be clamped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_trials: Option<usize>,
}
