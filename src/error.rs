//! Error types for the calculator core.
//!
//! Evaluation failures are ordinary values: the caller decides whether to
//! print a message, skip the result, or turn them into an exit code.

use crate::models::Operation;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a logarithm argument was rejected before computing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    /// The argument `a` of `log_b(a)` was zero or negative.
    NonPositiveArgument,
    /// The base `b` was zero, negative, or exactly one.
    InvalidBase,
}

impl InvalidReason {
    /// Short machine-oriented tag for the reason.
    pub fn tag(&self) -> &'static str {
        match self {
            InvalidReason::NonPositiveArgument => "a<=0",
            InvalidReason::InvalidBase => "bad base",
        }
    }
}

/// Failure of a single evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("invalid argument ({})", .0.tag())]
    InvalidArgument(InvalidReason),

    #[error("domain error")]
    DomainError,

    #[error("result not representable")]
    Overflow,
}

impl EvalError {
    /// Human-readable message for the operation that produced this error.
    pub fn describe(&self, op: Operation) -> &'static str {
        match (self, op) {
            (EvalError::DivisionByZero, Operation::Modulo) => "Cannot take a modulo by zero.",
            (EvalError::DivisionByZero, _) => "Cannot divide by zero.",
            (EvalError::InvalidArgument(InvalidReason::NonPositiveArgument), _) => {
                "Argument a must be greater than 0."
            }
            (EvalError::InvalidArgument(InvalidReason::InvalidBase), _) => {
                "Base b must be greater than 0 and not equal to 1."
            }
            (EvalError::DomainError, _) => "The logarithm is undefined for these values.",
            (EvalError::Overflow, Operation::Log) => "The logarithm overflowed.",
            (EvalError::Overflow, _) => "The power result cannot be represented.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(EvalError::DivisionByZero.to_string(), "division by zero");
        assert_eq!(
            EvalError::InvalidArgument(InvalidReason::NonPositiveArgument).to_string(),
            "invalid argument (a<=0)"
        );
        assert_eq!(
            EvalError::InvalidArgument(InvalidReason::InvalidBase).to_string(),
            "invalid argument (bad base)"
        );
    }

    #[test]
    fn test_describe_depends_on_operation() {
        assert_eq!(
            EvalError::DivisionByZero.describe(Operation::Divide),
            "Cannot divide by zero."
        );
        assert_eq!(
            EvalError::DivisionByZero.describe(Operation::Modulo),
            "Cannot take a modulo by zero."
        );
        assert_eq!(
            EvalError::Overflow.describe(Operation::Log),
            "The logarithm overflowed."
        );
        assert_eq!(
            EvalError::Overflow.describe(Operation::Power),
            "The power result cannot be represented."
        );
    }

    #[test]
    fn test_serialize_tagged() {
        let json =
            serde_json::to_string(&EvalError::InvalidArgument(InvalidReason::InvalidBase)).unwrap();
        assert_eq!(json, r#"{"kind":"invalid_argument","reason":"invalid_base"}"#);

        let json = serde_json::to_string(&EvalError::Overflow).unwrap();
        assert_eq!(json, r#"{"kind":"overflow"}"#);
    }
}
