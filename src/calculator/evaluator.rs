//! Evaluation of a single `a op b` expression.
//!
//! Every failure is returned as an [`EvalError`]; nothing here panics.
//! A result counts as an overflow when a finite pair of operands produces an
//! infinite or NaN value.

use crate::error::{EvalError, InvalidReason};
use crate::models::Operation;

/// Evaluates `a op b`.
///
/// For [`Operation::Log`] this computes the logarithm of `a` in base `b`.
///
/// # Examples
/// ```
/// use calclab::calculator::evaluate;
/// use calclab::models::Operation;
/// assert_eq!(evaluate(Operation::Power, 2.0, 10.0), Ok(1024.0));
/// assert!(evaluate(Operation::Divide, 1.0, 0.0).is_err());
/// ```
pub fn evaluate(op: Operation, a: f64, b: f64) -> Result<f64, EvalError> {
    match op {
        Operation::Add => Ok(a + b),
        Operation::Subtract => Ok(a - b),
        Operation::Multiply => Ok(a * b),
        Operation::Divide => divide(a, b),
        Operation::Modulo => modulo(a, b),
        Operation::Power => power(a, b),
        Operation::Log => log(a, b),
    }
}

fn divide(a: f64, b: f64) -> Result<f64, EvalError> {
    if b == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(a / b)
}

/// Floored modulo: `a - b * floor(a / b)`, computed from the exact remainder.
///
/// The result has the sign of the divisor, so `-7 % 3 == 2` and
/// `7 % -3 == -2`. A zero result carries the divisor's sign.
fn modulo(a: f64, b: f64) -> Result<f64, EvalError> {
    if b == 0.0 {
        return Err(EvalError::DivisionByZero);
    }

    let rem = a % b;
    let floored = if rem == 0.0 {
        0.0_f64.copysign(b)
    } else if (rem < 0.0) != (b < 0.0) {
        rem + b
    } else {
        rem
    };
    Ok(floored)
}

fn power(a: f64, b: f64) -> Result<f64, EvalError> {
    let result = a.powf(b);
    if a.is_finite() && b.is_finite() && !result.is_finite() {
        return Err(EvalError::Overflow);
    }
    Ok(result)
}

fn log(a: f64, b: f64) -> Result<f64, EvalError> {
    // Domain checks come before touching ln().
    if a <= 0.0 {
        return Err(EvalError::InvalidArgument(
            InvalidReason::NonPositiveArgument,
        ));
    }
    if b <= 0.0 || b == 1.0 {
        return Err(EvalError::InvalidArgument(InvalidReason::InvalidBase));
    }

    let result = a.ln() / b.ln();
    if result.is_nan() {
        Err(EvalError::DomainError)
    } else if result.is_infinite() {
        Err(EvalError::Overflow)
    } else {
        Ok(result)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn finite() -> impl Strategy<Value = f64> {
        -1e12_f64..1e12
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn divide_matches_native(a in finite(), b in finite()) {
            prop_assume!(b != 0.0);
            prop_assert_eq!(evaluate(Operation::Divide, a, b), Ok(a / b));
        }

        #[test]
        fn divide_and_modulo_by_zero_fail(a in proptest::num::f64::ANY) {
            prop_assert_eq!(evaluate(Operation::Divide, a, 0.0), Err(EvalError::DivisionByZero));
            prop_assert_eq!(evaluate(Operation::Modulo, a, 0.0), Err(EvalError::DivisionByZero));
        }

        #[test]
        fn modulo_is_bounded_by_divisor(a in finite(), b in finite()) {
            prop_assume!(b.abs() > 1e-6);
            let r = evaluate(Operation::Modulo, a, b).unwrap();
            prop_assert!(r.abs() <= b.abs());
            prop_assert!(r == 0.0 || (r < 0.0) == (b < 0.0));
        }

        #[test]
        fn log_rejects_non_positive_argument(a in -1e12_f64..=0.0, b in proptest::num::f64::ANY) {
            prop_assert_eq!(
                evaluate(Operation::Log, a, b),
                Err(EvalError::InvalidArgument(InvalidReason::NonPositiveArgument))
            );
        }

        #[test]
        fn log_rejects_bad_base(a in 1e-12_f64..1e12, b in -1e12_f64..=0.0) {
            let expected = Err(EvalError::InvalidArgument(InvalidReason::InvalidBase));
            prop_assert_eq!(evaluate(Operation::Log, a, b), expected);
            prop_assert_eq!(evaluate(Operation::Log, a, 1.0), expected);
        }

        #[test]
        fn evaluate_is_idempotent(
            op in proptest::sample::select(Operation::ALL.to_vec()),
            a in finite(),
            b in finite(),
        ) {
            let first = evaluate(op, a, b);
            let second = evaluate(op, a, b);
            match (first, second) {
                (Ok(x), Ok(y)) => prop_assert!(x == y || (x.is_nan() && y.is_nan())),
                (x, y) => prop_assert_eq!(x, y),
            }
        }
    }
}
