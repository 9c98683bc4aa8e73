//! Condition evaluation engine.
//!
//! Evaluates a parsed expression against the measured value, which is bound
//! to the identifier `result`.

use super::ast::{ComparisonOp, Expr, Function, LogicalOp, Operand};
use super::parser::ParseError;
use crate::value::{PrimitiveKind, PrimitiveValue};
use std::cmp::Ordering;
use thiserror::Error;

/// Name the measured value is bound to inside expressions.
pub const RESULT_IDENTIFIER: &str = "result";

/// Errors that can occur while evaluating a condition.
#[derive(Debug, Error)]
pub enum ConditionError {
    /// The expression could not be parsed.
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// The expression references an unknown variable.
    #[error("Unknown identifier: '{0}'")]
    UnknownIdentifier(String),

    /// Two values of incompatible kinds were ordered.
    #[error("Type mismatch: cannot compare {left} {operator} {right}")]
    TypeMismatch {
        /// Kind of the left-hand side.
        left: PrimitiveKind,
        /// The comparison operator.
        operator: ComparisonOp,
        /// Kind of the right-hand side.
        right: PrimitiveKind,
    },

    /// A function was called with an argument it cannot handle.
    #[error("Invalid argument: {function} expects a number, got {kind}")]
    InvalidArgument {
        /// The function called.
        function: Function,
        /// Kind of the argument.
        kind: PrimitiveKind,
    },

    /// The expression produced a non-boolean value.
    #[error("Expression '{expression}' evaluated to {kind}, expected bool")]
    NotBoolean {
        /// The offending (sub)expression.
        expression: String,
        /// Kind it evaluated to.
        kind: PrimitiveKind,
    },

    /// Error reported by an externally supplied evaluator.
    #[error("Condition evaluation failed: {0}")]
    Evaluation(String),
}

/// Evaluates an expression with `result` bound to `value`.
///
/// `&&` and `||` short-circuit, so the right-hand side is not evaluated when
/// the left-hand side already decides the outcome.
///
/// # Errors
///
/// Returns an error if the expression references unknown identifiers, orders
/// values of incompatible kinds, or does not evaluate to a boolean.
pub fn evaluate_expr(expr: &Expr, value: &PrimitiveValue) -> Result<bool, ConditionError> {
    match expr {
        Expr::Operand(operand) => match resolve(operand, value)? {
            PrimitiveValue::Bool(b) => Ok(b),
            other => Err(ConditionError::NotBoolean {
                expression: operand.to_string(),
                kind: other.kind(),
            }),
        },
        Expr::Compare {
            left,
            operator,
            right,
        } => compare(&resolve(left, value)?, *operator, &resolve(right, value)?),
        Expr::Not(inner) => Ok(!evaluate_expr(inner, value)?),
        Expr::Combined {
            left,
            operator,
            right,
        } => match operator {
            LogicalOp::And => Ok(evaluate_expr(left, value)? && evaluate_expr(right, value)?),
            LogicalOp::Or => Ok(evaluate_expr(left, value)? || evaluate_expr(right, value)?),
        },
        Expr::Grouped(inner) => evaluate_expr(inner, value),
    }
}

/// Resolves an operand to a value.
fn resolve(operand: &Operand, value: &PrimitiveValue) -> Result<PrimitiveValue, ConditionError> {
    match operand {
        Operand::Literal(literal) => Ok(literal.clone()),
        Operand::Identifier(name) if name == RESULT_IDENTIFIER => Ok(value.clone()),
        Operand::Identifier(name) => Err(ConditionError::UnknownIdentifier(name.clone())),
        Operand::Call { function, argument } => {
            let argument = resolve(argument, value)?;
            let Some(number) = argument.as_f64() else {
                return Err(ConditionError::InvalidArgument {
                    function: *function,
                    kind: argument.kind(),
                });
            };

            let outcome = match function {
                Function::IsNaN => number.is_nan(),
                Function::IsInf => number.is_infinite(),
            };
            Ok(PrimitiveValue::Bool(outcome))
        }
    }
}

/// Compares two values.
///
/// Numbers compare numerically across integer and float. Equality between
/// different kinds is false; ordering them is an error.
fn compare(
    left: &PrimitiveValue,
    operator: ComparisonOp,
    right: &PrimitiveValue,
) -> Result<bool, ConditionError> {
    let ordering = match (left, right) {
        (PrimitiveValue::Int(l), PrimitiveValue::Int(r)) => Some(l.cmp(r)),
        (PrimitiveValue::String(l), PrimitiveValue::String(r)) => Some(l.cmp(r)),
        (PrimitiveValue::Bool(l), PrimitiveValue::Bool(r)) if !operator.is_ordering() => {
            Some(l.cmp(r))
        }
        _ => match (left.as_f64(), right.as_f64()) {
            // NaN yields no ordering
            (Some(l), Some(r)) => l.partial_cmp(&r),
            _ if operator.is_ordering() => {
                return Err(ConditionError::TypeMismatch {
                    left: left.kind(),
                    operator,
                    right: right.kind(),
                });
            }
            _ => return Ok(operator == ComparisonOp::NotEq),
        },
    };

    let Some(ordering) = ordering else {
        return Ok(operator == ComparisonOp::NotEq);
    };

    Ok(match operator {
        ComparisonOp::Eq => ordering == Ordering::Equal,
        ComparisonOp::NotEq => ordering != Ordering::Equal,
        ComparisonOp::Lt => ordering == Ordering::Less,
        ComparisonOp::LtEq => ordering != Ordering::Greater,
        ComparisonOp::Gt => ordering == Ordering::Greater,
        ComparisonOp::GtEq => ordering != Ordering::Less,
    })
}
