//! Condition expressions.
//!
//! Success and failure conditions are evaluated through the
//! [`ConditionEvaluator`] trait, so callers can plug in their own expression
//! engine. [`ExpressionEvaluator`] is the built-in one.
//!
//! # Supported Syntax
//!
//! ```text
//! result >= 5
//! result == 'healthy' || result == 'ok'
//! result > 0.5 and result < 0.9
//! !(result == false)
//! isNaN(result) or isInf(result)
//! ```
//!
//! # Example
//!
//! ```
//! use webmetric::condition::{ConditionEvaluator, ExpressionEvaluator};
//! use webmetric::value::PrimitiveValue;
//!
//! let evaluator = ExpressionEvaluator;
//! assert!(evaluator.evaluate(&PrimitiveValue::Int(7), "result >= 5").unwrap());
//! ```

mod ast;
mod evaluator;
mod parser;

pub use ast::*;
pub use evaluator::{evaluate_expr, ConditionError, RESULT_IDENTIFIER};
pub use parser::{parse_condition, ParseError};

use crate::value::PrimitiveValue;

/// Evaluates a boolean expression against a measured value.
///
/// Implemented for closures of the same shape, which keeps classifiers and
/// providers testable without a real expression engine:
///
/// ```
/// use webmetric::condition::{ConditionError, ConditionEvaluator};
/// use webmetric::value::PrimitiveValue;
///
/// let always_true = |_: &PrimitiveValue, _: &str| -> Result<bool, ConditionError> { Ok(true) };
/// assert!(always_true.evaluate(&PrimitiveValue::Int(1), "anything").unwrap());
/// ```
pub trait ConditionEvaluator: Send + Sync {
    /// Evaluates `expression` with `value` as the measured result.
    ///
    /// # Errors
    ///
    /// Returns a `ConditionError` if the expression cannot be evaluated.
    fn evaluate(&self, value: &PrimitiveValue, expression: &str) -> Result<bool, ConditionError>;
}

impl<F> ConditionEvaluator for F
where
    F: Fn(&PrimitiveValue, &str) -> Result<bool, ConditionError> + Send + Sync,
{
    fn evaluate(&self, value: &PrimitiveValue, expression: &str) -> Result<bool, ConditionError> {
        self(value, expression)
    }
}

/// The built-in expression evaluator.
///
/// Parses the expression on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionEvaluator;

impl ConditionEvaluator for ExpressionEvaluator {
    fn evaluate(&self, value: &PrimitiveValue, expression: &str) -> Result<bool, ConditionError> {
        let expr = parse_condition(expression)?;
        evaluate_expr(&expr, value)
    }
}
