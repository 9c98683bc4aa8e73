//! Success/failure classification.
//!
//! Turns the outcome of a metric's success and failure conditions into a
//! single [`Phase`]:
//!
//! | success condition | failure condition | phase |
//! |-------------------|-------------------|-------|
//! | unset             | unset             | Successful |
//! | set               | unset             | Successful if true, else Failed |
//! | unset             | set               | Failed if true, else Successful |
//! | set               | set               | Failed if failure holds, Successful if only success holds, else Inconclusive |

use crate::condition::{ConditionError, ConditionEvaluator};
use crate::models::Phase;
use crate::value::PrimitiveValue;

/// Classifies a value against the success and failure conditions.
///
/// Empty conditions are unset. When only one condition is set the other is
/// its negation. When both are set they are independent, and a true failure
/// condition wins over a true success condition.
///
/// # Errors
///
/// Returns the evaluator's error if either condition cannot be evaluated. The
/// caller records that as [`Phase::Error`].
///
/// # Examples
///
/// ```
/// use webmetric::classify::classify;
/// use webmetric::condition::ExpressionEvaluator;
/// use webmetric::models::Phase;
/// use webmetric::value::PrimitiveValue;
///
/// let phase = classify(&PrimitiveValue::Int(20), "", "result > 10", &ExpressionEvaluator).unwrap();
/// assert_eq!(phase, Phase::Failed);
/// ```
pub fn classify(
    value: &PrimitiveValue,
    success_condition: &str,
    failure_condition: &str,
    evaluator: &dyn ConditionEvaluator,
) -> Result<Phase, ConditionError> {
    let success_set = !success_condition.is_empty();
    let failure_set = !failure_condition.is_empty();

    let mut success = false;
    let mut failure = false;

    if success_set {
        success = evaluator.evaluate(value, success_condition)?;
    }
    if failure_set {
        failure = evaluator.evaluate(value, failure_condition)?;
    }

    match (success_set, failure_set) {
        (false, false) => return Ok(Phase::Successful),
        (true, false) => failure = !success,
        (false, true) => success = !failure,
        (true, true) => {}
    }

    Ok(if failure {
        Phase::Failed
    } else if success {
        Phase::Successful
    } else {
        Phase::Inconclusive
    })
}
