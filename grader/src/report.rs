//! # Result Assembly
//!
//! Merges the outcome of case resolution into the primary [`EvaluationResult`].
//!
//! ## Rules
//!
//! - A match replaces `feedback` with the matched case's feedback and sets
//!   `matched_case` to its index.
//! - A `mark` on the matched case overrides `is_correct`.
//! - Warnings are attached only when there are any, whether or not a case matched.
//!
//! Assembly never fails: anything that could go wrong has already been turned
//! into a warning or an error by the time it gets here.

use crate::types::{EvaluationResult, Resolution};

/// Applies `resolution` to `result`.
pub fn assemble(mut result: EvaluationResult, resolution: Resolution) -> EvaluationResult {
    if let Some(outcome) = resolution.matched {
        result.feedback = Some(outcome.feedback);
        result.matched_case = Some(outcome.id);

        if let Some(is_correct) = outcome.mark {
            result.is_correct = Some(is_correct);
        }
    }

    if !resolution.warnings.is_empty() {
        result.warnings.extend(resolution.warnings);
    }

    result
}
