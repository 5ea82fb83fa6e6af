//! Tests a single case against the response.
//!
//! Every way a case can fail (malformed entry, structured fault, unstructured
//! fault, a result without `is_correct`) ends up as exactly one [`CaseWarning`]
//! on the [`CaseResult`]. Nothing here aborts the request.

use crate::error::EvaluationError;
use crate::traits::evaluation::EvaluationFunction;
use crate::types::{Case, CaseResult, CaseWarning};
use serde_json::Value;
use util::eval_config::{Params, layer_params};

pub const MISSING_FIELDS_MESSAGE: &str = "Missing answer/feedback field";
pub const MISSING_IS_CORRECT_MESSAGE: &str = "is_correct missing from function output";

/// Evaluates `case` (at position `index`) against `response`.
///
/// The evaluation function receives the case's answer and the request params
/// with the case's own params layered on top.
pub fn evaluate_case(
    evaluator: &dyn EvaluationFunction,
    response: &Value,
    params: &Params,
    case: &Case,
    index: usize,
) -> CaseResult {
    let (Some(answer), Some(_)) = (&case.answer, &case.feedback) else {
        return CaseResult::warned(CaseWarning::for_case(index, MISSING_FIELDS_MESSAGE));
    };

    let Some(case_params) = case.case_params() else {
        return CaseResult::warned(CaseWarning::unstructured(
            index,
            "case params must be an object",
        ));
    };
    let combined = layer_params(params, &case_params);

    match evaluator.evaluate(response, answer, &combined) {
        Ok(result) => match result.is_correct {
            Some(is_correct) => CaseResult::matched(is_correct, result.feedback.unwrap_or_default()),
            None => CaseResult::warned(CaseWarning::for_case(index, MISSING_IS_CORRECT_MESSAGE)),
        },
        Err(EvaluationError::Evaluation(exc)) => {
            CaseResult::warned(CaseWarning::from_exception(index, &exc))
        }
        Err(err @ EvaluationError::Other(_)) => {
            CaseResult::warned(CaseWarning::unstructured(index, err.detail()))
        }
    }
}
