//! An evaluation function that performs an exact comparison between response and answer.
//!
//! Values are compared as JSON, so `"1"` and `1` differ and object key order does not matter.

use crate::error::EvaluationError;
use crate::traits::evaluation::EvaluationFunction;
use crate::types::EvaluationResult;
use serde_json::Value;
use util::eval_config::Params;

/// Awards correctness on an all-or-nothing basis: the response must equal the answer.
///
/// Produces no feedback of its own, which leaves feedback entirely to cases.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExactEvaluation;

impl EvaluationFunction for ExactEvaluation {
    fn evaluate(
        &self,
        response: &Value,
        answer: &Value,
        _params: &Params,
    ) -> Result<EvaluationResult, EvaluationError> {
        Ok(EvaluationResult::new(response == answer))
    }
}
