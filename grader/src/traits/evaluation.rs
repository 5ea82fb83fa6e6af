//! # Evaluation Function Trait
//!
//! Defines [`EvaluationFunction`], the capability an integrator supplies to grade a
//! response against an answer. The grader calls it once for the primary answer and
//! once per fallback case, with the case's params layered over the request params.

use crate::error::EvaluationError;
use crate::types::EvaluationResult;
use serde_json::Value;
use std::sync::Arc;
use util::eval_config::Params;

/// Grades `response` against `answer` under `params`.
///
/// A successful result is expected to carry `is_correct`; a result without it is
/// reported as a case warning when it comes from a case.
///
/// Implementations must be pure with respect to the request: the grader may call
/// them many times per request and in any case order it documents.
pub trait EvaluationFunction: Send + Sync {
    fn evaluate(
        &self,
        response: &Value,
        answer: &Value,
        params: &Params,
    ) -> Result<EvaluationResult, EvaluationError>;
}

impl<T: EvaluationFunction + ?Sized> EvaluationFunction for Arc<T> {
    fn evaluate(
        &self,
        response: &Value,
        answer: &Value,
        params: &Params,
    ) -> Result<EvaluationResult, EvaluationError> {
        (**self).evaluate(response, answer, params)
    }
}

impl<T: EvaluationFunction + ?Sized> EvaluationFunction for Box<T> {
    fn evaluate(
        &self,
        response: &Value,
        answer: &Value,
        params: &Params,
    ) -> Result<EvaluationResult, EvaluationError> {
        (**self).evaluate(response, answer, params)
    }
}

/// An [`EvaluationFunction`] backed by a closure. Build one with [`evaluation_fn`].
pub struct FnEvaluation<F>(F);

impl<F> EvaluationFunction for FnEvaluation<F>
where
    F: Fn(&Value, &Value, &Params) -> Result<EvaluationResult, EvaluationError> + Send + Sync,
{
    fn evaluate(
        &self,
        response: &Value,
        answer: &Value,
        params: &Params,
    ) -> Result<EvaluationResult, EvaluationError> {
        (self.0)(response, answer, params)
    }
}

/// Wrap a closure as an [`EvaluationFunction`].
///
/// ```rust
/// use grader::traits::evaluation::{EvaluationFunction, evaluation_fn};
/// use grader::types::EvaluationResult;
/// use serde_json::json;
///
/// let same = evaluation_fn(|response, answer, _params| Ok(EvaluationResult::new(response == answer)));
/// let result = same.evaluate(&json!("yes"), &json!("yes"), &Default::default()).unwrap();
/// assert_eq!(result.is_correct, Some(true));
/// ```
pub fn evaluation_fn<F>(f: F) -> FnEvaluation<F>
where
    F: Fn(&Value, &Value, &Params) -> Result<EvaluationResult, EvaluationError> + Send + Sync,
{
    FnEvaluation(f)
}
