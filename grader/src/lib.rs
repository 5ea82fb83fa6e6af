//! # Grader Library
//!
//! Core logic for grading a response with a pluggable evaluation function and
//! resolving targeted feedback from fallback cases.
//!
//! ## Key Concepts
//! - **EvaluationJob**: grades one response against one answer, then resolves cases.
//! - **Evaluation functions**: pluggable graders implementing [`EvaluationFunction`].
//! - **Cases**: fallback answer/feedback pairs in `params.cases`; the first one the
//!   response matches supplies the feedback and may override correctness.
//! - **Warnings**: per-case failures are reported on the result instead of failing the job.

pub mod cases;
pub mod error;
pub mod evaluators;
pub mod report;
pub mod traits;
pub mod types;

use crate::cases::{cases_from_params, resolve_cases};
use crate::error::GraderError;
use crate::evaluators::ExactEvaluation;
use crate::report::assemble;
use crate::traits::evaluation::EvaluationFunction;
use crate::types::EvaluationResult;

use serde_json::Value;
use util::eval_config::{MatchPolicy, Params};

/// Grades a single response.
///
/// # Fields
/// - `response`: the submitted answer.
/// - `answer`: the reference answer.
/// - `params`: request params, passed to the evaluation function and read for `cases`.
/// - `evaluator`: the evaluation function; [`ExactEvaluation`] unless replaced.
/// - `policy`: how cases are searched for a match.
pub struct EvaluationJob<'a> {
    response: Value,
    answer: Value,
    params: Params,
    evaluator: Box<dyn EvaluationFunction + 'a>,
    policy: MatchPolicy,
}

impl<'a> EvaluationJob<'a> {
    pub fn new(response: Value, answer: Value, params: Params) -> Self {
        Self {
            response,
            answer,
            params,
            evaluator: Box::new(ExactEvaluation),
            policy: MatchPolicy::default(),
        }
    }

    /// Set the evaluation function used for the primary answer and every case.
    pub fn with_evaluator<E: EvaluationFunction + 'a>(mut self, evaluator: E) -> Self {
        self.evaluator = Box::new(evaluator);
        self
    }

    /// Set how cases are searched for a match.
    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run the evaluation.
    ///
    /// # Steps
    /// 1. Calls the evaluation function on the primary answer. Any failure is returned as is.
    /// 2. If `params.cases` holds at least one case, resolves them against the response.
    /// 3. Merges the match (feedback, index, mark) and any warnings into the primary result.
    ///
    /// # Errors
    /// - [`GraderError::Evaluation`] when the primary call fails.
    /// - [`GraderError::InvalidCases`] when `params.cases` is not a list.
    /// - [`GraderError::InvalidMark`] when the matched case's `mark` is not an integer.
    pub fn run(self) -> Result<EvaluationResult, GraderError> {
        let result = self
            .evaluator
            .evaluate(&self.response, &self.answer, &self.params)?;

        let cases = cases_from_params(&self.params)?;
        if cases.is_empty() {
            return Ok(result);
        }

        let resolution = resolve_cases(
            self.evaluator.as_ref(),
            &self.response,
            &self.params,
            &cases,
            self.policy,
        )?;

        Ok(assemble(result, resolution))
    }
}
