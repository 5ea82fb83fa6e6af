//! # Healthcheck
//!
//! Runs a list of named checks and reports them in a JSON-encodable shape:
//!
//! ```json
//! {
//!   "tests_passed": false,
//!   "successes": [{ "name": "request_validation.accepts_eval_body", "time": 41 }],
//!   "failures": [{ "name": "my_function.handles_units" }],
//!   "errors": []
//! }
//! ```
//!
//! A check that returns `Err` is a failure. A check that panics is an error.
//! `time` is the wall-clock duration of a successful check in microseconds.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Instant;

use grader::EvaluationJob;
use grader::evaluators::ExactEvaluation;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use util::eval_config::{MatchPolicy, Params};

use crate::validate::{self, EvaluationRequest, PreviewRequest, ResBodyValidators};

type CheckFn = dyn Fn() -> Result<(), String> + Send + Sync;

/// A named self-check.
#[derive(Clone)]
pub struct HealthCheck {
    pub name: String,
    run: Arc<CheckFn>,
}

impl HealthCheck {
    pub fn new<F>(name: impl Into<String>, run: F) -> Self
    where
        F: Fn() -> Result<(), String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            run: Arc::new(run),
        }
    }
}

impl std::fmt::Debug for HealthCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthCheck").field("name", &self.name).finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonTestResult {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthcheckResult {
    pub tests_passed: bool,
    pub successes: Vec<JsonTestResult>,
    pub failures: Vec<JsonTestResult>,
    pub errors: Vec<JsonTestResult>,
}

/// Runs `checks` in order and collects the outcome of each.
pub fn run_checks(checks: &[HealthCheck]) -> HealthcheckResult {
    let mut result = HealthcheckResult::default();

    for check in checks {
        let started = Instant::now();
        let outcome = catch_unwind(AssertUnwindSafe(|| (check.run)()));
        let elapsed = started.elapsed().as_micros() as u64;

        match outcome {
            Ok(Ok(())) => result.successes.push(JsonTestResult {
                name: check.name.clone(),
                time: Some(elapsed),
            }),
            Ok(Err(reason)) => {
                tracing::warn!(check = %check.name, %reason, "Healthcheck failed");
                result.failures.push(JsonTestResult {
                    name: check.name.clone(),
                    time: None,
                });
            }
            Err(_) => {
                tracing::error!(check = %check.name, "Healthcheck panicked");
                result.errors.push(JsonTestResult {
                    name: check.name.clone(),
                    time: None,
                });
            }
        }
    }

    result.tests_passed = result.failures.is_empty() && result.errors.is_empty();
    result
}

/// Self-checks of the request/response validators and the case machinery.
pub fn builtin_checks() -> Vec<HealthCheck> {
    vec![
        HealthCheck::new("request_validation.accepts_eval_body", || {
            validate::request::<EvaluationRequest>(&json!({"response": "a", "answer": "b", "params": {}}))
                .map(drop)
                .map_err(|err| err.error_thrown.message)
        }),
        HealthCheck::new("request_validation.rejects_missing_answer", || {
            match validate::request::<EvaluationRequest>(&json!({"response": "a"})) {
                Ok(_) => Err("body without an answer was accepted".into()),
                Err(_) => Ok(()),
            }
        }),
        HealthCheck::new("request_validation.accepts_preview_body", || {
            validate::request::<PreviewRequest>(&json!({"response": "a"}))
                .map(drop)
                .map_err(|err| err.error_thrown.message)
        }),
        HealthCheck::new("response_validation.accepts_eval_response", || {
            validate::response(
                &json!({"command": "eval", "result": {"is_correct": true}}),
                ResBodyValidators::Evaluation,
            )
            .map_err(|err| err.error_thrown.message)
        }),
        HealthCheck::new("response_validation.rejects_missing_is_correct", || {
            let body = json!({"command": "eval", "result": {"feedback": "?"}});
            match validate::response(&body, ResBodyValidators::Evaluation) {
                Ok(()) => Err("result without is_correct was accepted".into()),
                Err(_) => Ok(()),
            }
        }),
        HealthCheck::new("cases.single_match_feedback", || {
            let result = run_case_smoke(json!([
                {"answer": "no", "feedback": "f0"},
                {"answer": "yes", "feedback": "f1"}
            ]))?;
            match (result.matched_case, result.feedback.as_deref()) {
                (Some(1), Some("f1")) => Ok(()),
                other => Err(format!("unexpected match {other:?}")),
            }
        }),
        HealthCheck::new("cases.multiple_matches_warning", || {
            let result = run_case_smoke(json!([
                {"answer": "yes", "feedback": "f0"},
                {"answer": "yes", "feedback": "f1"}
            ]))?;
            match result.warnings.as_slice() {
                [warning] if warning.case.is_none() => Ok(()),
                other => Err(format!("unexpected warnings {other:?}")),
            }
        }),
    ]
}

fn run_case_smoke(cases: Value) -> Result<grader::types::EvaluationResult, String> {
    let mut params = Params::new();
    params.insert("cases".into(), cases);

    EvaluationJob::new(json!("yes"), json!("expected"), params)
        .with_evaluator(ExactEvaluation)
        .with_policy(MatchPolicy::FirstOfAll)
        .run()
        .map_err(|err| err.to_string())
}
