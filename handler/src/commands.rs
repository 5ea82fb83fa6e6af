//! One function per command. Each takes the raw event (where it needs one) and
//! builds the success [`Response`]; any failure is returned as a
//! [`HandlerError`] for [`Handler`](crate::Handler) to turn into an error response.

use std::sync::Arc;

use grader::EvaluationJob;
use grader::traits::evaluation::EvaluationFunction;
use grader::traits::preview::PreviewFunction;
use serde_json::Value;
use util::eval_config::MatchPolicy;

use crate::error::HandlerError;
use crate::healthcheck::{HealthCheck, run_checks};
use crate::parse;
use crate::response::{Command, ErrorResponse, Response};
use crate::validate::{self, EvaluationRequest, PreviewRequest};

/// `eval` (and its alias `grade`): grade the response and resolve cases.
pub fn evaluate(
    event: &Value,
    evaluator: Arc<dyn EvaluationFunction>,
    policy: MatchPolicy,
) -> Result<Response, HandlerError> {
    let body = parse::body(event)?;
    let EvaluationRequest {
        response,
        answer,
        params,
    } = validate::request(&body)?;

    let result = EvaluationJob::new(response, answer, params.unwrap_or_default())
        .with_evaluator(evaluator)
        .with_policy(policy)
        .run()?;

    if let Some(case) = result.matched_case {
        tracing::debug!(case, warnings = result.warnings.len(), "Case matched");
    }

    Ok(Response::success(Command::Eval, serde_json::to_value(result)?))
}

/// `preview`: render the response without grading it.
pub fn preview(event: &Value, previewer: &dyn PreviewFunction) -> Result<Response, HandlerError> {
    let body = parse::body(event)?;
    let request: PreviewRequest = validate::request(&body)?;

    let result = previewer
        .preview(&request.response, &request.params.unwrap_or_default())
        .map_err(HandlerError::Preview)?;

    Ok(Response::success(Command::Preview, serde_json::to_value(result)?))
}

/// `healthcheck`: the body is ignored.
pub fn healthcheck(checks: &[HealthCheck]) -> Result<Response, HandlerError> {
    let result = run_checks(checks);
    Ok(Response::success(Command::Healthcheck, serde_json::to_value(result)?))
}

/// Any command not listed above. The body is neither parsed nor validated.
pub fn unknown(command: &str) -> Response {
    Response::error(ErrorResponse::new(format!("Unknown command '{command}'.")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::NO_BODY_MESSAGE;
    use grader::evaluators::{EchoPreview, ExactEvaluation};
    use serde_json::json;

    fn exact() -> Arc<dyn EvaluationFunction> {
        Arc::new(ExactEvaluation)
    }

    #[test]
    fn evaluate_returns_eval_response() {
        let event = json!({"body": {"response": "hello", "answer": "world!", "params": {}}});
        let response = evaluate(&event, exact(), MatchPolicy::FirstOfAll).unwrap();

        assert_eq!(response.command, Some(Command::Eval));
        assert_eq!(response.result, Some(json!({"is_correct": false})));
    }

    #[test]
    fn evaluate_without_params() {
        let event = json!({"body": "{\"response\": \"a\", \"answer\": \"a\"}"});
        let response = evaluate(&event, exact(), MatchPolicy::FirstOfAll).unwrap();
        assert_eq!(response.result, Some(json!({"is_correct": true})));
    }

    #[test]
    fn evaluate_without_body_is_a_parse_error() {
        let err = evaluate(&json!({}), exact(), MatchPolicy::FirstOfAll).unwrap_err();
        assert!(matches!(err, HandlerError::Parse(ref e) if e.message == NO_BODY_MESSAGE));
    }

    #[test]
    fn evaluate_reports_matched_case() {
        let event = json!({"body": {
            "response": "yes",
            "answer": "world",
            "params": {"cases": [{"answer": "yes", "feedback": "Close."}]}
        }});
        let response = evaluate(&event, exact(), MatchPolicy::FirstOfAll).unwrap();

        assert_eq!(
            response.result,
            Some(json!({"is_correct": false, "feedback": "Close.", "matched_case": 0}))
        );
    }

    #[test]
    fn preview_echoes_response() {
        let event = json!({"body": {"response": "x^2"}});
        let response = preview(&event, &EchoPreview).unwrap();

        assert_eq!(response.command, Some(Command::Preview));
        assert_eq!(response.result, Some(json!({"preview": "x^2"})));
    }

    #[test]
    fn preview_validates_body() {
        let err = preview(&json!({"body": {"answer": 1}}), &EchoPreview).unwrap_err();
        assert!(matches!(err, HandlerError::Validation(_)));
    }

    #[test]
    fn evaluate_rejects_null_answer() {
        let event = json!({"body": {"response": "a", "answer": null}});
        match evaluate(&event, exact(), MatchPolicy::FirstOfAll) {
            Err(HandlerError::Validation(err)) => {
                assert_eq!(err.error_thrown.message, "'answer' must not be null");
                assert_eq!(err.error_thrown.instance_path, vec![json!("answer")]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_command_message() {
        let response = unknown("not a command");
        assert_eq!(
            response.error.map(|e| e.message),
            Some("Unknown command 'not a command'.".to_string())
        );
    }
}
