use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use grader::error::EvaluationException;
use grader::traits::evaluation::evaluation_fn;
use grader::types::EvaluationResult;
use handler::Handler;
use handler::routes::routes;
use serde_json::Value;
use tower::ServiceExt;
use util::eval_config::MatchPolicy;

/// A handler whose evaluation function compares numbers within `params.tolerance`
/// and raises a structured fault for non-numeric answers.
pub fn make_test_handler() -> Handler {
    Handler::new(evaluation_fn(|response: &Value, answer: &Value, params| {
        let Some(answer) = answer.as_f64() else {
            return Err(EvaluationException::new("Answer is not a number")
                .with_field("answer", answer.clone())
                .into());
        };
        let tolerance = params.get("tolerance").and_then(Value::as_f64).unwrap_or(0.0);
        let is_correct = response
            .as_f64()
            .is_some_and(|response| (response - answer).abs() <= tolerance);

        Ok(EvaluationResult::new(is_correct))
    }))
    .with_policy(MatchPolicy::FirstOfAll)
}

pub fn make_test_app() -> Router {
    routes(make_test_handler())
}

/// Sends one request through a fresh app and returns status and JSON body.
pub async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = make_test_app().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

pub fn post(command: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/");
    if let Some(command) = command {
        builder = builder.header("command", command);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}
