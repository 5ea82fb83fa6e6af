//! # Handler Library
//!
//! The request boundary in front of an evaluation function: parses inbound
//! events, validates request and response bodies, dispatches on the `command`
//! header and formats errors. The HTTP binary in `main.rs` serves a [`Handler`]
//! through [`routes::routes`].
//!
//! ```rust
//! use handler::Handler;
//! use serde_json::json;
//!
//! let handler = Handler::default();
//! let response = handler.handle(&json!({
//!     "headers": {"command": "eval"},
//!     "body": {"response": "x", "answer": "x"}
//! }));
//! assert_eq!(response.result, Some(json!({"is_correct": true})));
//! ```

pub mod commands;
pub mod error;
pub mod healthcheck;
pub mod logging;
pub mod parse;
pub mod response;
pub mod routes;
pub mod validate;

use std::sync::Arc;

use grader::evaluators::{EchoPreview, ExactEvaluation};
use grader::traits::evaluation::EvaluationFunction;
use grader::traits::preview::PreviewFunction;
use serde_json::Value;
use util::config;
use util::eval_config::MatchPolicy;

use crate::error::HandlerError;
use crate::healthcheck::{HealthCheck, builtin_checks};
use crate::response::{Command, ErrorResponse, Response};
use crate::validate::ResBodyValidators;

/// Dispatches events to the configured evaluation and preview functions.
///
/// Cloning is cheap; every clone shares the same functions and checks.
#[derive(Clone)]
pub struct Handler {
    evaluator: Arc<dyn EvaluationFunction>,
    previewer: Arc<dyn PreviewFunction>,
    policy: MatchPolicy,
    checks: Vec<HealthCheck>,
}

impl Default for Handler {
    fn default() -> Self {
        Self::new(ExactEvaluation)
    }
}

impl Handler {
    /// A handler for `evaluator`, previewing with [`EchoPreview`] and matching
    /// cases with the policy from `CASE_MATCH_POLICY`.
    pub fn new(evaluator: impl EvaluationFunction + 'static) -> Self {
        Self {
            evaluator: Arc::new(evaluator),
            previewer: Arc::new(EchoPreview),
            policy: config::case_match_policy(),
            checks: builtin_checks(),
        }
    }

    pub fn with_preview(mut self, previewer: impl PreviewFunction + 'static) -> Self {
        self.previewer = Arc::new(previewer);
        self
    }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Registers an extra check to run on `healthcheck`, after the built-in ones.
    pub fn with_check<F>(mut self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn() -> Result<(), String> + Send + Sync + 'static,
    {
        self.checks.push(HealthCheck::new(name, check));
        self
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Handles one event and returns the response to send back.
    ///
    /// Never fails: every error is reported in the response's `error` object.
    /// Responses of known commands are validated before they are returned; a
    /// response that does not validate is replaced by the validation error.
    pub fn handle(&self, event: &Value) -> Response {
        let raw = event
            .get("headers")
            .and_then(|headers| headers.get("command"))
            .and_then(Value::as_str)
            .unwrap_or(Command::DEFAULT);

        let Some(command) = Command::from_header(raw) else {
            tracing::warn!(command = raw, "Unknown command");
            return commands::unknown(raw);
        };

        let outcome = match command {
            Command::Eval => commands::evaluate(event, Arc::clone(&self.evaluator), self.policy),
            Command::Preview => commands::preview(event, self.previewer.as_ref()),
            Command::Healthcheck => commands::healthcheck(&self.checks),
        };

        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(%command, error = %err, "Command failed");
                Response::error(ErrorResponse::from(err))
            }
        };

        match self.validated(response, command) {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(%command, error = %err, "Response failed validation");
                Response::error(ErrorResponse::from(err))
            }
        }
    }

    fn validated(&self, response: Response, command: Command) -> Result<Response, HandlerError> {
        let validator = match command {
            Command::Eval => ResBodyValidators::Evaluation,
            Command::Preview => ResBodyValidators::Preview,
            Command::Healthcheck => ResBodyValidators::Healthcheck,
        };

        validate::response(&serde_json::to_value(&response)?, validator)?;
        Ok(response)
    }
}
