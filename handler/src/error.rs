//! Handler error type and its mapping onto the `error` object of a response.

use crate::parse::ParseError;
use crate::response::ErrorResponse;
use crate::validate::ValidationError;
use grader::error::{EvaluationError, GraderError, UNSTRUCTURED_FAULT_MESSAGE};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The evaluation job failed (primary evaluation fault, bad `cases`, bad `mark`).
    #[error(transparent)]
    Grader(#[from] GraderError),

    /// The preview function failed.
    #[error(transparent)]
    Preview(EvaluationError),

    #[error("failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<HandlerError> for ErrorResponse {
    fn from(err: HandlerError) -> Self {
        match err {
            HandlerError::Parse(ParseError {
                message,
                error_thrown,
            }) => {
                let error = ErrorResponse::new(message);
                match error_thrown {
                    Some(detail) => error.with_field("error_thrown", detail),
                    None => error,
                }
            }
            HandlerError::Validation(ValidationError {
                message,
                error_thrown,
            }) => {
                let detail = serde_json::to_value(&error_thrown).unwrap_or(Value::Null);
                ErrorResponse::new(message).with_field("error_thrown", detail)
            }
            HandlerError::Grader(GraderError::Evaluation(err)) | HandlerError::Preview(err) => {
                from_evaluation_error(&err)
            }
            other @ HandlerError::Grader(_) => unstructured(other.to_string()),
            other @ HandlerError::Serialize(_) => unstructured(other.to_string()),
        }
    }
}

/// A structured fault is reported as its error dictionary; anything else as
/// the generic fault message with a `detail`.
fn from_evaluation_error(err: &EvaluationError) -> ErrorResponse {
    match err {
        EvaluationError::Evaluation(exc) => ErrorResponse::from_dict(exc.error_dict()),
        EvaluationError::Other(_) => unstructured(err.detail()),
    }
}

fn unstructured(detail: String) -> ErrorResponse {
    ErrorResponse::new(UNSTRUCTURED_FAULT_MESSAGE).with_field("detail", detail)
}
