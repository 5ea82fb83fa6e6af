//! Grader Error Types
//!
//! Two layers of failure exist in the grader:
//!
//! - [`EvaluationError`] is what an evaluation or preview function reports. It is either a
//!   structured [`EvaluationException`] carrying a machine-readable payload, or any other fault.
//! - [`GraderError`] is what an [`EvaluationJob`](crate::EvaluationJob) reports. Faults raised
//!   while testing individual cases never surface here; they become
//!   [`CaseWarning`](crate::types::CaseWarning)s on the result instead.
//!
//! # Example
//!
//! ```rust
//! use grader::error::{EvaluationError, EvaluationException};
//!
//! let err: EvaluationError = EvaluationException::new("Could not parse response")
//!     .with_field("culprit", "x^")
//!     .into();
//! assert_eq!(err.to_string(), "Could not parse response");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Message used whenever an evaluation function fails without a structured payload.
pub const UNSTRUCTURED_FAULT_MESSAGE: &str =
    "An exception was raised while executing the evaluation function.";

/// A structured fault raised deliberately by an evaluation function.
///
/// The `message` plus every extra field form the error dictionary that is
/// reported back to the requester verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationException {
    pub message: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl EvaluationException {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fields: Map::new(),
        }
    }

    /// Attach an extra field to the error dictionary. Setting `message` replaces the message.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        if key == "message" {
            self.message = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
        } else {
            self.fields.insert(key, value);
        }
        self
    }

    /// The full error dictionary: `message` plus the extra fields.
    pub fn error_dict(&self) -> Map<String, Value> {
        let mut dict = Map::new();
        dict.insert("message".into(), Value::String(self.message.clone()));
        for (key, value) in &self.fields {
            dict.insert(key.clone(), value.clone());
        }
        dict
    }
}

impl fmt::Display for EvaluationException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Failure reported by an evaluation or preview function.
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// Deliberate, structured fault.
    #[error("{0}")]
    Evaluation(EvaluationException),
    /// Anything else the function failed with.
    #[error("{0}")]
    Other(Box<dyn StdError + Send + Sync>),
}

impl EvaluationError {
    /// Wrap an arbitrary fault.
    pub fn other(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        EvaluationError::Other(err.into())
    }

    /// Human-readable detail of the fault: its display form, or its debug
    /// form when the display form is empty.
    pub fn detail(&self) -> String {
        let shown = self.to_string();
        if !shown.is_empty() {
            return shown;
        }
        match self {
            EvaluationError::Evaluation(exc) => format!("{exc:?}"),
            EvaluationError::Other(err) => format!("{err:?}"),
        }
    }
}

impl From<EvaluationException> for EvaluationError {
    fn from(exc: EvaluationException) -> Self {
        EvaluationError::Evaluation(exc)
    }
}

impl From<Box<dyn StdError + Send + Sync>> for EvaluationError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        EvaluationError::Other(err)
    }
}

/// Failure of an evaluation job as a whole.
#[derive(Debug, Error)]
pub enum GraderError {
    /// The primary evaluation call failed.
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    /// `params.cases` was present but not a list.
    #[error("params.cases must be a list of cases, found {0}")]
    InvalidCases(String),

    /// The matched case carries a `mark` that cannot be read as an integer.
    #[error("invalid mark {value} on case {case}: expected an integer")]
    InvalidMark { case: usize, value: Value },
}
