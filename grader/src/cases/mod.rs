//! # Cases
//!
//! Fallback answer/feedback pairs supplied in `params.cases`, used to give
//! targeted feedback on a response.
//!
//! - [`case_evaluator`]: tests one case, turning every failure into a warning.
//! - [`resolution`]: walks the case list and selects the match.
//! - [`mark`]: reads a case's `mark` override.

pub mod case_evaluator;
pub mod mark;
pub mod resolution;

use crate::error::GraderError;
use crate::types::Case;
use serde_json::Value;
use util::eval_config::{CASES_KEY, Params};

pub use case_evaluator::evaluate_case;
pub use resolution::resolve_cases;

/// Reads the case list out of the request params.
///
/// A missing or `null` entry means no cases. Anything other than a list is rejected.
pub fn cases_from_params(params: &Params) -> Result<Vec<Case>, GraderError> {
    match params.get(CASES_KEY) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(entries)) => Ok(entries.iter().map(Case::from_value).collect()),
        Some(other) => Err(GraderError::InvalidCases(json_type_name(other).to_string())),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
