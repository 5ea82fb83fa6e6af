//! Validation of request and response bodies.
//!
//! Bodies are deserialized into typed structs and then checked with
//! [`validator`]. Each body kind has a validator enum variant; its lowercase
//! name is the one reported in the error message, e.g.
//! `"Failed to validate body against the evaluation schema."`.
//!
//! `error_thrown.instance_path` locates the failure as closely as the failing
//! stage allows: the offending field for field rules, `["result"]` for a
//! malformed result, and `[]` for the body itself.

use std::borrow::Cow;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use util::eval_config::Params;
use validator::{Validate, ValidationErrors};

/// Request body validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReqBodyValidators {
    Evaluation,
    Preview,
}

/// Response body validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResBodyValidators {
    Evaluation,
    Preview,
    Healthcheck,
}

impl ReqBodyValidators {
    pub fn name(&self) -> &'static str {
        match self {
            ReqBodyValidators::Evaluation => "evaluation",
            ReqBodyValidators::Preview => "preview",
        }
    }
}

impl ResBodyValidators {
    pub fn name(&self) -> &'static str {
        match self {
            ResBodyValidators::Evaluation => "evaluation",
            ResBodyValidators::Preview => "preview",
            ResBodyValidators::Healthcheck => "healthcheck",
        }
    }

    /// The `command` a response of this kind must report.
    pub fn command(&self) -> &'static str {
        match self {
            ResBodyValidators::Evaluation => "eval",
            ResBodyValidators::Preview => "preview",
            ResBodyValidators::Healthcheck => "healthcheck",
        }
    }
}

/// Detail object returned in the error response for validation failures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaErrorThrown {
    pub message: String,
    pub instance_path: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub error_thrown: SchemaErrorThrown,
}

impl ValidationError {
    fn new(schema: &str, message: impl Into<String>, instance_path: Vec<Value>) -> Self {
        Self {
            message: format!("Failed to validate body against the {schema} schema."),
            error_thrown: SchemaErrorThrown {
                message: message.into(),
                instance_path,
            },
        }
    }

    /// One entry per failing field, ordered by field name; the path points at the first.
    fn from_field_errors(schema: &str, errors: &ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| {
                    let reason = err.message.as_deref().unwrap_or("is invalid");
                    format!("'{field}' {reason}")
                })
            })
            .collect::<Vec<_>>()
            .join("; ");

        let instance_path = fields
            .first()
            .map(|(field, _)| vec![Value::from(field.to_string())])
            .unwrap_or_default();

        Self::new(schema, message, instance_path)
    }
}

/// Body of an `eval` request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EvaluationRequest {
    #[validate(custom(function = "not_null"))]
    pub response: Value,

    #[validate(custom(function = "not_null"))]
    pub answer: Value,

    #[serde(default)]
    pub params: Option<Params>,
}

/// Body of a `preview` request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PreviewRequest {
    #[validate(custom(function = "not_null"))]
    pub response: Value,

    #[serde(default)]
    pub params: Option<Params>,
}

/// A request body type and the validator it is reported under.
pub trait RequestBody: DeserializeOwned + Validate {
    const VALIDATOR: ReqBodyValidators;
}

impl RequestBody for EvaluationRequest {
    const VALIDATOR: ReqBodyValidators = ReqBodyValidators::Evaluation;
}

impl RequestBody for PreviewRequest {
    const VALIDATOR: ReqBodyValidators = ReqBodyValidators::Preview;
}

fn not_null(value: &Value) -> Result<(), validator::ValidationError> {
    match value {
        Value::Null => Err(validator::ValidationError::new("not_null")
            .with_message(Cow::Borrowed("must not be null"))),
        _ => Ok(()),
    }
}

/// Deserializes and validates a request body.
///
/// Missing fields and fields of the wrong type are reported by the
/// deserializer; field rules (such as a null `response`) by the validator.
pub fn request<T: RequestBody>(body: &Value) -> Result<T, ValidationError> {
    let schema = T::VALIDATOR.name();
    let request: T = typed(body, schema, vec![])?;

    request
        .validate()
        .map_err(|errors| ValidationError::from_field_errors(schema, &errors))?;

    Ok(request)
}

/// Top-level shape shared by every response.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ResponseBody {
    command: Option<String>,
    result: Option<Value>,
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[allow(dead_code)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct EvaluationResultBody {
    #[allow(dead_code)]
    is_correct: bool,
    #[serde(default)]
    #[allow(dead_code)]
    warnings: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct PreviewResultBody {
    #[allow(dead_code)]
    preview: Value,
}

#[derive(Debug, Deserialize)]
struct HealthcheckResultBody {
    #[allow(dead_code)]
    tests_passed: bool,
}

/// Validates a response body.
///
/// An error response (one carrying `error`) only needs a string `message`.
/// Any other response must report the validator's command and an object
/// `result` with the fields that kind of result always has.
pub fn response(body: &Value, validator: ResBodyValidators) -> Result<(), ValidationError> {
    let schema = validator.name();
    let ResponseBody {
        command,
        result,
        error,
    } = typed(body, schema, vec![])?;

    if error.is_some() {
        return Ok(());
    }

    let expected = validator.command();
    match command.as_deref() {
        Some(command) if command == expected => {}
        Some(other) => {
            return Err(ValidationError::new(
                schema,
                format!("'{expected}' was expected, found '{other}'"),
                vec![Value::from("command")],
            ));
        }
        None => return Err(ValidationError::new(schema, "missing field `command`", vec![])),
    }

    let Some(result) = result else {
        return Err(ValidationError::new(schema, "missing field `result`", vec![]));
    };

    let path = vec![Value::from("result")];
    match validator {
        ResBodyValidators::Evaluation => typed::<EvaluationResultBody>(&result, schema, path).map(drop),
        ResBodyValidators::Preview => typed::<PreviewResultBody>(&result, schema, path).map(drop),
        ResBodyValidators::Healthcheck => typed::<HealthcheckResultBody>(&result, schema, path).map(drop),
    }
}

/// Deserializes an object into `T`. Non-objects are rejected up front, since
/// the deserializer would otherwise fill a struct positionally from an array.
fn typed<T: DeserializeOwned>(value: &Value, schema: &str, path: Vec<Value>) -> Result<T, ValidationError> {
    if !value.is_object() {
        return Err(ValidationError::new(
            schema,
            format!("invalid type: {}, expected an object", type_name(value)),
            path,
        ));
    }

    T::deserialize(value).map_err(|err| ValidationError::new(schema, err.to_string(), path))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "map",
    }
}
