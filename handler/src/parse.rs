//! Reads the body out of an inbound event.
//!
//! An event is a JSON object with an optional `headers` object and a `body`
//! that is either already an object or a JSON-encoded string.

use serde_json::{Value, json};
use thiserror::Error;

pub const NO_BODY_MESSAGE: &str = "No data supplied in request body.";
pub const INVALID_JSON_MESSAGE: &str = "Request body is not valid JSON.";

/// Raised when the body is missing or cannot be decoded.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    /// Decoder detail: `{message, location: {line, column}}` for malformed JSON,
    /// or a plain string for anything else.
    pub error_thrown: Option<Value>,
}

impl ParseError {
    fn new(message: &str, error_thrown: Option<Value>) -> Self {
        Self {
            message: message.to_string(),
            error_thrown,
        }
    }
}

/// Returns the decoded body of `event`.
///
/// Objects are returned as they are. Strings are decoded as JSON; the decoded
/// value is not checked further here, so a body of `"[1, 2]"` comes back as an
/// array and is rejected later by validation.
pub fn body(event: &Value) -> Result<Value, ParseError> {
    let raw = match event.get("body") {
        None | Some(Value::Null) => return Err(ParseError::new(NO_BODY_MESSAGE, None)),
        Some(Value::Object(_)) => return Ok(event["body"].clone()),
        Some(raw) => raw,
    };

    let Value::String(text) = raw else {
        let detail = format!("body must be a JSON string or object, not {}", type_name(raw));
        return Err(ParseError::new(INVALID_JSON_MESSAGE, Some(Value::String(detail))));
    };

    serde_json::from_str(text).map_err(|err| {
        ParseError::new(
            INVALID_JSON_MESSAGE,
            Some(json!({
                "message": decode_message(&err),
                "location": {"line": err.line(), "column": err.column()},
            })),
        )
    })
}

/// The decoder's message without the trailing position, which is reported separately.
fn decode_message(err: &serde_json::Error) -> String {
    let full = err.to_string();
    let suffix = format!(" at line {} column {}", err.line(), err.column());
    full.strip_suffix(&suffix).map(str::to_string).unwrap_or(full)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_body_is_rejected() {
        let err = body(&json!({"random": "metadata", "without": "a body"})).unwrap_err();
        assert_eq!(err.message, NO_BODY_MESSAGE);
        assert_eq!(err.error_thrown, None);
    }

    #[test]
    fn null_body_is_rejected() {
        let err = body(&json!({"body": null})).unwrap_err();
        assert_eq!(err.message, NO_BODY_MESSAGE);
    }

    #[test]
    fn object_body_is_returned_as_is() {
        let event = json!({"body": {"response": "a", "answer": "b"}});
        assert_eq!(body(&event).unwrap(), json!({"response": "a", "answer": "b"}));
    }

    #[test]
    fn string_body_is_decoded() {
        let event = json!({"body": "{\"response\": \"a\", \"answer\": 1}"});
        assert_eq!(body(&event).unwrap(), json!({"response": "a", "answer": 1}));
    }

    #[test]
    fn malformed_json_reports_location() {
        let err = body(&json!({"body": "{}}}{{{[][] this is not json."})).unwrap_err();
        assert_eq!(err.message, INVALID_JSON_MESSAGE);

        let detail = err.error_thrown.expect("decoder detail");
        assert_eq!(detail["location"]["line"], json!(1));
        assert_eq!(detail["location"]["column"], json!(3));
        assert_eq!(detail["message"], json!("trailing characters"));
    }

    #[test]
    fn non_string_body_reports_type() {
        let err = body(&json!({"body": [1, 2]})).unwrap_err();
        assert_eq!(err.message, INVALID_JSON_MESSAGE);
        assert_eq!(
            err.error_thrown,
            Some(json!("body must be a JSON string or object, not array"))
        );
    }
}
