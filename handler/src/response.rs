use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Commands the handler knows how to run.
///
/// `grade` is accepted as an alias of `eval` when reading the `command`
/// header, but responses always report `eval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Eval,
    Preview,
    Healthcheck,
}

impl Command {
    /// Command used when the event carries no `command` header.
    pub const DEFAULT: &'static str = "eval";

    /// Reads a `command` header value. Returns `None` for unknown commands.
    pub fn from_header(raw: &str) -> Option<Self> {
        match raw {
            "eval" | "grade" => Some(Command::Eval),
            "preview" => Some(Command::Preview),
            "healthcheck" => Some(Command::Healthcheck),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Eval => "eval",
            Command::Preview => "preview",
            Command::Healthcheck => "healthcheck",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error object returned in the handler response.
///
/// `message` is always present. Everything else (`detail`, `error_thrown`, or
/// the fields of a structured evaluation fault) is carried in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Builds an error from a dictionary such as an evaluation fault's `error_dict`.
    /// A missing or non-string `message` becomes an empty message.
    pub fn from_dict(mut dict: Map<String, Value>) -> Self {
        let message = match dict.remove("message") {
            Some(Value::String(message)) => message,
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        Self {
            message,
            fields: dict,
        }
    }
}

/// Response object returned by the handler for every command.
///
/// Successful responses carry `command` and `result`; failed ones carry only `error`.
///
/// ## Example (success):
/// ```json
/// {
///   "command": "eval",
///   "result": { "is_correct": false, "feedback": "Check the sign.", "matched_case": 1 }
/// }
/// ```
///
/// ## Example (error):
/// ```json
/// {
///   "error": { "message": "No data supplied in request body." }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<Command>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

impl Response {
    pub fn success(command: Command, result: Value) -> Self {
        Self {
            command: Some(command),
            result: Some(result),
            error: None,
        }
    }

    pub fn error(error: ErrorResponse) -> Self {
        Self {
            command: None,
            result: None,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn grade_is_an_alias_for_eval() {
        assert_eq!(Command::from_header("grade"), Some(Command::Eval));
        assert_eq!(Command::from_header("eval"), Some(Command::Eval));
        assert_eq!(Command::from_header("docs-user"), None);
        assert_eq!(Command::from_header("EVAL"), None);
    }

    #[test]
    fn success_serializes_without_error_key() {
        let response = Response::success(Command::Eval, json!({"is_correct": true}));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"command": "eval", "result": {"is_correct": true}})
        );
    }

    #[test]
    fn error_serializes_only_error_key() {
        let response = Response::error(
            ErrorResponse::new("Request body is not valid JSON.").with_field("error_thrown", "bad"),
        );
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"error": {"message": "Request body is not valid JSON.", "error_thrown": "bad"}})
        );
    }

    #[test]
    fn from_dict_lifts_message() {
        let dict = json!({"message": "Could not parse", "culprit": "x^"})
            .as_object()
            .cloned()
            .unwrap();
        let error = ErrorResponse::from_dict(dict);

        assert_eq!(error.message, "Could not parse");
        assert_eq!(error.fields.get("culprit"), Some(&json!("x^")));
        assert!(!error.fields.contains_key("message"));
    }
}
