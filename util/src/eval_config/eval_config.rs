use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Request-level parameters handed to the evaluation function unchanged.
pub type Params = Map<String, Value>;

/// Key under which fallback cases are supplied in the request params.
pub const CASES_KEY: &str = "cases";

/// Per-case flag asking for the evaluator's own feedback to be appended to the case feedback.
pub const OVERRIDE_EVAL_FEEDBACK_KEY: &str = "override_eval_feedback";

/// How a list of cases is searched for a match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Evaluate every case, report the first match and warn when several matched.
    #[default]
    FirstOfAll,
    /// Stop at the first matching case.
    ShortCircuit,
}

impl MatchPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchPolicy::FirstOfAll => "first_of_all",
            MatchPolicy::ShortCircuit => "short_circuit",
        }
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "first_of_all" | "all" => Ok(MatchPolicy::FirstOfAll),
            "short_circuit" | "first" => Ok(MatchPolicy::ShortCircuit),
            other => Err(format!("Unknown case match policy '{other}'")),
        }
    }
}

/// Layers `overrides` on top of `base`, one level deep.
///
/// Keys present in `overrides` replace the value in `base` wholesale; nested
/// objects are not merged.
pub fn layer_params(base: &Params, overrides: &Params) -> Params {
    let mut merged = base.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Truthiness of a JSON value: `false`, `null`, zero, and empty strings,
/// arrays or objects are falsy; everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}
