//! # Types Module
//!
//! Core data structures passed between the evaluation function, the case
//! machinery and the caller.
//!
//! - [`EvaluationResult`]: what an evaluation function returns, and what the job hands back.
//! - [`Case`]: one fallback answer/feedback pair taken from `params.cases`.
//! - [`CaseWarning`]: a non-fatal diagnostic attached to the result.
//! - [`CaseResult`], [`MatchOutcome`], [`Resolution`]: intermediate values of case resolution.

use crate::error::{EvaluationException, UNSTRUCTURED_FAULT_MESSAGE};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use util::eval_config::{OVERRIDE_EVAL_FEEDBACK_KEY, Params, is_truthy};

/// Result of grading a response.
///
/// Fields other than the ones listed here are carried through untouched in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    /// Index of the case whose feedback was used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_case: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<CaseWarning>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EvaluationResult {
    pub fn new(is_correct: bool) -> Self {
        Self {
            is_correct: Some(is_correct),
            ..Self::default()
        }
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }

    /// Attach an opaque field that the grader passes through unchanged.
    ///
    /// The named keys (`is_correct`, `feedback`, `matched_case`, `warnings`)
    /// set their field instead, so no key is ever serialized twice. A value of
    /// the wrong shape clears that field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        match key.as_str() {
            "is_correct" => self.is_correct = value.as_bool(),
            "feedback" => {
                self.feedback = match value {
                    Value::String(feedback) => Some(feedback),
                    Value::Null => None,
                    other => Some(other.to_string()),
                }
            }
            "matched_case" => {
                self.matched_case = value.as_u64().and_then(|id| usize::try_from(id).ok())
            }
            "warnings" => self.warnings = serde_json::from_value(value).unwrap_or_default(),
            _ => {
                self.extra.insert(key, value);
            }
        }
        self
    }
}

/// Result of a preview call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewResult {
    pub preview: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of `params.cases`, read leniently.
///
/// `answer` and `feedback` are `Some` whenever the key is present, even if its
/// value is `null`; a case missing either of them never takes part in matching.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Case {
    pub answer: Option<Value>,
    pub feedback: Option<String>,
    pub mark: Option<Value>,
    pub params: Option<Value>,
}

impl Case {
    /// Reads a case from a raw JSON entry. Entries that are not objects yield an empty case.
    pub fn from_value(raw: &Value) -> Self {
        let Some(fields) = raw.as_object() else {
            return Self::default();
        };

        Self {
            answer: fields.get("answer").cloned(),
            feedback: fields.get("feedback").map(|feedback| match feedback {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            }),
            mark: fields.get("mark").cloned(),
            params: fields.get("params").cloned(),
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.answer.is_some() && self.feedback.is_some()
    }

    /// The case's own params, or `None` when the entry holds something other than an object.
    /// A missing or `null` entry counts as no params.
    pub fn case_params(&self) -> Option<Params> {
        match &self.params {
            None | Some(Value::Null) => Some(Params::new()),
            Some(Value::Object(fields)) => Some(fields.clone()),
            Some(_) => None,
        }
    }

    /// Whether the evaluator's own feedback should be appended to this case's feedback.
    pub fn overrides_eval_feedback(&self) -> bool {
        self.params
            .as_ref()
            .and_then(|params| params.get(OVERRIDE_EVAL_FEEDBACK_KEY))
            .is_some_and(is_truthy)
    }
}

/// A non-fatal diagnostic attached to an evaluation result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseWarning {
    /// Index of the offending case; absent for warnings about the case list as a whole.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case: Option<usize>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CaseWarning {
    pub fn for_case(index: usize, message: impl Into<String>) -> Self {
        Self {
            case: Some(index),
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn aggregate(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_detail(mut self, detail: impl Into<Value>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Warning for an unstructured fault raised while testing a case.
    pub fn unstructured(index: usize, detail: impl Into<String>) -> Self {
        Self::for_case(index, UNSTRUCTURED_FAULT_MESSAGE).with_detail(detail.into())
    }

    /// Warning carrying a structured fault's fields, flattened beside the case index.
    pub fn from_exception(index: usize, exc: &EvaluationException) -> Self {
        let mut warning = Self::for_case(index, exc.message.clone());
        for (key, value) in &exc.fields {
            match key.as_str() {
                "case" => {}
                "detail" => warning.detail = Some(value.clone()),
                _ => {
                    warning.extra.insert(key.clone(), value.clone());
                }
            }
        }
        warning
    }
}

/// Outcome of testing a single case. Consumed immediately by the resolution loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseResult {
    pub is_correct: bool,
    pub feedback: String,
    pub warning: Option<CaseWarning>,
}

impl CaseResult {
    pub fn matched(is_correct: bool, feedback: impl Into<String>) -> Self {
        Self {
            is_correct,
            feedback: feedback.into(),
            warning: None,
        }
    }

    pub fn warned(warning: CaseWarning) -> Self {
        Self {
            warning: Some(warning),
            ..Self::default()
        }
    }
}

/// The case selected for feedback, independent of the input case list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Position of the case in `params.cases`.
    pub id: usize,
    /// Feedback to report, already combined with the evaluator's feedback when requested.
    pub feedback: String,
    /// Correctness forced by the case's `mark`.
    pub mark: Option<bool>,
}

/// Everything case resolution produced for one evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub matched: Option<MatchOutcome>,
    pub warnings: Vec<CaseWarning>,
}
