//! Reading a case's `mark`.
//!
//! A mark is read as an integer and then as a boolean: zero is incorrect, any
//! other integer is correct. Booleans, whole numbers, floats (truncated) and
//! integer strings are accepted; strings may carry surrounding whitespace, a
//! sign and `_` digit separators.

use serde_json::Value;

/// Returns the correctness a mark forces, or `None` when the mark is not an integer.
pub fn mark_as_correctness(mark: &Value) -> Option<bool> {
    match mark {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i != 0)
            } else if let Some(u) = n.as_u64() {
                Some(u != 0)
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() != 0.0)
            }
        }
        Value::String(s) => integer_string_is_nonzero(s),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn integer_string_is_nonzero(raw: &str) -> Option<bool> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix('+')
        .or_else(|| trimmed.strip_prefix('-'))
        .unwrap_or(trimmed);

    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
        return None;
    }

    let mut nonzero = false;
    for c in digits.chars() {
        match c {
            '0' | '_' => {}
            '1'..='9' => nonzero = true,
            _ => return None,
        }
    }
    Some(nonzero)
}
