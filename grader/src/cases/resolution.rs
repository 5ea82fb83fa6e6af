//! Case resolution: find the case that matches a response.
//!
//! Cases are tested strictly in input order. Which cases get tested depends on
//! the [`MatchPolicy`]:
//!
//! - [`MatchPolicy::FirstOfAll`] tests every case. The first match supplies the
//!   feedback; if more than one case matched, a single aggregate warning listing
//!   the matching indices (in the order found) is appended after all per-case warnings.
//! - [`MatchPolicy::ShortCircuit`] stops at the first match, so the aggregate
//!   warning never fires and later cases are never tested.
//!
//! Resolution borrows its inputs and returns a fresh [`Resolution`]; the case
//! list is never modified.

use super::case_evaluator::evaluate_case;
use super::mark::mark_as_correctness;
use crate::error::GraderError;
use crate::traits::evaluation::EvaluationFunction;
use crate::types::{Case, CaseWarning, MatchOutcome, Resolution};
use serde_json::Value;
use util::eval_config::{MatchPolicy, Params};

/// Separator placed between a case's feedback and the evaluator's feedback.
pub const FEEDBACK_SEPARATOR: &str = "<br />";

/// Runs every relevant case and selects the match.
///
/// # Errors
/// Returns [`GraderError::InvalidMark`] when the matched case carries a `mark`
/// that cannot be read as an integer. Faults while testing cases are never errors.
pub fn resolve_cases(
    evaluator: &dyn EvaluationFunction,
    response: &Value,
    params: &Params,
    cases: &[Case],
    policy: MatchPolicy,
) -> Result<Resolution, GraderError> {
    let mut matches: Vec<(usize, String)> = Vec::new();
    let mut warnings: Vec<CaseWarning> = Vec::new();

    for (index, case) in cases.iter().enumerate() {
        let result = evaluate_case(evaluator, response, params, case, index);

        if let Some(warning) = result.warning {
            warnings.push(warning);
        }

        if result.is_correct {
            matches.push((index, result.feedback));
            if policy == MatchPolicy::ShortCircuit {
                break;
            }
        }
    }

    let Some((id, eval_feedback)) = matches.first() else {
        return Ok(Resolution {
            matched: None,
            warnings,
        });
    };

    let case = &cases[*id];
    let mark = match &case.mark {
        Some(raw) => Some(mark_as_correctness(raw).ok_or_else(|| GraderError::InvalidMark {
            case: *id,
            value: raw.clone(),
        })?),
        None => None,
    };

    let outcome = MatchOutcome {
        id: *id,
        feedback: combine_feedback(case, eval_feedback),
        mark,
    };

    if matches.len() > 1 {
        let ids = matches
            .iter()
            .map(|(index, _)| index.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        warnings.push(CaseWarning::aggregate(format!(
            "Cases {ids} were matched. Only the first one's feedback was returned"
        )));
    }

    Ok(Resolution {
        matched: Some(outcome),
        warnings,
    })
}

/// Feedback reported for a matched case.
///
/// With `override_eval_feedback` set, non-empty evaluator feedback is appended
/// after [`FEEDBACK_SEPARATOR`]. The separator only appears between two
/// non-empty parts. Otherwise the case feedback is used verbatim.
fn combine_feedback(case: &Case, eval_feedback: &str) -> String {
    let case_feedback = case.feedback.clone().unwrap_or_default();

    if !case.overrides_eval_feedback() || eval_feedback.is_empty() {
        return case_feedback;
    }

    if case_feedback.is_empty() {
        eval_feedback.to_string()
    } else {
        format!("{case_feedback}{FEEDBACK_SEPARATOR}{eval_feedback}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::case_evaluator::MISSING_FIELDS_MESSAGE;
    use crate::error::EvaluationError;
    use crate::traits::evaluation::evaluation_fn;
    use crate::types::EvaluationResult;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cases(raw: Value) -> Vec<Case> {
        raw.as_array().unwrap().iter().map(Case::from_value).collect()
    }

    fn identity(response: &Value, answer: &Value, _params: &Params) -> Result<EvaluationResult, EvaluationError> {
        Ok(EvaluationResult::new(response == answer))
    }

    fn resolve(response: Value, raw: Value, policy: MatchPolicy) -> Resolution {
        resolve_cases(&evaluation_fn(identity), &response, &Params::new(), &cases(raw), policy).unwrap()
    }

    #[test]
    fn picks_the_single_matching_case() {
        let resolution = resolve(
            json!("yes"),
            json!([
                {"answer": "hello", "feedback": "f0"},
                {"answer": "yes", "feedback": "f1"},
                {"answer": "no", "feedback": "f2"}
            ]),
            MatchPolicy::FirstOfAll,
        );

        assert_eq!(
            resolution.matched,
            Some(MatchOutcome { id: 1, feedback: "f1".into(), mark: None })
        );
        assert!(resolution.warnings.is_empty());
    }

    #[test]
    fn no_match_keeps_warnings() {
        let resolution = resolve(
            json!("maybe"),
            json!([{"answer": "yes"}, {"answer": "no", "feedback": "f1"}]),
            MatchPolicy::FirstOfAll,
        );

        assert_eq!(resolution.matched, None);
        assert_eq!(resolution.warnings, vec![CaseWarning::for_case(0, MISSING_FIELDS_MESSAGE)]);
    }

    #[test]
    fn multiple_matches_warn_once_and_keep_the_first() {
        let resolution = resolve(
            json!("yes"),
            json!([
                {"answer": "yes", "feedback": "first"},
                {"answer": "no", "feedback": "miss"},
                {"answer": "yes", "feedback": "second"},
                {"answer": "yes", "feedback": "third"}
            ]),
            MatchPolicy::FirstOfAll,
        );

        let outcome = resolution.matched.unwrap();
        assert_eq!(outcome.id, 0);
        assert_eq!(outcome.feedback, "first");
        assert_eq!(
            resolution.warnings,
            vec![CaseWarning::aggregate(
                "Cases 0, 2, 3 were matched. Only the first one's feedback was returned"
            )]
        );
    }

    #[test]
    fn aggregate_warning_comes_after_case_warnings() {
        let resolution = resolve(
            json!("yes"),
            json!([
                {"answer": "yes", "feedback": "a"},
                {"feedback": "broken"},
                {"answer": "yes", "feedback": "b"}
            ]),
            MatchPolicy::FirstOfAll,
        );

        assert_eq!(resolution.warnings.len(), 2);
        assert_eq!(resolution.warnings[0].case, Some(1));
        assert_eq!(resolution.warnings[1].case, None);
        assert!(resolution.warnings[1].message.starts_with("Cases 0, 2 were matched."));
    }

    #[test]
    fn fault_in_one_case_does_not_stop_later_cases() {
        let flaky = evaluation_fn(|response, answer, _| {
            if answer == &json!("boom") {
                Err(EvaluationError::other("exploded"))
            } else {
                Ok(EvaluationResult::new(response == answer))
            }
        });

        let resolution = resolve_cases(
            &flaky,
            &json!("yes"),
            &Params::new(),
            &cases(json!([{"answer": "boom", "feedback": "f0"}, {"answer": "yes", "feedback": "f1"}])),
            MatchPolicy::FirstOfAll,
        )
        .unwrap();

        assert_eq!(resolution.matched.map(|m| m.id), Some(1));
        assert_eq!(resolution.warnings.len(), 1);
        assert_eq!(resolution.warnings[0].case, Some(0));
        assert_eq!(resolution.warnings[0].detail, Some(json!("exploded")));
    }

    #[test]
    fn short_circuit_stops_at_first_match() {
        let calls = AtomicUsize::new(0);
        let counting = evaluation_fn(|response, answer, _| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(EvaluationResult::new(response == answer))
        });

        let resolution = resolve_cases(
            &counting,
            &json!("yes"),
            &Params::new(),
            &cases(json!([
                {"answer": "no", "feedback": "f0"},
                {"answer": "yes", "feedback": "f1"},
                {"answer": "yes", "feedback": "f2"},
                {"feedback": "never tested"}
            ])),
            MatchPolicy::ShortCircuit,
        )
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(resolution.matched.map(|m| m.id), Some(1));
        assert!(resolution.warnings.is_empty());
    }

    #[test]
    fn override_appends_evaluator_feedback() {
        let chatty = evaluation_fn(|response, answer, _| {
            Ok(EvaluationResult::new(response == answer).with_feedback("Check your units."))
        });

        let resolution = resolve_cases(
            &chatty,
            &json!("5m"),
            &Params::new(),
            &cases(json!([{
                "answer": "5m",
                "feedback": "Close.",
                "params": {"override_eval_feedback": true}
            }])),
            MatchPolicy::FirstOfAll,
        )
        .unwrap();

        assert_eq!(resolution.matched.unwrap().feedback, "Close.<br />Check your units.");
    }

    #[test]
    fn override_without_evaluator_feedback_keeps_case_feedback() {
        let resolution = resolve(
            json!("a"),
            json!([{"answer": "a", "feedback": "Close.", "params": {"override_eval_feedback": true}}]),
            MatchPolicy::FirstOfAll,
        );
        assert_eq!(resolution.matched.unwrap().feedback, "Close.");
    }

    #[test]
    fn override_with_empty_case_feedback_omits_separator() {
        let chatty = evaluation_fn(|response, answer, _| {
            Ok(EvaluationResult::new(response == answer).with_feedback("Check units."))
        });

        let resolution = resolve_cases(
            &chatty,
            &json!("x"),
            &Params::new(),
            &cases(json!([{"answer": "x", "feedback": "", "params": {"override_eval_feedback": true}}])),
            MatchPolicy::FirstOfAll,
        )
        .unwrap();

        assert_eq!(resolution.matched.unwrap().feedback, "Check units.");
    }

    #[test]
    fn evaluator_feedback_ignored_without_override() {
        let chatty = evaluation_fn(|_, _, _| Ok(EvaluationResult::new(true).with_feedback("ignored")));

        let resolution = resolve_cases(
            &chatty,
            &json!("a"),
            &Params::new(),
            &cases(json!([{"answer": "a", "feedback": "verbatim"}])),
            MatchPolicy::FirstOfAll,
        )
        .unwrap();
        assert_eq!(resolution.matched.unwrap().feedback, "verbatim");
    }

    #[test]
    fn mark_is_read_from_matched_case() {
        let resolution = resolve(
            json!("a"),
            json!([{"answer": "a", "feedback": "f", "mark": "0"}]),
            MatchPolicy::FirstOfAll,
        );
        assert_eq!(resolution.matched.unwrap().mark, Some(false));
    }

    #[test]
    fn unreadable_mark_is_an_error() {
        let err = resolve_cases(
            &evaluation_fn(identity),
            &json!("a"),
            &Params::new(),
            &cases(json!([{"answer": "a", "feedback": "f", "mark": "full"}])),
            MatchPolicy::FirstOfAll,
        )
        .unwrap_err();

        assert!(matches!(err, GraderError::InvalidMark { case: 0, .. }));
    }

    #[test]
    fn unreadable_mark_on_unmatched_case_is_ignored() {
        let resolution = resolve(
            json!("b"),
            json!([{"answer": "a", "feedback": "f", "mark": "full"}, {"answer": "b", "feedback": "g"}]),
            MatchPolicy::FirstOfAll,
        );
        assert_eq!(resolution.matched.map(|m| m.id), Some(1));
    }

    #[test]
    fn resolving_twice_gives_the_same_outcome() {
        let list = cases(json!([
            {"answer": "x", "feedback": "fx", "params": {"override_eval_feedback": true}},
            {"answer": "y", "feedback": "fy"}
        ]));
        let chatty = evaluation_fn(|response, answer, _| {
            Ok(EvaluationResult::new(response == answer).with_feedback("more"))
        });

        let first = resolve_cases(&chatty, &json!("x"), &Params::new(), &list, MatchPolicy::FirstOfAll).unwrap();
        let second = resolve_cases(&chatty, &json!("x"), &Params::new(), &list, MatchPolicy::FirstOfAll).unwrap();

        assert_eq!(first, second);
        assert_eq!(list[0].feedback.as_deref(), Some("fx"));
    }
}
