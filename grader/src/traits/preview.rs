//! # Preview Function Trait
//!
//! [`PreviewFunction`] is the sibling of
//! [`EvaluationFunction`](crate::traits::evaluation::EvaluationFunction): same shape, minus the answer.

use crate::error::EvaluationError;
use crate::types::PreviewResult;
use serde_json::Value;
use std::sync::Arc;
use util::eval_config::Params;

pub trait PreviewFunction: Send + Sync {
    fn preview(&self, response: &Value, params: &Params) -> Result<PreviewResult, EvaluationError>;
}

impl<T: PreviewFunction + ?Sized> PreviewFunction for Arc<T> {
    fn preview(&self, response: &Value, params: &Params) -> Result<PreviewResult, EvaluationError> {
        (**self).preview(response, params)
    }
}

/// A [`PreviewFunction`] backed by a closure. Build one with [`preview_fn`].
pub struct FnPreview<F>(F);

impl<F> PreviewFunction for FnPreview<F>
where
    F: Fn(&Value, &Params) -> Result<PreviewResult, EvaluationError> + Send + Sync,
{
    fn preview(&self, response: &Value, params: &Params) -> Result<PreviewResult, EvaluationError> {
        (self.0)(response, params)
    }
}

pub fn preview_fn<F>(f: F) -> FnPreview<F>
where
    F: Fn(&Value, &Params) -> Result<PreviewResult, EvaluationError> + Send + Sync,
{
    FnPreview(f)
}
