use crate::error::EvaluationError;
use crate::traits::preview::PreviewFunction;
use crate::types::PreviewResult;
use serde_json::Value;
use util::eval_config::Params;

/// Previews a response by returning it unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoPreview;

impl PreviewFunction for EchoPreview {
    fn preview(&self, response: &Value, _params: &Params) -> Result<PreviewResult, EvaluationError> {
        Ok(PreviewResult {
            preview: response.clone(),
            ..PreviewResult::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn echoes_response_as_preview() {
        let result = EchoPreview.preview(&json!("x + 1"), &Params::new()).unwrap();
        assert_eq!(serde_json::to_value(result).unwrap(), json!({"preview": "x + 1"}));
    }
}
