pub mod eval_config;

pub use eval_config::{
    CASES_KEY, MatchPolicy, OVERRIDE_EVAL_FEEDBACK_KEY, Params, is_truthy, layer_params,
};
