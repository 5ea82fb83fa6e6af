pub mod config;
pub mod eval_config;
