//! # Built-in Capabilities
//!
//! Default implementations used when the integrator does not plug in their own.
//!
//! - [`exact`]: marks a response correct when it equals the answer exactly.
//! - [`echo`]: previews a response by echoing it back.

pub mod echo;
pub mod exact;

pub use echo::EchoPreview;
pub use exact::ExactEvaluation;
