//!
//! Traits Module
//!
//! The pluggable capabilities the grader runs against.
//!
//! - [`evaluation`]: grades a response against an answer.
//! - [`preview`]: renders a response back to the requester without grading it.

pub mod evaluation;
pub mod preview;
