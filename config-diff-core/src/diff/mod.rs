//! Configuration comparison and its result types.

mod engine;
mod result;

pub use engine::compare;
pub use result::{Diagnostic, Op, Remediation, RemediationEntry};
