//! Output renderings of a remediation.

pub mod json;
pub mod text;

pub use json::to_json;
pub use text::{format_commands, format_marked, format_summary};
