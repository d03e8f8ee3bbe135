//! JSON rendering of a remediation, for machine consumers.

use serde::Serialize;

use crate::diff::{Diagnostic, Remediation, RemediationEntry};

#[derive(Serialize)]
struct Report {
    lines: Vec<RemediationEntry>,
    diagnostics: Vec<Diagnostic>,
}

/// Serialize the remediation as a pretty-printed JSON report: flattened
/// per-line entries plus any diagnostics.
pub fn to_json(remediation: &Remediation) -> serde_json::Result<String> {
    let report = Report {
        lines: remediation.entries(),
        diagnostics: remediation.diagnostics().to_vec(),
    };
    serde_json::to_string_pretty(&report)
}
