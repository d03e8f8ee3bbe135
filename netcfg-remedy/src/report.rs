use colored::Colorize;
use config_diff_core::{format_marked, format_summary, Diagnostic, Remediation, RuleSet};

/// Render marked remediation lines for terminal output.
pub fn render_marked(remediation: &Remediation, rules: &RuleSet) -> String {
    let raw = format_marked(remediation, rules);
    let mut out = Vec::new();

    for line in raw.lines() {
        let colored = if line.starts_with('+') {
            line.green().to_string()
        } else if line.starts_with('-') {
            line.red().to_string()
        } else {
            line.to_string()
        };
        out.push(colored);
    }

    out.join("\n")
}

/// Render summary counts for terminal output.
pub fn render_summary(remediation: &Remediation) -> String {
    format_summary(remediation).cyan().to_string()
}

/// Render differ diagnostics, one warning line each.
pub fn render_diagnostics(diagnostics: &[Diagnostic]) -> String {
    let mut out = Vec::new();
    for diagnostic in diagnostics {
        let line = match diagnostic {
            Diagnostic::AmbiguousIdempotentMatch { path, candidates } => format!(
                "WARN ambiguous idempotent match at '{}': candidates {}",
                path.join(" / "),
                candidates.join(", ")
            ),
        };
        out.push(line.yellow().to_string());
    }
    out.join("\n")
}
