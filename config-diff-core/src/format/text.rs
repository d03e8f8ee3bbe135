//! Plain-text renderings of a remediation.

use std::fmt::Write as _;

use crate::diff::{Op, Remediation};
use crate::rules::RuleSet;
use crate::writer;

/// Paste-ready command sequence, indented per the rule set. Exit markers
/// already sit in closing position inside the remediation tree, so this is
/// the literal text to feed a device session.
pub fn format_commands(remediation: &Remediation, rules: &RuleSet) -> String {
    writer::write(remediation.config(), rules)
}

/// Review form: every line prefixed with `+` for additions, `-` for
/// removals, and a space for unchanged context lines.
pub fn format_marked(remediation: &Remediation, rules: &RuleSet) -> String {
    let tree = remediation.config();
    let mut out = String::new();
    for id in tree.all_nodes() {
        let mark = match remediation.op(id) {
            Some(Op::Add) => '+',
            Some(Op::Remove) => '-',
            None => ' ',
        };
        let indent = " ".repeat((tree.depth(id) - 1) * rules.indentation());
        let _ = writeln!(out, "{mark} {indent}{}", tree.text(id));
    }
    out
}

/// One-line counts of additions, removals, and diagnostics.
pub fn format_summary(remediation: &Remediation) -> String {
    let tree = remediation.config();
    let mut adds = 0usize;
    let mut removes = 0usize;
    for id in tree.all_nodes() {
        match remediation.op(id) {
            Some(Op::Add) => adds += 1,
            Some(Op::Remove) => removes += 1,
            None => {}
        }
    }
    format!(
        "{adds} to add, {removes} to remove, {} diagnostics",
        remediation.diagnostics().len()
    )
}
