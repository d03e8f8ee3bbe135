//! Future-config projection: predict the configuration state a device will
//! hold after a remediation is applied, without touching the device.
//!
//! The quality of the prediction depends on how well the rule set is tuned;
//! idempotency rules matter most. Applied change lines come first in sibling
//! order, untouched running lines are appended after them.

use std::collections::HashSet;

use crate::diff::{compare, Remediation};
use crate::rules::RuleSet;
use crate::tree::{ConfigTree, NodeId};

/// Predict the configuration resulting from applying `remediation` to
/// `running`. Produces a new, independent tree; never mutates its inputs.
pub fn predict(running: &ConfigTree, remediation: &Remediation, rules: &RuleSet) -> ConfigTree {
    predict_config(running, remediation.config(), rules)
}

/// [`predict`] over a plain change tree, for remediations loaded from text.
pub fn predict_config(running: &ConfigTree, change: &ConfigTree, rules: &RuleSet) -> ConfigTree {
    let mut future = ConfigTree::new();
    let mut path = Vec::new();
    project_level(running, None, change, None, rules, &mut future, None, &mut path);
    future
}

/// Compare-then-predict convenience: the future config of `running` once it
/// has been remediated toward `target`.
pub fn predict_from_target(
    running: &ConfigTree,
    target: &ConfigTree,
    rules: &RuleSet,
) -> ConfigTree {
    predict(running, &compare(running, target, rules), rules)
}

/// Remediation that reverses a previously applied change: the differ run in
/// the opposite direction. No separate algorithm.
pub fn rollback(future: &ConfigTree, running: &ConfigTree, rules: &RuleSet) -> Remediation {
    compare(future, running, rules)
}

#[allow(clippy::too_many_arguments)]
fn project_level(
    running: &ConfigTree,
    r_parent: Option<NodeId>,
    change: &ConfigTree,
    c_parent: Option<NodeId>,
    rules: &RuleSet,
    future: &mut ConfigTree,
    f_parent: Option<NodeId>,
    path: &mut Vec<String>,
) {
    let mut consumed: HashSet<NodeId> = HashSet::new();
    let mut ignored: HashSet<NodeId> = HashSet::new();

    // Custom negations: a change line may be the negate_with replacement for
    // a running line rather than a literal command to keep.
    for &rc in running.children(r_parent) {
        let rc_path = child_path(path, running.text(rc));
        if let Some(replacement) = rules.negate_with_for(&rc_path) {
            if let Some(cc) = change.child_by_text(c_parent, replacement) {
                consumed.insert(rc);
                ignored.insert(cc);
            }
        }
    }

    for &cc in change.children(c_parent) {
        if ignored.contains(&cc) {
            continue;
        }
        let text = change.text(cc).to_string();

        // exit markers close a section; they are not configuration state
        if rules.sectional_exit_for(path) == Some(text.as_str()) {
            continue;
        }

        let cc_path = child_path(path, &text);
        if let Some(idx) = rules.idempotent_rule_index(&cc_path) {
            let victim = running
                .children(r_parent)
                .iter()
                .copied()
                .filter(|rc| !consumed.contains(rc))
                .find(|&rc| {
                    rules.idempotent_rule_index(&child_path(path, running.text(rc))) == Some(idx)
                });
            if let Some(rc) = victim {
                consumed.insert(rc);
                copy_change_subtree(future, f_parent, change, cc, rules, path);
                continue;
            }
        }

        if let Some(rc) = running.child_by_text(r_parent, &text) {
            if !consumed.contains(&rc) {
                consumed.insert(rc);
                let node = future.add_shallow_copy_of(f_parent, running, rc);
                path.push(text);
                project_level(
                    running,
                    Some(rc),
                    change,
                    Some(cc),
                    rules,
                    future,
                    Some(node),
                    path,
                );
                path.pop();
                continue;
            }
        }

        if let Some(unnegated) = text.strip_prefix(rules.negation_token()) {
            if let Some(rc) = running.child_by_text(r_parent, unnegated) {
                // the change removes this running line and its subtree
                consumed.insert(rc);
            } else {
                // "no ..." lines with nothing to remove persist as state
                future.add_shallow_copy_of(f_parent, change, cc);
            }
            continue;
        }

        // applying X where running holds "no X" cancels both
        let negated_form = format!("{}{}", rules.negation_token(), text);
        if let Some(rc) = running.child_by_text(r_parent, &negated_form) {
            consumed.insert(rc);
            continue;
        }

        copy_change_subtree(future, f_parent, change, cc, rules, path);
    }

    // running lines untouched by the change carry over unchanged
    for &rc in running.children(r_parent) {
        if !consumed.contains(&rc) {
            future.add_deep_copy_of(f_parent, running, rc);
        }
    }
}

/// Deep-copy a change subtree into the future config, dropping exit-marker
/// lines. Change trees produced by the differ carry them; applied state
/// does not.
fn copy_change_subtree(
    future: &mut ConfigTree,
    f_parent: Option<NodeId>,
    change: &ConfigTree,
    src: NodeId,
    rules: &RuleSet,
    path: &[String],
) {
    let node = future.add_shallow_copy_of(f_parent, change, src);
    let section_path = child_path(path, change.text(src));
    for &child in change.children(Some(src)) {
        if rules.sectional_exit_for(&section_path) == Some(change.text(child)) {
            continue;
        }
        copy_change_subtree(future, Some(node), change, child, rules, &section_path);
    }
}

fn child_path(level_path: &[String], text: &str) -> Vec<String> {
    let mut path = level_path.to_vec();
    path.push(text.to_string());
    path
}
