//! Remediation engine: derives the ordered command sequence that transforms
//! a running configuration into a target configuration under a rule set.
//!
//! Known modeling gaps, documented rather than fixed: negating a single
//! entry of a sequence-numbered access list does not generate a per-entry
//! negation, and idempotency is not checked inside multi-line structured
//! bodies such as ACL entries.

use crate::diff::result::{Diagnostic, Op, Remediation};
use crate::rules::RuleSet;
use crate::tree::{ConfigTree, NodeId};

/// Compare two configurations and produce the remediation tree.
///
/// Deterministic: identical inputs and rules always yield a structurally
/// identical result. Total over validated inputs; diagnostic conditions are
/// recorded on the result instead of failing.
pub fn compare(running: &ConfigTree, target: &ConfigTree, rules: &RuleSet) -> Remediation {
    let ctx = Ctx {
        running,
        target,
        rules,
    };
    let mut out = Remediation::default();
    let mut path = Vec::new();
    diff_level(&ctx, &mut out, None, None, None, &mut path);
    apply_order_weights(&mut out, rules);
    insert_exit_markers(&mut out, rules, running);
    out
}

struct Ctx<'a> {
    running: &'a ConfigTree,
    target: &'a ConfigTree,
    rules: &'a RuleSet,
}

fn joined<'a>(level_path: &'a [String], text: &'a str) -> Vec<&'a str> {
    let mut path: Vec<&str> = level_path.iter().map(String::as_str).collect();
    path.push(text);
    path
}

fn diff_level(
    ctx: &Ctx<'_>,
    out: &mut Remediation,
    r_parent: Option<NodeId>,
    t_parent: Option<NodeId>,
    out_parent: Option<NodeId>,
    path: &mut Vec<String>,
) {
    removals(ctx, out, r_parent, t_parent, out_parent, path);
    additions(ctx, out, r_parent, t_parent, out_parent, path);
}

/// Lines present in running but not in target: negate, unless a target
/// sibling claims the same idempotent slot and supersedes the old value.
fn removals(
    ctx: &Ctx<'_>,
    out: &mut Remediation,
    r_parent: Option<NodeId>,
    t_parent: Option<NodeId>,
    out_parent: Option<NodeId>,
    path: &[String],
) {
    for &rc in ctx.running.children(r_parent) {
        let text = ctx.running.text(rc);
        if ctx.target.child_by_text(t_parent, text).is_some() {
            continue;
        }
        let child_path = joined(path, text);
        if let Some(idx) = ctx.rules.idempotent_rule_index(&child_path) {
            let superseded = ctx
                .target
                .children(t_parent)
                .iter()
                .any(|&tc| claims_slot(ctx, idx, path, ctx.target.text(tc)));
            if superseded {
                continue;
            }
        }
        let Some(negated) = ctx.rules.negation_for(&child_path, text) else {
            // no_negation rule: leave the line alone
            continue;
        };
        let node = out.tree_mut().add_child(out_parent, &negated);
        out.set_op(node, Op::Remove);
        out.set_origin(node, rc);
        let dropped = ctx.running.descendants(rc).count();
        if dropped > 0 {
            out.tree_mut()
                .add_comment(node, format!("removes {} lines", dropped + 1));
        }
    }
}

/// Lines present in target: recurse where both sides have the line, emit the
/// whole subtree where only target has it.
fn additions(
    ctx: &Ctx<'_>,
    out: &mut Remediation,
    r_parent: Option<NodeId>,
    t_parent: Option<NodeId>,
    out_parent: Option<NodeId>,
    path: &mut Vec<String>,
) {
    for &tc in ctx.target.children(t_parent) {
        let text = ctx.target.text(tc).to_string();

        if let Some(rc) = ctx.running.child_by_text(r_parent, &text) {
            // unchanged at this level; nested differences may still exist
            let node = out.tree_mut().add_child(out_parent, &text);
            path.push(text);
            diff_level(ctx, out, Some(rc), Some(tc), Some(node), path);
            path.pop();
            if out.config().children(Some(node)).is_empty() && out.op(node).is_none() {
                out.tree_mut().remove(node);
            }
            continue;
        }

        let child_path = joined(path, &text);
        if let Some(idx) = ctx.rules.idempotent_rule_index(&child_path) {
            let candidates: Vec<NodeId> = ctx
                .running
                .children(r_parent)
                .iter()
                .copied()
                .filter(|&rc| claims_slot(ctx, idx, path, ctx.running.text(rc)))
                .collect();
            if !candidates.is_empty() {
                let claimants = ctx
                    .target
                    .children(t_parent)
                    .iter()
                    .filter(|&&other| claims_slot(ctx, idx, path, ctx.target.text(other)))
                    .count();
                if candidates.len() > 1 || claimants > 1 {
                    out.push_diagnostic(Diagnostic::AmbiguousIdempotentMatch {
                        path: child_path.iter().map(|s| s.to_string()).collect(),
                        candidates: candidates
                            .iter()
                            .map(|&rc| ctx.running.text(rc).to_string())
                            .collect(),
                    });
                }
                // the new value supersedes the old one on-device; no paired
                // removal is emitted
                add_subtree(out, out_parent, ctx.target, tc);
                continue;
            }
        }

        let node = add_subtree(out, out_parent, ctx.target, tc);
        if !ctx.target.children(Some(tc)).is_empty() {
            out.tree_mut().add_comment(node, "new section");
        }
    }
}

fn claims_slot(ctx: &Ctx<'_>, rule_index: usize, level_path: &[String], text: &str) -> bool {
    ctx.rules.idempotent_rule_index(&joined(level_path, text)) == Some(rule_index)
}

fn add_subtree(
    out: &mut Remediation,
    parent: Option<NodeId>,
    src: &ConfigTree,
    src_id: NodeId,
) -> NodeId {
    let node = out.tree_mut().add_shallow_copy_of(parent, src, src_id);
    out.set_op(node, Op::Add);
    out.set_origin(node, src_id);
    for &child in src.children(Some(src_id)) {
        add_subtree(out, Some(node), src, child);
    }
    node
}

/// Assign ordering-rule weights to remediation lines and stable-sort each
/// sibling list. Ties keep original emission order.
fn apply_order_weights(out: &mut Remediation, rules: &RuleSet) {
    let ids: Vec<NodeId> = out.config().all_nodes().collect();
    for id in ids {
        let path: Vec<String> = out
            .config()
            .ancestor_path(id)
            .into_iter()
            .map(str::to_string)
            .collect();
        if let Some(weight) = rules.ordering_weight(&path) {
            out.tree_mut().set_order_weight(id, weight);
        }
    }
    out.tree_mut().sort_by_order_weight();
}

/// Append explicit exit-marker commands where a sectional_exiting rule
/// matches: as the last child of a modified or added section, and as the
/// following sibling of a section removal line. Runs after the ordering
/// sort so markers stay in closing position.
fn insert_exit_markers(out: &mut Remediation, rules: &RuleSet, running: &ConfigTree) {
    let ids: Vec<NodeId> = out.config().all_nodes().collect();
    for id in ids {
        if out.op(id) == Some(Op::Remove) {
            let Some(origin) = out.origin(id) else {
                continue;
            };
            let path: Vec<String> = running
                .ancestor_path(origin)
                .into_iter()
                .map(str::to_string)
                .collect();
            if let Some(exit_text) = rules.sectional_exit_for(&path).map(str::to_string) {
                let marker = out.tree_mut().insert_sibling_after(id, &exit_text);
                out.set_op(marker, Op::Add);
            }
        } else {
            if out.config().children(Some(id)).is_empty() {
                continue;
            }
            let path: Vec<String> = out
                .config()
                .ancestor_path(id)
                .into_iter()
                .map(str::to_string)
                .collect();
            if let Some(exit_text) = rules.sectional_exit_for(&path).map(str::to_string) {
                let marker = out.tree_mut().add_child(Some(id), &exit_text);
                out.set_op(marker, Op::Add);
            }
        }
    }
}
