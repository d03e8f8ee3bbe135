use std::collections::HashMap;

use serde::Serialize;

use crate::tree::{ConfigTree, NodeId};

/// Operation a remediation line performs on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    Add,
    Remove,
}

/// Diagnostic conditions surfaced by the differ. These indicate malformed
/// input rather than a failed diff; the result is still produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// More than one line claims the same idempotent single-value slot.
    AmbiguousIdempotentMatch {
        path: Vec<String>,
        candidates: Vec<String>,
    },
}

/// The ordered command sequence transforming one configuration into another.
///
/// A remediation is a [`ConfigTree`] whose nodes carry an operation tag.
/// Nodes without a tag are unchanged context lines kept to reach nested
/// changes. Origin links point back at the node in the source walk that
/// produced a line; they serve diagnostics and ordering only.
#[derive(Debug, Clone, Default)]
pub struct Remediation {
    tree: ConfigTree,
    ops: HashMap<NodeId, Op>,
    origins: HashMap<NodeId, NodeId>,
    diagnostics: Vec<Diagnostic>,
}

impl Remediation {
    pub(crate) fn tree_mut(&mut self) -> &mut ConfigTree {
        &mut self.tree
    }

    pub(crate) fn set_op(&mut self, id: NodeId, op: Op) {
        self.ops.entry(id).or_insert(op);
    }

    pub(crate) fn set_origin(&mut self, id: NodeId, origin: NodeId) {
        self.origins.insert(id, origin);
    }

    pub(crate) fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        if !self.diagnostics.contains(&diagnostic) {
            self.diagnostics.push(diagnostic);
        }
    }

    /// The remediation command tree. Each node's text is the literal command
    /// to issue, already negated for removals.
    pub fn config(&self) -> &ConfigTree {
        &self.tree
    }

    /// Operation tag for a node; `None` for unchanged context lines.
    pub fn op(&self, id: NodeId) -> Option<Op> {
        self.ops.get(&id).copied()
    }

    /// Node in the source walk a line originated from, if recorded.
    pub fn origin(&self, id: NodeId) -> Option<NodeId> {
        self.origins.get(&id).copied()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// True when the two configurations were already equivalent.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Flatten the remediation into serializable per-line entries, preorder.
    pub fn entries(&self) -> Vec<RemediationEntry> {
        self.tree
            .all_nodes()
            .map(|id| RemediationEntry {
                depth: self.tree.depth(id),
                path: self
                    .tree
                    .ancestor_path(id)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                text: self.tree.text(id).to_string(),
                op: self.op(id),
                comments: self.tree.comments(id).iter().cloned().collect(),
                tags: self.tree.tags(id).iter().cloned().collect(),
            })
            .collect()
    }
}

/// One remediation line in flattened form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemediationEntry {
    pub depth: usize,
    pub path: Vec<String>,
    pub text: String,
    pub op: Option<Op>,
    pub comments: Vec<String>,
    pub tags: Vec<String>,
}
