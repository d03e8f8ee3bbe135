use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

/// Handle to a node inside its owning [`ConfigTree`].
///
/// Ids are only meaningful against the tree that produced them; they are
/// never invalidated while the tree is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct NodeData {
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    tags: BTreeSet<String>,
    comments: BTreeSet<String>,
    order_weight: Option<i32>,
}

impl NodeData {
    fn new(text: String, parent: Option<NodeId>) -> Self {
        Self {
            text,
            parent,
            children: Vec::new(),
            tags: BTreeSet::new(),
            comments: BTreeSet::new(),
            order_weight: None,
        }
    }
}

/// A hierarchical configuration: a virtual root owning ordered top-level
/// command lines, each of which owns its sub-commands.
///
/// Nodes live in a flat table owned by the tree. Children are reached through
/// per-node index lists; the parent link is a plain index used only for
/// ancestor-path queries, never for ownership.
#[derive(Debug, Clone, Default)]
pub struct ConfigTree {
    nodes: Vec<NodeData>,
    roots: Vec<NodeId>,
}

impl ConfigTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes in the tree.
    pub fn len(&self) -> usize {
        self.all_nodes().count()
    }

    /// True when the tree holds no command lines.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Command text of a node.
    pub fn text(&self, id: NodeId) -> &str {
        &self.nodes[id.0].text
    }

    /// Parent of a node, `None` for top-level lines.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Ordered children of `parent`, or the top-level lines when `None`.
    pub fn children(&self, parent: Option<NodeId>) -> &[NodeId] {
        match parent {
            Some(id) => &self.nodes[id.0].children,
            None => &self.roots,
        }
    }

    /// Tags attached to a node.
    pub fn tags(&self, id: NodeId) -> &BTreeSet<String> {
        &self.nodes[id.0].tags
    }

    pub fn add_tag(&mut self, id: NodeId, tag: impl Into<String>) {
        self.nodes[id.0].tags.insert(tag.into());
    }

    /// Comments attached to a node.
    pub fn comments(&self, id: NodeId) -> &BTreeSet<String> {
        &self.nodes[id.0].comments
    }

    pub fn add_comment(&mut self, id: NodeId, comment: impl Into<String>) {
        self.nodes[id.0].comments.insert(comment.into());
    }

    /// Explicit ordering weight, if an ordering rule assigned one.
    pub fn order_weight(&self, id: NodeId) -> Option<i32> {
        self.nodes[id.0].order_weight
    }

    pub fn set_order_weight(&mut self, id: NodeId, weight: i32) {
        self.nodes[id.0].order_weight = Some(weight);
    }

    /// Distance from the virtual root; top-level lines are depth 1.
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestor_ids(id).len()
    }

    /// Add a child line under `parent`, merging with an existing sibling of
    /// identical text.
    pub fn add_child(&mut self, parent: Option<NodeId>, text: &str) -> NodeId {
        let text = text.trim();
        if let Some(existing) = self.child_by_text(parent, text) {
            return existing;
        }
        self.push_node(parent, text)
    }

    /// Add a child line under `parent` even when a sibling with the same
    /// text already exists. Callers gate this on a `duplicate_child_allowed`
    /// rule.
    pub fn add_child_duplicate(&mut self, parent: Option<NodeId>, text: &str) -> NodeId {
        self.push_node(parent, text.trim())
    }

    fn push_node(&mut self, parent: Option<NodeId>, text: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(text.to_string(), parent));
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// First child of `parent` with exactly this text.
    pub fn child_by_text(&self, parent: Option<NodeId>, text: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.nodes[c.0].text == text)
    }

    /// Insert a line at the given ancestor path, creating missing ancestors.
    /// Returns the node at the final path element.
    pub fn insert(&mut self, path: &[&str]) -> Option<NodeId> {
        let mut parent = None;
        for text in path {
            parent = Some(self.add_child(parent, text));
        }
        parent
    }

    /// Look up the node at the given ancestor path.
    pub fn find(&self, path: &[&str]) -> Option<NodeId> {
        let mut parent = None;
        for text in path {
            parent = Some(self.child_by_text(parent, text)?);
        }
        parent
    }

    fn ancestor_ids(&self, id: NodeId) -> Vec<NodeId> {
        let mut lineage = vec![id];
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            lineage.push(parent);
            current = parent;
        }
        lineage.reverse();
        lineage
    }

    /// Ordered command texts from the tree root down to and including `id`.
    pub fn ancestor_path(&self, id: NodeId) -> Vec<&str> {
        self.ancestor_ids(id)
            .into_iter()
            .map(|n| self.nodes[n.0].text.as_str())
            .collect()
    }

    /// Preorder traversal over every node. The iterator is lazy and can be
    /// restarted by calling this again.
    pub fn all_nodes(&self) -> Preorder<'_> {
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        stack.shrink_to_fit();
        Preorder { tree: self, stack }
    }

    /// Preorder traversal over the subtree rooted at `id`, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Preorder<'_> {
        let stack: Vec<NodeId> = self.nodes[id.0].children.iter().rev().copied().collect();
        Preorder { tree: self, stack }
    }

    /// Detach `id` and its subtree from the tree.
    pub fn remove(&mut self, id: NodeId) {
        match self.nodes[id.0].parent {
            Some(p) => self.nodes[p.0].children.retain(|&c| c != id),
            None => self.roots.retain(|&c| c != id),
        }
    }

    /// Insert a new line directly after `anchor` in its sibling list.
    pub fn insert_sibling_after(&mut self, anchor: NodeId, text: &str) -> NodeId {
        let parent = self.nodes[anchor.0].parent;
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(text.trim().to_string(), parent));
        let siblings = match parent {
            Some(p) => &mut self.nodes[p.0].children,
            None => &mut self.roots,
        };
        let pos = siblings
            .iter()
            .position(|&c| c == anchor)
            .map_or(siblings.len(), |i| i + 1);
        siblings.insert(pos, id);
        id
    }

    /// Copy the node `src` (text, tags, comments, weight) from `src_tree`
    /// under `parent`, without its children.
    pub fn add_shallow_copy_of(
        &mut self,
        parent: Option<NodeId>,
        src_tree: &ConfigTree,
        src: NodeId,
    ) -> NodeId {
        let id = self.add_child(parent, src_tree.text(src));
        let data = &src_tree.nodes[src.0];
        self.nodes[id.0].tags.extend(data.tags.iter().cloned());
        self.nodes[id.0].comments.extend(data.comments.iter().cloned());
        if self.nodes[id.0].order_weight.is_none() {
            self.nodes[id.0].order_weight = data.order_weight;
        }
        id
    }

    /// Copy the node `src` and its whole subtree from `src_tree` under
    /// `parent`. Returns the copy of `src`.
    pub fn add_deep_copy_of(
        &mut self,
        parent: Option<NodeId>,
        src_tree: &ConfigTree,
        src: NodeId,
    ) -> NodeId {
        let copy = self.add_shallow_copy_of(parent, src_tree, src);
        for &child in src_tree.children(Some(src)) {
            self.add_deep_copy_of(Some(copy), src_tree, child);
        }
        copy
    }

    /// Stable-sort every sibling list by ordering weight (unset counts as
    /// zero), preserving original relative order on ties.
    pub fn sort_by_order_weight(&mut self) {
        let weights: Vec<i32> = self
            .nodes
            .iter()
            .map(|n| n.order_weight.unwrap_or(0))
            .collect();
        self.roots.sort_by_key(|id| weights[id.0]);
        for data in &mut self.nodes {
            data.children.sort_by_key(|id| weights[id.0]);
        }
    }

    /// Structural and text equality, ignoring tags, comments, and weights.
    ///
    /// Sibling order is not significant: projection legitimately reorders
    /// siblings, so each level compares its children as a text-sorted set.
    pub fn structural_eq(&self, other: &ConfigTree) -> bool {
        self.level_eq(None, other, None)
    }

    fn level_eq(&self, a: Option<NodeId>, other: &ConfigTree, b: Option<NodeId>) -> bool {
        let mut left: Vec<NodeId> = self.children(a).to_vec();
        let mut right: Vec<NodeId> = other.children(b).to_vec();
        if left.len() != right.len() {
            return false;
        }
        left.sort_by(|&x, &y| self.text(x).cmp(self.text(y)));
        right.sort_by(|&x, &y| other.text(x).cmp(other.text(y)));
        left.iter().zip(right.iter()).all(|(&l, &r)| {
            self.text(l) == other.text(r) && self.level_eq(Some(l), other, Some(r))
        })
    }
}

/// Lazy preorder iterator over [`ConfigTree`] nodes.
pub struct Preorder<'a> {
    tree: &'a ConfigTree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.nodes[id.0].children.iter().rev().copied());
        Some(id)
    }
}

impl Display for ConfigTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for id in self.all_nodes() {
            let indent = "  ".repeat(self.depth(id) - 1);
            writeln!(f, "{indent}{}", self.text(id))?;
        }
        Ok(())
    }
}
