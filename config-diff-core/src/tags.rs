//! Tagging and tag-based filtering. Both operations are pure: they return
//! independent trees and never mutate their input.

use crate::rules::TagRule;
use crate::tree::{ConfigTree, NodeId};

/// Return an annotated copy of `tree` with every tag rule applied. A rule
/// tags the node its matchers resolve to and all of that node's
/// descendants.
pub fn apply_tags(tree: &ConfigTree, rules: &[TagRule]) -> ConfigTree {
    let mut out = tree.clone();
    let ids: Vec<NodeId> = out.all_nodes().collect();
    for id in ids {
        let path: Vec<String> = out
            .ancestor_path(id)
            .into_iter()
            .map(str::to_string)
            .collect();
        for rule in rules {
            if rule.matches_path(&path) {
                tag_subtree(&mut out, id, rule.apply_tags());
            }
        }
    }
    out
}

fn tag_subtree(tree: &mut ConfigTree, id: NodeId, tags: &[String]) {
    let mut ids: Vec<NodeId> = vec![id];
    ids.extend(tree.descendants(id));
    for node in ids {
        for tag in tags {
            tree.add_tag(node, tag.clone());
        }
    }
}

/// Return the subset tree containing exactly the nodes that carry `tag` or
/// have a descendant carrying it. The ancestor chain to every retained node
/// is preserved, in original relative order.
pub fn filter_by_tag(tree: &ConfigTree, tag: &str) -> ConfigTree {
    let mut out = ConfigTree::new();
    filter_level(tree, None, tag, &mut out, None);
    out
}

fn filter_level(
    tree: &ConfigTree,
    parent: Option<NodeId>,
    tag: &str,
    out: &mut ConfigTree,
    out_parent: Option<NodeId>,
) {
    for &child in tree.children(parent) {
        if subtree_has_tag(tree, child, tag) {
            let copy = out.add_shallow_copy_of(out_parent, tree, child);
            filter_level(tree, Some(child), tag, out, Some(copy));
        }
    }
}

fn subtree_has_tag(tree: &ConfigTree, id: NodeId, tag: &str) -> bool {
    tree.tags(id).contains(tag) || tree.descendants(id).any(|d| tree.tags(d).contains(tag))
}
