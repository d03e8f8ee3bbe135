use config_diff_core::{ConfigTree, NodeId};

/// Render a config tree with a configurable max depth. Tags show as a
/// trailing annotation so driver tag rules can be checked by eye.
pub fn render_tree(tree: &ConfigTree, max_depth: usize) -> String {
    let mut out = String::new();
    for &root in tree.children(None) {
        render_node(tree, root, 1, max_depth, &mut out);
    }
    out
}

fn render_node(tree: &ConfigTree, id: NodeId, depth: usize, max_depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth - 1);
    out.push_str(&indent);
    out.push_str(tree.text(id));
    if !tree.tags(id).is_empty() {
        let tags: Vec<&str> = tree.tags(id).iter().map(String::as_str).collect();
        out.push_str(&format!("  [{}]", tags.join(", ")));
    }
    out.push('\n');

    if depth >= max_depth {
        return;
    }
    for &child in tree.children(Some(id)) {
        render_node(tree, child, depth + 1, max_depth, out);
    }
}
