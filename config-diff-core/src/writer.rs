//! Rendering trees back to device-ready configuration text.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::rules::RuleSet;
use crate::tree::{ConfigTree, NodeId};

/// Errors raised while writing configuration text.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write {path}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Render `tree` as indented configuration text, one command per line.
/// Indentation width comes from the rule set.
pub fn write(tree: &ConfigTree, rules: &RuleSet) -> String {
    let mut out = String::new();
    render_level(tree, None, rules, false, &mut out);
    out
}

/// Like [`write`], but close every section a `sectional_exiting` rule knows
/// about with its exit command. This is the paste-ready form for devices
/// that need explicit section termination.
pub fn write_with_exits(tree: &ConfigTree, rules: &RuleSet) -> String {
    let mut out = String::new();
    render_level(tree, None, rules, true, &mut out);
    out
}

/// Render `tree` to a file.
pub fn write_file(
    tree: &ConfigTree,
    rules: &RuleSet,
    path: impl AsRef<Path>,
) -> Result<(), WriteError> {
    let path = path.as_ref();
    fs::write(path, write(tree, rules)).map_err(|source| WriteError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn render_level(
    tree: &ConfigTree,
    parent: Option<NodeId>,
    rules: &RuleSet,
    with_exits: bool,
    out: &mut String,
) {
    for &child in tree.children(parent) {
        let depth = tree.depth(child) - 1;
        let indent = " ".repeat(depth * rules.indentation());
        let _ = writeln!(out, "{indent}{}", tree.text(child));
        render_level(tree, Some(child), rules, with_exits, out);
        if with_exits && !tree.children(Some(child)).is_empty() {
            if let Some(exit_text) = rules.sectional_exit_for(&tree.ancestor_path(child)) {
                if tree.child_by_text(Some(child), exit_text).is_none() {
                    let _ = writeln!(out, "{indent}{exit_text}");
                }
            }
        }
    }
}
