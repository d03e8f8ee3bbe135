//! Indentation-based configuration parsing, plus the line-oriented dump
//! format used to persist annotated trees.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rules::RuleSet;
use crate::tree::{ConfigTree, NodeId};

/// Errors raised while loading configuration text or dumps.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    /// A dump line's depth does not connect to the hierarchy built so far.
    #[error("malformed hierarchy at line {line}: depth {depth} cannot follow depth {max}")]
    MalformedHierarchy { line: usize, depth: usize, max: usize },
}

/// Parse raw configuration text into a tree.
///
/// Relative indentation alone determines nesting: a deeper-indented line is a
/// child of the nearest shallower line above it. Blank lines and comment
/// lines (`!`-prefixed) are dropped, line scrubs from `rules` are applied,
/// and internal whitespace is normalized. Text input cannot fail to parse.
pub fn parse(text: &str, rules: &RuleSet) -> ConfigTree {
    let mut tree = ConfigTree::new();
    // (indent, node) pairs from the root to the most recent line
    let mut stack: Vec<(usize, NodeId)> = Vec::new();

    for raw in text.lines() {
        let indent = raw.len() - raw.trim_start().len();
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('!') {
            continue;
        }
        let mut line = trimmed.to_string();
        for sub in rules.line_subs() {
            line = sub.search.replace_all(&line, sub.replace.as_str()).into_owned();
        }
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            continue;
        }

        while stack.last().is_some_and(|&(i, _)| i >= indent) {
            stack.pop();
        }
        let parent = stack.last().map(|&(_, id)| id);
        let node = add_line(&mut tree, parent, &line, rules);
        stack.push((indent, node));
    }

    strip_sectional_exits(&mut tree, rules);
    tree
}

/// Read and parse a configuration file.
pub fn parse_file(path: impl AsRef<Path>, rules: &RuleSet) -> Result<ConfigTree, ParseError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse(&text, rules))
}

fn add_line(tree: &mut ConfigTree, parent: Option<NodeId>, text: &str, rules: &RuleSet) -> NodeId {
    let parent_path: Vec<String> = match parent {
        Some(p) => tree.ancestor_path(p).iter().map(|s| s.to_string()).collect(),
        None => Vec::new(),
    };
    if rules.duplicates_allowed(&parent_path) {
        tree.add_child_duplicate(parent, text)
    } else {
        tree.add_child(parent, text)
    }
}

/// Drop leaf children that merely close their section. The exit command is
/// device punctuation, not configuration; the writer re-emits it on demand.
fn strip_sectional_exits(tree: &mut ConfigTree, rules: &RuleSet) {
    let sections: Vec<NodeId> = tree
        .all_nodes()
        .filter(|&id| !tree.children(Some(id)).is_empty())
        .collect();
    for section in sections {
        let Some(exit_text) = rules.sectional_exit_for(&tree.ancestor_path(section)) else {
            continue;
        };
        let exit_text = exit_text.to_string();
        let exits: Vec<NodeId> = tree
            .children(Some(section))
            .iter()
            .copied()
            .filter(|&c| tree.text(c) == exit_text && tree.children(Some(c)).is_empty())
            .collect();
        for exit in exits {
            tree.remove(exit);
        }
    }
}

/// One line of the persisted dump format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpLine {
    pub depth: usize,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
}

/// A serialized tree: preorder lines with explicit depths and annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dump {
    pub lines: Vec<DumpLine>,
}

/// Serialize a tree to its dump form, annotations included.
pub fn to_dump(tree: &ConfigTree) -> Dump {
    let lines = tree
        .all_nodes()
        .map(|id| DumpLine {
            depth: tree.depth(id),
            text: tree.text(id).to_string(),
            tags: tree.tags(id).iter().cloned().collect(),
            comments: tree.comments(id).iter().cloned().collect(),
        })
        .collect();
    Dump { lines }
}

/// Rebuild a tree from a dump. Duplicate sibling texts are preserved as
/// written; depths must grow by at most one step per line.
pub fn from_dump(dump: &Dump) -> Result<ConfigTree, ParseError> {
    let mut tree = ConfigTree::new();
    let mut stack: Vec<NodeId> = Vec::new();

    for (index, line) in dump.lines.iter().enumerate() {
        if line.depth == 0 || line.depth > stack.len() + 1 {
            return Err(ParseError::MalformedHierarchy {
                line: index + 1,
                depth: line.depth,
                max: stack.len(),
            });
        }
        stack.truncate(line.depth - 1);
        let parent = stack.last().copied();
        let node = tree.add_child_duplicate(parent, &line.text);
        for tag in &line.tags {
            tree.add_tag(node, tag.clone());
        }
        for comment in &line.comments {
            tree.add_comment(node, comment.clone());
        }
        stack.push(node);
    }
    Ok(tree)
}
