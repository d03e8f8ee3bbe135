//! Hierarchical configuration modeling, diffing, and remediation primitives
//! used by higher-level tools.

pub mod diff;
pub mod format;
pub mod future;
pub mod parser;
pub mod rules;
pub mod tags;
pub mod tree;
pub mod writer;

pub use diff::{compare, Diagnostic, Op, Remediation, RemediationEntry};
pub use format::{format_commands, format_marked, format_summary, to_json};
pub use future::{predict, predict_config, predict_from_target, rollback};
pub use parser::{from_dump, parse, parse_file, to_dump, Dump, DumpLine, ParseError};
pub use rules::{
    Behavior, BehaviorKind, LineMatcher, LineSubDef, Rule, RuleDef, RuleError, RuleSet,
    RuleSetDef, TagRule, TagRuleDef,
};
pub use tags::{apply_tags, filter_by_tag};
pub use tree::{ConfigTree, NodeId};
pub use writer::{write, write_file, write_with_exits, WriteError};
