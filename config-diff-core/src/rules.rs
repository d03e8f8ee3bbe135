use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while compiling a rule set.
#[derive(Debug, Error)]
pub enum RuleError {
    /// A matcher or scrub pattern failed to compile. Validation happens once
    /// at construction; the differ and projector never re-validate.
    #[error("invalid rule pattern '{pattern}': {source}")]
    InvalidRulePattern {
        pattern: String,
        source: regex::Error,
    },
}

/// Per-depth matcher against one command line.
///
/// All populated criteria must hold. An empty matcher matches any line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LineMatcher {
    pub equals: Option<String>,
    pub starts_with: Option<String>,
    pub ends_with: Option<String>,
    pub contains: Option<String>,
    pub pattern: Option<String>,
}

impl LineMatcher {
    pub fn equals(text: impl Into<String>) -> Self {
        Self {
            equals: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn starts_with(prefix: impl Into<String>) -> Self {
        Self {
            starts_with: Some(prefix.into()),
            ..Self::default()
        }
    }

    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledMatcher {
    def: LineMatcher,
    regex: Option<Regex>,
}

impl CompiledMatcher {
    fn compile(def: LineMatcher) -> Result<Self, RuleError> {
        let regex = match &def.pattern {
            Some(pattern) => Some(compile_pattern(pattern)?),
            None => None,
        };
        Ok(Self { def, regex })
    }

    fn matches(&self, text: &str) -> bool {
        if let Some(equals) = &self.def.equals {
            if text != equals {
                return false;
            }
        }
        if let Some(prefix) = &self.def.starts_with {
            if !text.starts_with(prefix.as_str()) {
                return false;
            }
        }
        if let Some(suffix) = &self.def.ends_with {
            if !text.ends_with(suffix.as_str()) {
                return false;
            }
        }
        if let Some(needle) = &self.def.contains {
            if !text.contains(needle.as_str()) {
                return false;
            }
        }
        if let Some(regex) = &self.regex {
            if !regex.is_match(text) {
                return false;
            }
        }
        true
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(pattern).map_err(|source| RuleError::InvalidRulePattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// The closed set of behaviors a rule can attach to an ancestor path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "behavior", rename_all = "snake_case")]
pub enum Behavior {
    /// Force the prefix-token negation style for matched lines.
    DefaultNegation,
    /// Remove matched lines by emitting this literal replacement command.
    NegateWith { replace: String },
    /// Matched lines hold a single value; a new value supersedes the old
    /// without an explicit removal.
    Idempotent,
    /// Close the matched multi-line section with this explicit exit command.
    SectionalExiting { exit_text: String },
    /// Force sibling ordering; lower weights rise, higher weights sink.
    Ordering { weight: i32 },
    /// Never emit a removal for matched lines.
    NoNegation,
    /// Allow identical-text siblings under matched parents.
    DuplicateChildAllowed,
}

/// Discriminant of [`Behavior`], used for rule resolution by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorKind {
    DefaultNegation,
    NegateWith,
    Idempotent,
    SectionalExiting,
    Ordering,
    NoNegation,
    DuplicateChildAllowed,
}

impl Behavior {
    pub fn kind(&self) -> BehaviorKind {
        match self {
            Behavior::DefaultNegation => BehaviorKind::DefaultNegation,
            Behavior::NegateWith { .. } => BehaviorKind::NegateWith,
            Behavior::Idempotent => BehaviorKind::Idempotent,
            Behavior::SectionalExiting { .. } => BehaviorKind::SectionalExiting,
            Behavior::Ordering { .. } => BehaviorKind::Ordering,
            Behavior::NoNegation => BehaviorKind::NoNegation,
            Behavior::DuplicateChildAllowed => BehaviorKind::DuplicateChildAllowed,
        }
    }

    fn is_negation_class(&self) -> bool {
        matches!(
            self,
            Behavior::DefaultNegation | Behavior::NegateWith { .. } | Behavior::NoNegation
        )
    }
}

/// Declarative form of a rule, as loaded from a driver pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDef {
    #[serde(flatten)]
    pub behavior: Behavior,
    #[serde(rename = "match")]
    pub matchers: Vec<LineMatcher>,
}

/// A compiled rule: per-depth matchers plus a behavior.
#[derive(Debug, Clone)]
pub struct Rule {
    matchers: Vec<CompiledMatcher>,
    behavior: Behavior,
}

impl Rule {
    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    /// True when every matcher succeeds against the corresponding depth of
    /// `path`. The rule must cover the full path.
    fn matches_path<S: AsRef<str>>(&self, path: &[S]) -> bool {
        self.matchers.len() == path.len()
            && self
                .matchers
                .iter()
                .zip(path.iter())
                .all(|(matcher, text)| matcher.matches(text.as_ref()))
    }
}

/// Tagging rule: ancestor-path matchers plus the tags to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRuleDef {
    #[serde(rename = "match")]
    pub matchers: Vec<LineMatcher>,
    pub apply_tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TagRule {
    matchers: Vec<CompiledMatcher>,
    apply_tags: Vec<String>,
}

impl TagRule {
    pub fn apply_tags(&self) -> &[String] {
        &self.apply_tags
    }

    pub fn matches_path<S: AsRef<str>>(&self, path: &[S]) -> bool {
        self.matchers.len() == path.len()
            && self
                .matchers
                .iter()
                .zip(path.iter())
                .all(|(matcher, text)| matcher.matches(text.as_ref()))
    }
}

/// Per-line scrub applied by the parser before hierarchy analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSubDef {
    pub search: String,
    pub replace: String,
}

#[derive(Debug, Clone)]
pub(crate) struct LineSub {
    pub(crate) search: Regex,
    pub(crate) replace: String,
}

/// Declarative form of a whole rule set (one vendor driver pack).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSetDef {
    /// Negation token prefixed to removed commands, e.g. `"no "`.
    #[serde(default = "default_negation_token")]
    pub negation: String,
    /// Indentation width for rendering.
    #[serde(default = "default_indentation")]
    pub indentation: usize,
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleDef>,
    #[serde(default, rename = "line_sub")]
    pub line_subs: Vec<LineSubDef>,
    #[serde(default, rename = "tag_rule")]
    pub tag_rules: Vec<TagRuleDef>,
}

fn default_negation_token() -> String {
    "no ".to_string()
}

fn default_indentation() -> usize {
    2
}

impl Default for RuleSetDef {
    fn default() -> Self {
        Self {
            negation: default_negation_token(),
            indentation: default_indentation(),
            rules: Vec::new(),
            line_subs: Vec::new(),
            tag_rules: Vec::new(),
        }
    }
}

/// An ordered, pre-validated collection of rules. For a given node and
/// behavior kind, the first matching rule in declaration order wins.
#[derive(Debug, Clone)]
pub struct RuleSet {
    negation: String,
    indentation: usize,
    rules: Vec<Rule>,
    line_subs: Vec<LineSub>,
    tag_rules: Vec<TagRule>,
}

impl RuleSet {
    /// Compile a declarative rule set. Every pattern is validated here;
    /// downstream consumers assume a well-formed set and cannot fail on
    /// rule content.
    pub fn new(def: RuleSetDef) -> Result<Self, RuleError> {
        let rules = def
            .rules
            .into_iter()
            .map(|rule| {
                let matchers = rule
                    .matchers
                    .into_iter()
                    .map(CompiledMatcher::compile)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Rule {
                    matchers,
                    behavior: rule.behavior,
                })
            })
            .collect::<Result<Vec<_>, RuleError>>()?;
        let line_subs = def
            .line_subs
            .into_iter()
            .map(|sub| {
                Ok(LineSub {
                    search: compile_pattern(&sub.search)?,
                    replace: sub.replace,
                })
            })
            .collect::<Result<Vec<_>, RuleError>>()?;
        let tag_rules = def
            .tag_rules
            .into_iter()
            .map(|rule| {
                let matchers = rule
                    .matchers
                    .into_iter()
                    .map(CompiledMatcher::compile)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(TagRule {
                    matchers,
                    apply_tags: rule.apply_tags,
                })
            })
            .collect::<Result<Vec<_>, RuleError>>()?;

        Ok(Self {
            negation: def.negation,
            indentation: def.indentation,
            rules,
            line_subs,
            tag_rules,
        })
    }

    /// An empty rule set with default negation token and indentation.
    pub fn empty() -> Self {
        Self {
            negation: default_negation_token(),
            indentation: default_indentation(),
            rules: Vec::new(),
            line_subs: Vec::new(),
            tag_rules: Vec::new(),
        }
    }

    pub fn negation_token(&self) -> &str {
        &self.negation
    }

    pub fn indentation(&self) -> usize {
        self.indentation
    }

    pub fn tag_rules(&self) -> &[TagRule] {
        &self.tag_rules
    }

    pub(crate) fn line_subs(&self) -> &[LineSub] {
        &self.line_subs
    }

    /// First rule of the given kind whose matchers cover the ancestor path.
    pub fn resolve<S: AsRef<str>>(&self, path: &[S], kind: BehaviorKind) -> Option<&Rule> {
        self.rules
            .iter()
            .find(|rule| rule.behavior.kind() == kind && rule.matches_path(path))
    }

    /// Index of the first idempotent rule covering `path`. Indices let the
    /// differ check that two lines claim the same single-value slot.
    pub fn idempotent_rule_index<S: AsRef<str>>(&self, path: &[S]) -> Option<usize> {
        self.rules.iter().position(|rule| {
            rule.behavior.kind() == BehaviorKind::Idempotent && rule.matches_path(path)
        })
    }

    /// Removal text for the line at `path`: `Some(command)` to emit,
    /// `None` when a `no_negation` rule suppresses the removal entirely.
    ///
    /// Negation-class kinds (`negate_with`, `no_negation`,
    /// `default_negation`) are resolved together in declaration order.
    /// Unmatched lines fall back to prefix-swap with the negation token.
    pub fn negation_for<S: AsRef<str>>(&self, path: &[S], text: &str) -> Option<String> {
        for rule in &self.rules {
            if rule.behavior.is_negation_class() && rule.matches_path(path) {
                return match &rule.behavior {
                    Behavior::NegateWith { replace } => Some(replace.clone()),
                    Behavior::NoNegation => None,
                    _ => Some(self.swap_negation(text)),
                };
            }
        }
        Some(self.swap_negation(text))
    }

    /// Prefix the negation token, or strip it when the line is already
    /// negated (removing `no X` re-enables `X`).
    pub fn swap_negation(&self, text: &str) -> String {
        match text.strip_prefix(self.negation.as_str()) {
            Some(stripped) => stripped.to_string(),
            None => format!("{}{}", self.negation, text),
        }
    }

    /// Replacement text a `negate_with` rule would emit for `path`, if any.
    /// The future projector uses this to recognize custom negations.
    pub fn negate_with_for<S: AsRef<str>>(&self, path: &[S]) -> Option<&str> {
        match self.resolve(path, BehaviorKind::NegateWith)?.behavior() {
            Behavior::NegateWith { replace } => Some(replace.as_str()),
            _ => unreachable!("resolve filtered on kind"),
        }
    }

    /// Exit command closing the section at `path`, if a rule supplies one.
    pub fn sectional_exit_for<S: AsRef<str>>(&self, path: &[S]) -> Option<&str> {
        match self.resolve(path, BehaviorKind::SectionalExiting)?.behavior() {
            Behavior::SectionalExiting { exit_text } => Some(exit_text.as_str()),
            _ => unreachable!("resolve filtered on kind"),
        }
    }

    /// Ordering weight for `path`, if an ordering rule assigns one.
    pub fn ordering_weight<S: AsRef<str>>(&self, path: &[S]) -> Option<i32> {
        match self.resolve(path, BehaviorKind::Ordering)?.behavior() {
            Behavior::Ordering { weight } => Some(*weight),
            _ => unreachable!("resolve filtered on kind"),
        }
    }

    /// True when identical-text siblings are allowed under the parent at
    /// `parent_path`.
    pub fn duplicates_allowed<S: AsRef<str>>(&self, parent_path: &[S]) -> bool {
        self.resolve(parent_path, BehaviorKind::DuplicateChildAllowed)
            .is_some()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Behavior, BehaviorKind, LineMatcher, RuleDef, RuleError, RuleSet, RuleSetDef};

    fn rule_set(rules: Vec<RuleDef>) -> RuleSet {
        RuleSet::new(RuleSetDef {
            rules,
            ..RuleSetDef::default()
        })
        .expect("rules should compile")
    }

    #[test]
    fn first_matching_rule_wins() {
        let rules = rule_set(vec![
            RuleDef {
                behavior: Behavior::Ordering { weight: -10 },
                matchers: vec![
                    LineMatcher::starts_with("interface "),
                    LineMatcher::starts_with("switchport mode "),
                ],
            },
            RuleDef {
                behavior: Behavior::Ordering { weight: 50 },
                matchers: vec![LineMatcher::starts_with("interface "), LineMatcher::default()],
            },
        ]);

        assert_eq!(
            rules.ordering_weight(&["interface Gi1/0/1", "switchport mode access"]),
            Some(-10)
        );
        assert_eq!(
            rules.ordering_weight(&["interface Gi1/0/1", "mtu 9000"]),
            Some(50)
        );
        assert_eq!(rules.ordering_weight(&["vlan 2"]), None);
    }

    #[test]
    fn rule_must_cover_full_path() {
        let rules = rule_set(vec![RuleDef {
            behavior: Behavior::Idempotent,
            matchers: vec![LineMatcher::starts_with("vlan"), LineMatcher::starts_with("name")],
        }]);
        assert!(rules.resolve(&["vlan 2", "name a"], BehaviorKind::Idempotent).is_some());
        assert!(rules.resolve(&["vlan 2"], BehaviorKind::Idempotent).is_none());
        assert!(rules
            .resolve(&["x", "vlan 2", "name a"], BehaviorKind::Idempotent)
            .is_none());
    }

    #[test]
    fn negation_class_resolves_in_declaration_order() {
        let rules = rule_set(vec![
            RuleDef {
                behavior: Behavior::DefaultNegation,
                matchers: vec![LineMatcher::starts_with("logging console emerg")],
            },
            RuleDef {
                behavior: Behavior::NegateWith {
                    replace: "logging console debugging".to_string(),
                },
                matchers: vec![LineMatcher::starts_with("logging console ")],
            },
            RuleDef {
                behavior: Behavior::NoNegation,
                matchers: vec![LineMatcher::starts_with("snmp-server enable ")],
            },
        ]);

        // earlier default_negation shadows the broader negate_with
        assert_eq!(
            rules.negation_for(&["logging console emergencies"], "logging console emergencies"),
            Some("no logging console emergencies".to_string())
        );
        assert_eq!(
            rules.negation_for(&["logging console informational"], "logging console informational"),
            Some("logging console debugging".to_string())
        );
        assert_eq!(
            rules.negation_for(&["snmp-server enable traps"], "snmp-server enable traps"),
            None
        );
        // fallback swaps the prefix in both directions
        assert_eq!(
            rules.negation_for(&["shutdown"], "shutdown"),
            Some("no shutdown".to_string())
        );
        assert_eq!(
            rules.negation_for(&["no shutdown"], "no shutdown"),
            Some("shutdown".to_string())
        );
    }

    #[test]
    fn invalid_pattern_fails_at_construction() {
        let err = RuleSet::new(RuleSetDef {
            rules: vec![RuleDef {
                behavior: Behavior::Idempotent,
                matchers: vec![LineMatcher::pattern("ip address [")],
            }],
            ..RuleSetDef::default()
        })
        .expect_err("pattern should not compile");
        assert!(matches!(err, RuleError::InvalidRulePattern { .. }));
    }

    #[test]
    fn matcher_criteria_all_must_hold() {
        let matcher = LineMatcher {
            starts_with: Some("ip address ".to_string()),
            contains: Some("255.255.255.0".to_string()),
            ..LineMatcher::default()
        };
        let rules = rule_set(vec![RuleDef {
            behavior: Behavior::Idempotent,
            matchers: vec![matcher],
        }]);
        assert!(rules
            .resolve(&["ip address 10.0.0.1 255.255.255.0"], BehaviorKind::Idempotent)
            .is_some());
        assert!(rules
            .resolve(&["ip address 10.0.0.1 255.255.0.0"], BehaviorKind::Idempotent)
            .is_none());
    }
}
