use config_diff_core::{
    apply_tags, compare, filter_by_tag, format_commands, predict, rollback, write, ConfigTree,
    Remediation, RuleSet,
};

/// One running/target pair under a driver's rule set, with the derived
/// artifacts the subcommands print.
pub struct Workflow {
    running: ConfigTree,
    target: ConfigTree,
    rules: RuleSet,
}

impl Workflow {
    pub fn new(running: ConfigTree, target: ConfigTree, rules: RuleSet) -> Self {
        Self {
            running,
            target,
            rules,
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Commands that bring running to target.
    pub fn remediation(&self) -> Remediation {
        compare(&self.running, &self.target, &self.rules)
    }

    /// Config state expected once the remediation has been applied.
    pub fn future(&self) -> ConfigTree {
        predict(&self.running, &self.remediation(), &self.rules)
    }

    /// Commands that undo the change, treating `running` as the applied
    /// state and `target` as the state to return to.
    pub fn rollback(&self) -> Remediation {
        rollback(&self.running, &self.target, &self.rules)
    }

    /// Remediation command text restricted to lines the driver's tag rules
    /// mark with `tag`. Ancestor context lines are kept.
    pub fn tagged_commands(&self, tag: &str) -> String {
        let remediation = self.remediation();
        let tagged = apply_tags(remediation.config(), self.rules.tag_rules());
        write(&filter_by_tag(&tagged, tag), &self.rules)
    }

    /// Full remediation command text.
    pub fn commands(&self) -> String {
        format_commands(&self.remediation(), &self.rules)
    }
}

#[cfg(test)]
mod tests {
    use config_diff_core::{parse, LineMatcher, RuleSet, RuleSetDef, TagRuleDef};

    use super::Workflow;

    #[test]
    fn tagged_commands_keep_context_and_drop_the_rest() {
        let rules = RuleSet::new(RuleSetDef {
            tag_rules: vec![TagRuleDef {
                matchers: vec![
                    LineMatcher::starts_with("interface "),
                    LineMatcher::starts_with("ip address "),
                ],
                apply_tags: vec!["addressing".to_string()],
            }],
            ..RuleSetDef::default()
        })
        .expect("rules should compile");

        let running = parse("interface Vlan2\n shutdown\n", &rules);
        let target = parse(
            "interface Vlan2\n ip address 10.0.2.1 255.255.255.0\nvlan 9\n",
            &rules,
        );
        let workflow = Workflow::new(running, target, rules);

        assert_eq!(
            workflow.tagged_commands("addressing"),
            "interface Vlan2\n  ip address 10.0.2.1 255.255.255.0\n"
        );
        assert!(workflow.commands().contains("vlan 9"));
    }
}
