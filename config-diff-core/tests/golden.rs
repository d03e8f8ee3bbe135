//! End-to-end scenario over a realistic switch configuration pair, checking
//! the exact remediation text and the exact projected future state.

use pretty_assertions::assert_eq;

use config_diff_core::{
    compare, format_commands, parse, predict, write, Behavior, LineMatcher, RuleDef, RuleSet,
    RuleSetDef,
};

fn ios_rules() -> RuleSet {
    RuleSet::new(RuleSetDef {
        rules: vec![
            RuleDef {
                behavior: Behavior::Idempotent,
                matchers: vec![
                    LineMatcher::starts_with("vlan "),
                    LineMatcher::starts_with("name "),
                ],
            },
            RuleDef {
                behavior: Behavior::Idempotent,
                matchers: vec![
                    LineMatcher::starts_with("interface "),
                    LineMatcher::starts_with("description "),
                ],
            },
            RuleDef {
                behavior: Behavior::Idempotent,
                matchers: vec![
                    LineMatcher::starts_with("interface "),
                    LineMatcher::starts_with("ip address "),
                ],
            },
            RuleDef {
                behavior: Behavior::Ordering { weight: 200 },
                matchers: vec![
                    LineMatcher::starts_with("interface "),
                    LineMatcher::equals("no shutdown"),
                ],
            },
        ],
        ..RuleSetDef::default()
    })
    .expect("rules should compile")
}

const RUNNING: &str = "\
hostname example_rtr
ip access-list extended TEST
 10 permit ip 10.0.0.0 0.0.0.7 any
vlan 2
 name switch_mgmt_10.0.2.0/24
vlan 3
 name switch_mgmt_10.0.4.0/24
interface Vlan2
 description switch_10.0.2.0/24
 ip address 10.0.2.1 255.255.255.0
 shutdown
interface Vlan3
 mtu 9000
 description switch_mgmt_10.0.4.0/24
 ip address 10.0.4.1 255.255.0.0
 ip access-group TEST in
 no shutdown
";

const TARGET: &str = "\
hostname example_rtr
ip access-list extended TEST
 10 permit ip 10.0.0.0 0.0.0.7 any
vlan 2
 name switch_mgmt_10.0.2.0/24
vlan 3
 name switch_mgmt_10.0.3.0/24
vlan 4
 name switch_mgmt_10.0.4.0/24
interface Vlan2
 mtu 9000
 description switch_10.0.2.0/24
 ip address 10.0.2.1 255.255.255.0
 ip access-group TEST in
 no shutdown
interface Vlan3
 mtu 9000
 description switch_mgmt_10.0.3.0/24
 ip address 10.0.3.1 255.255.0.0
 ip access-group TEST in
 no shutdown
interface Vlan4
 mtu 9000
 description switch_mgmt_10.0.4.0/24
 ip address 10.0.4.1 255.255.0.0
 ip access-group TEST in
 no shutdown
";

#[test]
fn remediation_matches_expected_command_sequence() {
    let rules = ios_rules();
    let running = parse(RUNNING, &rules);
    let target = parse(TARGET, &rules);

    let remediation = compare(&running, &target, &rules);
    assert!(remediation.diagnostics().is_empty());
    assert_eq!(
        format_commands(&remediation, &rules),
        "\
vlan 3
  name switch_mgmt_10.0.3.0/24
vlan 4
  name switch_mgmt_10.0.4.0/24
interface Vlan2
  mtu 9000
  ip access-group TEST in
  no shutdown
interface Vlan3
  description switch_mgmt_10.0.3.0/24
  ip address 10.0.3.1 255.255.0.0
interface Vlan4
  mtu 9000
  description switch_mgmt_10.0.4.0/24
  ip address 10.0.4.1 255.255.0.0
  ip access-group TEST in
  no shutdown
"
    );
}

#[test]
fn future_projection_applies_changes_and_keeps_the_rest() {
    let rules = ios_rules();
    let running = parse(RUNNING, &rules);
    let target = parse(TARGET, &rules);

    let remediation = compare(&running, &target, &rules);
    let future = predict(&running, &remediation, &rules);

    // Applied blocks come first, untouched running lines follow. Vlan2's
    // shutdown was cancelled by the remediation's "no shutdown", so neither
    // form survives into the projected state.
    assert_eq!(
        write(&future, &rules),
        "\
vlan 3
  name switch_mgmt_10.0.3.0/24
vlan 4
  name switch_mgmt_10.0.4.0/24
interface Vlan2
  mtu 9000
  ip access-group TEST in
  description switch_10.0.2.0/24
  ip address 10.0.2.1 255.255.255.0
interface Vlan3
  description switch_mgmt_10.0.3.0/24
  ip address 10.0.3.1 255.255.0.0
  mtu 9000
  ip access-group TEST in
  no shutdown
interface Vlan4
  mtu 9000
  description switch_mgmt_10.0.4.0/24
  ip address 10.0.4.1 255.255.0.0
  ip access-group TEST in
  no shutdown
hostname example_rtr
ip access-list extended TEST
  10 permit ip 10.0.0.0 0.0.0.7 any
vlan 2
  name switch_mgmt_10.0.2.0/24
"
    );
}
