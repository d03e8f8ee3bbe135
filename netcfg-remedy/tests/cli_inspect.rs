use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("netcfg-remedy"))
}

#[test]
fn depth_one_shows_top_level_lines_only() {
    cmd()
        .arg("inspect")
        .arg(fixture("fixtures/running.conf"))
        .arg("--depth")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("interface Vlan2"))
        .stdout(predicate::str::contains("ip address").not());
}

#[test]
fn tag_filter_shows_matching_subtrees_with_annotations() {
    cmd()
        .arg("inspect")
        .arg(fixture("fixtures/running.conf"))
        .arg("--driver-file")
        .arg(fixture("fixtures/custom-driver.toml"))
        .arg("--tag")
        .arg("vlans")
        .assert()
        .success()
        .stdout(predicate::str::contains("vlan 2  [vlans]"))
        .stdout(predicate::str::contains("name switch_mgmt_10.0.2.0/24  [vlans]"))
        .stdout(predicate::str::contains("interface").not());
}
