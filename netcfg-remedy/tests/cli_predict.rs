use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("netcfg-remedy"))
}

#[test]
fn predict_projects_the_applied_state() {
    cmd()
        .arg("predict")
        .arg(fixture("fixtures/running.conf"))
        .arg(fixture("fixtures/target.conf"))
        .arg("--driver")
        .arg("cisco-ios")
        .assert()
        .success()
        .stdout(predicate::eq(
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
",
        ));
}

#[test]
fn predict_with_exits_closes_known_sections() {
    let dir = tempdir().expect("tempdir");
    let running = dir.path().join("running.conf");
    let target = dir.path().join("target.conf");
    fs::write(&running, "router bgp 65000\n").expect("write running");
    fs::write(
        &target,
        "router bgp 65000\n address-family ipv4\n  network 10.0.0.0\n",
    )
    .expect("write target");

    cmd()
        .arg("predict")
        .arg(&running)
        .arg(&target)
        .arg("--driver")
        .arg("cisco-ios")
        .arg("--with-exits")
        .assert()
        .success()
        .stdout(predicate::eq(
            "router bgp 65000\n  address-family ipv4\n    network 10.0.0.0\n  exit-address-family\n",
        ));

    // without the flag the projection stays marker-free
    cmd()
        .arg("predict")
        .arg(&running)
        .arg(&target)
        .arg("--driver")
        .arg("cisco-ios")
        .assert()
        .success()
        .stdout(predicate::eq(
            "router bgp 65000\n  address-family ipv4\n    network 10.0.0.0\n",
        ));
}

#[test]
fn rollback_undoes_an_applied_change() {
    // target.conf plays the applied state, running.conf the state to restore
    cmd()
        .arg("rollback")
        .arg(fixture("fixtures/target.conf"))
        .arg(fixture("fixtures/running.conf"))
        .arg("--driver")
        .arg("cisco-ios")
        .assert()
        .success()
        .stdout(predicate::str::contains("no vlan 4"))
        .stdout(predicate::str::contains("name switch_mgmt_10.0.4.0/24"))
        .stdout(predicate::str::contains("no mtu 9000"));
}
