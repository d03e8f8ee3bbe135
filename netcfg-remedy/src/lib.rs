//! Network device configuration remediation tooling.
//!
//! Built on `config-diff-core`, which models configurations as hierarchical
//! command trees and derives the ordered command sequence transforming one
//! into another. This crate adds the operational surface:
//!
//! - [`driver`] — vendor driver packs (rule sets) embedded or loaded from
//!   TOML files
//! - [`workflow`] — a running/target pair and its derived artifacts:
//!   remediation, rollback, and projected future state
//! - [`report`] — terminal-friendly colored remediation output
//! - [`inspect`] — configuration tree visualization
//!
//! The typical workflow: parse the device's running config and the intended
//! config under a driver pack, generate the remediation, review it (marked
//! or tag-filtered), and project the future state to confirm the change
//! converges.

pub mod driver;
pub mod inspect;
pub mod report;
pub mod workflow;
