use std::fs;
use std::path::Path;

use config_diff_core::{RuleError, RuleSet, RuleSetDef};
use thiserror::Error;

/// Built-in driver pack names, in the order `--driver` documents them.
pub const BUILTIN_DRIVERS: &[&str] = &["generic", "cisco-ios"];

/// Errors returned when loading a driver pack.
#[derive(Debug, Error)]
pub enum DriverLoadError {
    #[error("unknown driver '{0}', expected one of: {drivers}", drivers = BUILTIN_DRIVERS.join(", "))]
    Unknown(String),
    #[error("failed to read driver file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse driver file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("driver file {path} is invalid: {source}")]
    Rules { path: String, source: RuleError },
}

/// Look up an embedded driver pack by name.
pub fn builtin_driver(name: &str) -> Result<RuleSet, DriverLoadError> {
    let raw = match name {
        "generic" => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/drivers/generic.toml")),
        "cisco-ios" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/drivers/cisco-ios.toml"
        )),
        other => return Err(DriverLoadError::Unknown(other.to_string())),
    };
    parse_driver(raw, format!("embedded driver '{name}'"))
}

/// Load a driver pack from a TOML file.
pub fn load_driver(path: &Path) -> Result<RuleSet, DriverLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| DriverLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_driver(&raw, path.display().to_string())
}

fn parse_driver(raw: &str, path: String) -> Result<RuleSet, DriverLoadError> {
    let def: RuleSetDef = toml::from_str(raw).map_err(|source| DriverLoadError::Parse {
        path: path.clone(),
        source,
    })?;
    RuleSet::new(def).map_err(|source| DriverLoadError::Rules { path, source })
}

#[cfg(test)]
mod tests {
    use super::{builtin_driver, DriverLoadError, BUILTIN_DRIVERS};

    #[test]
    fn every_builtin_driver_compiles() {
        for name in BUILTIN_DRIVERS {
            builtin_driver(name).expect("embedded driver should compile");
        }
    }

    #[test]
    fn cisco_ios_driver_knows_interface_ordering() {
        let rules = builtin_driver("cisco-ios").expect("driver");
        assert_eq!(
            rules.ordering_weight(&["interface Vlan2", "no shutdown"]),
            Some(200)
        );
        assert_eq!(
            rules.negation_for(
                &["logging console informational"],
                "logging console informational"
            ),
            Some("logging console debugging".to_string())
        );
    }

    #[test]
    fn unknown_names_are_rejected() {
        let err = builtin_driver("junos").expect_err("no such driver");
        assert!(matches!(err, DriverLoadError::Unknown(_)));
        // the message lists every embedded pack, straight from the registry
        assert_eq!(
            err.to_string(),
            format!(
                "unknown driver 'junos', expected one of: {}",
                BUILTIN_DRIVERS.join(", ")
            )
        );
        assert!(err.to_string().contains("generic, cisco-ios"));
    }
}
