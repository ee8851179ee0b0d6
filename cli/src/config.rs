#![deny(missing_docs)]

//! # API Description
//!
//! The YAML/JSON file that drives `compose`: document info, custom type
//! overrides, member constraints and the endpoint operations.

use crate::error::{CliError, CliResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use typeschema_core::{ApiInfo, ConstraintRegistry, CustomTypeRegistry, EndpointOperation};

/// Parsed API description.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Document `info`.
    #[serde(default)]
    pub info: ApiInfo,
    /// Type name → schema overrides.
    #[serde(default)]
    pub custom_types: CustomTypeRegistry,
    /// `Owner.member` → constraint bag.
    #[serde(default)]
    pub constraints: ConstraintRegistry,
    /// Endpoint operations, in output order.
    #[serde(default)]
    pub operations: Vec<EndpointOperation>,
}

impl ApiConfig {
    /// Reads a config file; `.json` files are parsed as JSON, anything else as YAML.
    pub fn load(path: &Path) -> CliResult<Self> {
        let text = fs::read_to_string(path)?;
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let parsed = if is_json {
            serde_json::from_str(&text).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&text).map_err(|e| e.to_string())
        };
        parsed.map_err(|message| CliError::Config {
            path: path.display().to_string(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CONFIG: &str = r#"
info:
  title: HR
  version: 2.0.0
custom_types:
  Money: { type: string, format: decimal }
constraints:
  Employee.name: { min_length: 1, max_length: 64 }
operations:
  - method: get
    path: /employees
    responses:
      - status: 200
        description: All employees
        types: ["Vec<Employee>"]
"#;

    #[test]
    fn test_load_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("api.yaml");
        fs::write(&path, CONFIG).unwrap();

        let config = ApiConfig::load(&path).unwrap();
        assert_eq!(config.info.title, "HR");
        assert_eq!(config.custom_types.len(), 1);
        assert_eq!(config.constraints.len(), 1);
        assert!(config
            .constraints
            .lookup("Employee", "Employee", "name")
            .is_some_and(|bag| bag.max_length == Some(64)));
        assert_eq!(config.operations.len(), 1);
    }

    #[test]
    fn test_load_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("api.json");
        fs::write(
            &path,
            r#"{ "info": { "title": "T", "version": "1" }, "operations": [] }"#,
        )
        .unwrap();
        let config = ApiConfig::load(&path).unwrap();
        assert_eq!(config.info.version, "1");
        assert!(config.custom_types.is_empty());
    }

    #[test]
    fn test_unknown_key_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("api.yaml");
        fs::write(&path, "servers: []\n").unwrap();
        assert!(matches!(ApiConfig::load(&path), Err(CliError::Config { .. })));
    }
}
