#![deny(missing_docs)]

//! # Compose Command
//!
//! Builds a full OpenAPI document from Rust sources and an API description.

use crate::config::ApiConfig;
use crate::error::CliResult;
use crate::inspect::surface_report;
use crate::sources::{emit, SourceArgs};
use std::path::PathBuf;
use typeschema_core::{InspectionSession, SchemaComposer};

/// Arguments for the compose command.
#[derive(clap::Args, Debug, Clone)]
pub struct ComposeArgs {
    /// Rust sources to read declarations from.
    #[clap(flatten)]
    pub sources: SourceArgs,

    /// API description (YAML, or JSON for `.json` files).
    #[clap(long)]
    pub config: PathBuf,

    /// Type name separator for generic instantiations.
    #[clap(long, default_value = "Of")]
    pub separator: String,

    /// Output path (.json, .yaml or .yml). Prints JSON to stdout when absent.
    #[clap(long)]
    pub output: Option<PathBuf>,

    /// Fail when two distinct types derive the same schema name.
    #[clap(long)]
    pub deny_conflicts: bool,
}

/// Executes the composition.
pub fn execute(args: &ComposeArgs) -> CliResult<()> {
    // 1. Inputs
    let catalog = args.sources.load_catalog()?;
    let config = ApiConfig::load(&args.config)?;

    // 2. Build
    let session = InspectionSession::new(&catalog)
        .with_custom_types(config.custom_types)
        .with_constraints(config.constraints)
        .with_generic_separator(args.separator.as_str());
    let mut composer = SchemaComposer::new(session, config.info);
    let document = composer.compose(&config.operations)?;

    // 3. Checks
    for name in document.dangling_references() {
        tracing::warn!(schema = %name, "reference without a component");
    }
    document.to_openapi()?;
    surface_report(&document.report, args.deny_conflicts)?;

    // 4. Output
    emit(&document.to_json_value(), args.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use serde_json::{json, Value};
    use std::fs;
    use tempfile::tempdir;
    use typeschema_core::AppError;

    const SOURCE: &str = r#"
        pub struct Employee {
            pub id: Uuid,
            pub name: String,
            pub salary: Money,
            pub manager: Option<Box<Employee>>,
        }
        pub struct Page<T> { pub items: Vec<T>, pub total: u64 }
    "#;

    const CONFIG: &str = r#"
info:
  title: HR
  version: 1.0.0
custom_types:
  Money: { type: string, format: decimal }
constraints:
  Employee.name: { max_length: 64 }
operations:
  - method: get
    path: /employees
    operation_id: listEmployees
    tags: [employees]
    parameters:
      - { name: page, in: query, type: u32 }
    responses:
      - status: 200
        description: A page of employees
        types: ["Page<Employee>"]
  - method: get
    path: /employees/{id}
    parameters:
      - { name: id, in: path, type: Uuid }
    responses:
      - status: 200
        description: Found
        types: [Employee]
"#;

    fn setup(config: &str) -> (tempfile::TempDir, ComposeArgs) {
        let dir = tempdir().unwrap();
        let src = dir.path().join("model.rs");
        let cfg = dir.path().join("api.yaml");
        fs::write(&src, SOURCE).unwrap();
        fs::write(&cfg, config).unwrap();
        let args = ComposeArgs {
            sources: SourceArgs {
                sources: vec![src],
                source_dir: None,
            },
            config: cfg,
            separator: "Of".to_string(),
            output: Some(dir.path().join("openapi.json")),
            deny_conflicts: true,
        };
        (dir, args)
    }

    #[test]
    fn test_compose_document() {
        let (_dir, args) = setup(CONFIG);
        execute(&args).unwrap();

        let text = fs::read_to_string(args.output.as_ref().unwrap()).unwrap();
        let doc: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["openapi"], json!("3.1.0"));
        assert_eq!(
            doc["paths"]["/employees"]["get"]["operationId"],
            json!("listEmployees")
        );
        let schemas = &doc["components"]["schemas"];
        assert_eq!(
            schemas.as_object().unwrap().keys().collect::<Vec<_>>(),
            vec!["PageOfEmployee", "Employee"]
        );
        assert_eq!(
            schemas["Employee"]["properties"]["salary"],
            json!({ "type": "string", "format": "decimal" })
        );
        assert_eq!(
            schemas["Employee"]["properties"]["name"],
            json!({ "type": "string", "maxLength": 64 })
        );
    }

    #[test]
    fn test_duplicate_operation_fails() {
        let config = format!(
            "{}  - method: get\n    path: /employees\n",
            CONFIG
        );
        let (_dir, args) = setup(&config);
        assert!(matches!(
            execute(&args),
            Err(CliError::App(AppError::DuplicateOperation { .. }))
        ));
    }
}
