#![deny(missing_docs)]

//! # Inspect Command
//!
//! Resolves a single type and emits the named schemas it reached, or a
//! standalone JSON Schema bundle with `--bundle`.

use crate::config::ApiConfig;
use crate::error::{CliError, CliResult};
use crate::sources::{emit, SourceArgs};
use serde_json::json;
use std::path::PathBuf;
use typeschema_core::schema::refs::COMPONENTS_PREFIX;
use typeschema_core::{InspectionReport, InspectionSession, TypeRef};

/// Arguments for the inspect command.
#[derive(clap::Args, Debug, Clone)]
pub struct InspectArgs {
    /// Rust sources to read declarations from.
    #[clap(flatten)]
    pub sources: SourceArgs,

    /// Type expression to resolve, e.g. `"Page<Employee>"`.
    #[clap(long = "type")]
    pub ty: String,

    /// Type name separator for generic instantiations.
    #[clap(long, default_value = "Of")]
    pub separator: String,

    /// API description supplying custom types and constraints.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Emit a JSON Schema with `$defs` instead of `components.schemas`.
    #[clap(long)]
    pub bundle: bool,

    /// Output path (.json, .yaml or .yml). Prints JSON to stdout when absent.
    #[clap(long)]
    pub output: Option<PathBuf>,

    /// Fail when two distinct types derive the same schema name.
    #[clap(long)]
    pub deny_conflicts: bool,
}

/// Executes the inspection.
pub fn execute(args: &InspectArgs) -> CliResult<()> {
    // 1. Inputs
    let catalog = args.sources.load_catalog()?;
    let config = match &args.config {
        Some(path) => ApiConfig::load(path)?,
        None => ApiConfig::default(),
    };
    let ty = TypeRef::parse(&args.ty)?;

    // 2. Resolve
    let mut session = InspectionSession::new(&catalog)
        .with_custom_types(config.custom_types)
        .with_constraints(config.constraints)
        .with_generic_separator(args.separator.as_str());
    let value = if args.bundle {
        session.schema_bundle(&ty)?
    } else {
        let root = session.resolve(&ty)?;
        let mut out = json!({ "schemas": session.components_json() });
        if root.reference_target().is_none() {
            out["root"] = root.to_json(COMPONENTS_PREFIX);
        }
        out
    };

    // 3. Findings, then output
    surface_report(&session.report(), args.deny_conflicts)?;
    emit(&value, args.output.as_deref())
}

/// Prints findings to stderr; conflicts are fatal only when `deny` is set.
pub(crate) fn surface_report(report: &InspectionReport, deny: bool) -> CliResult<()> {
    if !report.is_clean() {
        eprint!("{}", report);
    }
    if deny && !report.conflicts.is_empty() {
        return Err(CliError::Conflicts(report.conflicts.len()));
    }
    Ok(())
}
