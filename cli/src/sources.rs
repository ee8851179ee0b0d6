#![deny(missing_docs)]

//! # Source Loading and Output
//!
//! Shared by every subcommand: builds the type catalog from Rust files and
//! writes results as JSON or YAML.

use crate::error::{CliError, CliResult};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use typeschema_core::TypeCatalog;
use walkdir::WalkDir;

/// Where to read Rust declarations from.
#[derive(clap::Args, Debug, Clone)]
pub struct SourceArgs {
    /// Rust source file to load. May be repeated.
    #[clap(long = "source")]
    pub sources: Vec<PathBuf>,

    /// Directory walked recursively for `.rs` files. Module paths follow
    /// the file layout below it, as in a crate's `src/`.
    #[clap(long)]
    pub source_dir: Option<PathBuf>,
}

impl SourceArgs {
    /// Every file to load with its module path, explicit sources first.
    fn files(&self) -> Vec<(PathBuf, Vec<String>)> {
        let mut files: Vec<_> = self
            .sources
            .iter()
            .map(|path| (path.clone(), Vec::new()))
            .collect();
        if let Some(dir) = &self.source_dir {
            let walked = WalkDir::new(dir)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.into_path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "rs"))
                .map(|p| {
                    let module = module_path(dir, &p);
                    (p, module)
                });
            files.extend(walked);
        }
        files
    }

    /// Parses every source file into one catalog.
    pub fn load_catalog(&self) -> CliResult<TypeCatalog> {
        let files = self.files();
        if files.is_empty() {
            return Err(CliError::General(
                "No Rust sources given; use --source or --source-dir".to_string(),
            ));
        }

        let mut catalog = TypeCatalog::new();
        for (path, module) in files {
            let code = fs::read_to_string(&path)?;
            let count = catalog.load_module_source(&code, &module)?;
            tracing::debug!(
                path = %path.display(),
                module = %module.join("::"),
                declarations = count,
                "loaded source"
            );
        }
        Ok(catalog)
    }
}

/// `models/user.rs` is `models::user`; `mod.rs`, `lib.rs` and `main.rs` name
/// their directory.
fn module_path(root: &Path, file: &Path) -> Vec<String> {
    let relative = file.strip_prefix(root).unwrap_or(file).with_extension("");
    let mut module: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if module
        .last()
        .is_some_and(|last| matches!(last.as_str(), "mod" | "lib" | "main"))
    {
        module.pop();
    }
    module
}

/// Renders `value` as YAML for `.yaml`/`.yml` paths, JSON otherwise.
pub fn render(value: &Value, path: Option<&Path>) -> CliResult<String> {
    let ext = path
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .unwrap_or("json");
    match ext {
        "yaml" | "yml" => serde_yaml::to_string(value)
            .map_err(|e| CliError::General(format!("YAML serialization failed: {}", e))),
        _ => serde_json::to_string_pretty(value)
            .map_err(|e| CliError::General(format!("JSON serialization failed: {}", e))),
    }
}

/// Writes `value` to `output`, or prints it to stdout.
pub fn emit(value: &Value, output: Option<&Path>) -> CliResult<()> {
    let text = render(value, output)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, text)?;
            tracing::info!(path = %path.display(), "output written");
        }
        None => println!("{}", text),
    }
    Ok(())
}
