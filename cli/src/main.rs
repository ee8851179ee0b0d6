#![deny(missing_docs)]

//! # Typeschema CLI
//!
//! Command Line Interface for the typeschema engine.
//!
//! Supported Commands:
//! - `inspect`: Resolves one Rust type into named schemas.
//! - `compose`: Builds an OpenAPI document from sources and an API description.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod compose;
mod config;
mod error;
mod inspect;
mod sources;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Rust type to OpenAPI schema toolchain")]
struct Cli {
    /// Log filter, e.g. `warn` or `typeschema_core=debug`.
    #[clap(long, global = true, env = "TYPESCHEMA_LOG", default_value = "warn")]
    log_level: String,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve one type and print the schemas it reaches.
    Inspect(inspect::InspectArgs),
    /// Compose a full OpenAPI document.
    Compose(compose::ComposeArgs),
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cli.log_level))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    match &cli.command {
        Commands::Inspect(args) => inspect::execute(args)?,
        Commands::Compose(args) => compose::execute(args)?,
    }

    Ok(())
}
