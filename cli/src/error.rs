#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use derive_more::{Display, From};
use typeschema_core::AppError;

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// Engine failure (structural or configuration error).
    #[display("{}", _0)]
    App(AppError),

    /// The API description file could not be parsed.
    #[from(ignore)]
    #[display("Invalid config {}: {}", path, message)]
    Config {
        /// Path of the offending file.
        path: String,
        /// Parser message.
        message: String,
    },

    /// The build produced schema name conflicts and `--deny-conflicts` was set.
    #[from(ignore)]
    #[display("{} schema name conflict(s) found", _0)]
    Conflicts(usize),

    /// General failure message.
    #[display("Operation failed: {}", _0)]
    General(String),
}

/// Manual implementation of the standard Error trait.
///
/// We implement this manually (instead of `derive(Error)`) because the `General(String)`
/// variant contains a `String`, which does not implement `std::error::Error`, causing
/// auto-derived `source()` implementations to fail compilation.
impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;
