//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Structural errors (invalid map keys, generic arity mismatches) and
//! configuration errors (duplicate request bodies, blank identifiers) are
//! fatal and propagate to the caller. Unclassifiable types never surface here;
//! the dispatcher degrades them to a free-form schema instead.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// A map-like type whose key cannot be expressed as a JSON object key.
    #[from(ignore)]
    #[display("Invalid key type '{key_type}' in map '{type_name}': map keys must be string-like")]
    InvalidKeyType {
        /// The offending map type, as written.
        type_name: String,
        /// The key type that was rejected.
        key_type: String,
    },

    /// A generic type instantiated with the wrong number of arguments.
    #[from(ignore)]
    #[display(
        "Generic arity mismatch for '{type_name}': expected {expected} type argument(s), found {found}"
    )]
    GenericArityMismatch {
        /// The generic type, as written.
        type_name: String,
        /// Number of declared type parameters.
        expected: usize,
        /// Number of supplied type arguments.
        found: usize,
    },

    /// A second request body registered for a single operation.
    #[from(ignore)]
    #[display("Duplicate request body for operation '{operation}'")]
    DuplicateRequestBody {
        /// `METHOD /path` of the operation.
        operation: String,
    },

    /// The same method and path registered twice.
    #[from(ignore)]
    #[display("Duplicate operation {method} {path}")]
    DuplicateOperation {
        /// HTTP method.
        method: String,
        /// URL path template.
        path: String,
    },

    /// A required identifier (tag, parameter, security scheme, path) was blank.
    #[from(ignore)]
    #[display("Blank {kind} identifier")]
    BlankIdentifier {
        /// What kind of identifier was blank (e.g. "tag").
        kind: String,
    },

    /// JSON/YAML serialization failures.
    #[from(ignore)]
    #[display("Serialization Error: {_0}")]
    Serialization(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Builds a `BlankIdentifier` error for the given identifier kind.
    pub fn blank(kind: impl Into<String>) -> Self {
        AppError::BlankIdentifier { kind: kind.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_conversion() {
        let io_err = Error::new(ErrorKind::Other, "test");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_string_conversion() {
        let msg = String::from("something wrong");
        let app_err: AppError = msg.into();
        match app_err {
            AppError::General(s) => assert_eq!(s, "something wrong"),
            _ => panic!("String should convert to AppError::General"),
        }
    }

    #[test]
    fn test_invalid_key_display_names_type() {
        let err = AppError::InvalidKeyType {
            type_name: "HashMap<i32, String>".into(),
            key_type: "i32".into(),
        };
        let text = err.to_string();
        assert!(text.contains("HashMap<i32, String>"));
        assert!(text.contains("'i32'"));
    }

    #[test]
    fn test_arity_display() {
        let err = AppError::GenericArityMismatch {
            type_name: "Page<A, B>".into(),
            expected: 1,
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "Generic arity mismatch for 'Page<A, B>': expected 1 type argument(s), found 2"
        );
    }

    #[test]
    fn test_blank_helper() {
        assert_eq!(AppError::blank("tag").to_string(), "Blank tag identifier");
    }
}
