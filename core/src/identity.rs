//! # Type Identity
//!
//! The cache and conflict key for a structural type: fully-qualified name
//! plus the normalized generic argument signature.

use serde::{Serialize, Serializer};
use std::fmt::{self, Display};

/// A normalized key for one structural type instantiation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeIdentity {
    /// Fully-qualified declaration path, e.g. `crm::a::User`.
    pub qualified_name: String,
    /// Qualified generic arguments, rendered as type expressions.
    pub args: Vec<String>,
}

impl TypeIdentity {
    /// Identity of a non-generic type.
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            args: Vec::new(),
        }
    }

    /// Identity of a generic instantiation.
    pub fn with_args(qualified_name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            args,
        }
    }
}

impl Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name)?;
        if !self.args.is_empty() {
            write!(f, "<{}>", self.args.join(", "))?;
        }
        Ok(())
    }
}

impl Serialize for TypeIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
