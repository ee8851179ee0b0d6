//! # Inspection Report
//!
//! Non-fatal findings of one build: naming conflicts and resolution gaps.

use crate::conflicts::Conflict;
use serde::Serialize;
use std::fmt::{self, Display};

/// A recoverable resolution gap, such as an unclassifiable type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// The offending type as written.
    pub type_name: String,
    /// What happened.
    pub message: String,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_name, self.message)
    }
}

/// Conflicts and diagnostics collected during a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InspectionReport {
    /// Names claimed by more than one type identity.
    pub conflicts: Vec<Conflict>,
    /// Recoverable resolution gaps.
    pub diagnostics: Vec<Diagnostic>,
}

impl InspectionReport {
    /// Whether the build produced no findings.
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty() && self.diagnostics.is_empty()
    }
}

impl Display for InspectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for conflict in &self.conflicts {
            writeln!(f, "conflict: {}", conflict)?;
        }
        for diagnostic in &self.diagnostics {
            writeln!(f, "warning: {}", diagnostic)?;
        }
        Ok(())
    }
}
