//! # Schema Conflict Detector
//!
//! Finds derived names claimed by more than one distinct type identity.
//! Conflicts are reported, never auto-renamed.

use crate::identity::TypeIdentity;
use crate::session::cache::NamedSchemaEntry;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt::{self, Display};

/// Two or more identities sharing one schema name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    /// The contested schema name.
    pub name: String,
    /// The distinct identities, in registration order.
    pub identities: Vec<TypeIdentity>,
}

impl Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<String> = self.identities.iter().map(ToString::to_string).collect();
        write!(f, "schema name '{}' is shared by {}", self.name, ids.join(", "))
    }
}

/// Groups entries by derived name and reports every group with more than
/// one distinct identity. Output follows first-registration order.
pub fn detect_conflicts<'a, I>(entries: I) -> Vec<Conflict>
where
    I: IntoIterator<Item = &'a NamedSchemaEntry>,
{
    let mut groups: IndexMap<&str, Vec<&TypeIdentity>> = IndexMap::new();
    for entry in entries {
        let group = groups.entry(entry.name.as_str()).or_default();
        if !group.contains(&&entry.identity) {
            group.push(&entry.identity);
        }
    }

    groups
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|(name, ids)| {
            let conflict = Conflict {
                name: name.to_string(),
                identities: ids.into_iter().cloned().collect(),
            };
            tracing::warn!(%conflict, "schema name conflict");
            conflict
        })
        .collect()
}
