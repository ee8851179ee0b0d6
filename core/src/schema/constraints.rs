//! # Constraints
//!
//! Per-member constraint values (length and numeric bounds, patterns,
//! defaults) and the post-resolution merge that folds them into an already
//! resolved schema. The engine does not care where a bag came from: source
//! annotations, an API description file, or code.

use crate::schema::ResolvedSchema;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A bag of optional schema constraints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConstraintBag {
    /// `minLength`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// `maxLength`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// `minimum`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// `maximum`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// `pattern`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// `minItems`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    /// `maxItems`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    /// `default`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// `description`; authoritative when merged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ConstraintBag {
    /// Whether no constraint is set.
    pub fn is_empty(&self) -> bool {
        *self == ConstraintBag::default()
    }

    /// Returns `self` with every field that `other` sets replaced by `other`'s value.
    pub fn overlay(mut self, other: &ConstraintBag) -> ConstraintBag {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() { self.$field = other.$field.clone(); })*
            };
        }
        take!(min_length, max_length, minimum, maximum, pattern, min_items, max_items, default, description);
        self
    }

    /// Fills fields left unset in `self` from `other`; `description` always
    /// comes from `other` when it has one.
    fn fill_from(&mut self, other: &ConstraintBag) {
        macro_rules! fill {
            ($($field:ident),*) => {
                $(if self.$field.is_none() { self.$field = other.$field.clone(); })*
            };
        }
        fill!(min_length, max_length, minimum, maximum, pattern, min_items, max_items, default);
        if other.description.is_some() {
            self.description = other.description.clone();
        }
    }

    /// Writes the set constraints as OpenAPI keywords.
    pub(crate) fn write_into(&self, map: &mut Map<String, Value>) {
        if let Some(v) = self.min_length {
            map.insert("minLength".to_string(), json!(v));
        }
        if let Some(v) = self.max_length {
            map.insert("maxLength".to_string(), json!(v));
        }
        if let Some(v) = self.minimum {
            map.insert("minimum".to_string(), json!(v));
        }
        if let Some(v) = self.maximum {
            map.insert("maximum".to_string(), json!(v));
        }
        if let Some(v) = &self.pattern {
            map.insert("pattern".to_string(), json!(v));
        }
        if let Some(v) = self.min_items {
            map.insert("minItems".to_string(), json!(v));
        }
        if let Some(v) = self.max_items {
            map.insert("maxItems".to_string(), json!(v));
        }
        if let Some(v) = &self.default {
            map.insert("default".to_string(), v.clone());
        }
        if let Some(v) = &self.description {
            map.insert("description".to_string(), json!(v));
        }
    }
}

/// Merges a constraint bag into a resolved schema.
///
/// Only fields the resolved schema left unset are filled, except
/// `description`, which the bag overrides. References and compositions are
/// returned unchanged: their constraints belong to the referenced schema.
pub fn apply_constraints(schema: ResolvedSchema, bag: &ConstraintBag) -> ResolvedSchema {
    if bag.is_empty() {
        return schema;
    }
    match schema {
        ResolvedSchema::Primitive {
            ty,
            format,
            mut constraints,
        } => {
            constraints.fill_from(bag);
            ResolvedSchema::Primitive {
                ty,
                format,
                constraints,
            }
        }
        ResolvedSchema::Array {
            items,
            unique_items,
            mut constraints,
        } => {
            constraints.fill_from(bag);
            ResolvedSchema::Array {
                items,
                unique_items,
                constraints,
            }
        }
        ResolvedSchema::MapOf {
            value,
            mut constraints,
        } => {
            constraints.fill_from(bag);
            ResolvedSchema::MapOf { value, constraints }
        }
        ResolvedSchema::Enum {
            values,
            mut constraints,
        } => {
            constraints.fill_from(bag);
            ResolvedSchema::Enum {
                values,
                constraints,
            }
        }
        ResolvedSchema::Object(mut object) => {
            if bag.description.is_some() {
                object.description = bag.description.clone();
            }
            ResolvedSchema::Object(object)
        }
        other @ (ResolvedSchema::Reference { .. } | ResolvedSchema::Composition { .. }) => {
            tracing::debug!(schema = ?other, "constraints not applicable to reference schema");
            other
        }
    }
}

/// Constraint bags keyed by member identity (`Owner.member`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstraintRegistry {
    entries: IndexMap<String, ConstraintBag>,
}

impl ConstraintRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers constraints for `owner.member`, merging over earlier entries.
    pub fn register(&mut self, owner: &str, member: &str, bag: ConstraintBag) {
        let key = format!("{}.{}", owner, member);
        let merged = match self.entries.shift_remove(&key) {
            Some(existing) => existing.overlay(&bag),
            None => bag,
        };
        self.entries.insert(key, merged);
    }

    /// Looks up constraints, trying the qualified owner name first.
    pub fn lookup(&self, qualified_owner: &str, owner: &str, member: &str) -> Option<&ConstraintBag> {
        self.entries
            .get(&format!("{}.{}", qualified_owner, member))
            .or_else(|| self.entries.get(&format!("{}.{}", owner, member)))
    }

    /// Number of registered members.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PrimitiveType;

    fn string_schema(constraints: ConstraintBag) -> ResolvedSchema {
        ResolvedSchema::Primitive {
            ty: PrimitiveType::String,
            format: None,
            constraints,
        }
    }

    #[test]
    fn test_apply_fills_unset_only() {
        let base = string_schema(ConstraintBag {
            max_length: Some(10),
            ..Default::default()
        });
        let bag = ConstraintBag {
            min_length: Some(1),
            max_length: Some(99),
            ..Default::default()
        };
        match apply_constraints(base, &bag) {
            ResolvedSchema::Primitive { constraints, .. } => {
                assert_eq!(constraints.min_length, Some(1));
                assert_eq!(constraints.max_length, Some(10));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_apply_description_is_authoritative() {
        let base = string_schema(ConstraintBag {
            description: Some("old".into()),
            ..Default::default()
        });
        let bag = ConstraintBag {
            description: Some("new".into()),
            ..Default::default()
        };
        match apply_constraints(base, &bag) {
            ResolvedSchema::Primitive { constraints, .. } => {
                assert_eq!(constraints.description.as_deref(), Some("new"))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_apply_leaves_references_untouched() {
        let reference = ResolvedSchema::reference("User");
        let bag = ConstraintBag {
            min_length: Some(3),
            ..Default::default()
        };
        assert_eq!(apply_constraints(reference.clone(), &bag), reference);
    }

    #[test]
    fn test_registry_lookup_prefers_qualified() {
        let mut registry = ConstraintRegistry::new();
        registry.register(
            "User",
            "name",
            ConstraintBag {
                max_length: Some(10),
                ..Default::default()
            },
        );
        registry.register(
            "billing::User",
            "name",
            ConstraintBag {
                max_length: Some(20),
                ..Default::default()
            },
        );
        let hit = registry.lookup("billing::User", "User", "name").unwrap();
        assert_eq!(hit.max_length, Some(20));
        let fallback = registry.lookup("crm::User", "User", "name").unwrap();
        assert_eq!(fallback.max_length, Some(10));
    }

    #[test]
    fn test_registry_deserializes_from_yaml() {
        let yaml = "Employee.name:\n  min_length: 1\n  pattern: '^[A-Z]'\n";
        let registry: ConstraintRegistry = serde_yaml::from_str(yaml).unwrap();
        let bag = registry.lookup("Employee", "Employee", "name").unwrap();
        assert_eq!(bag.min_length, Some(1));
        assert_eq!(bag.pattern.as_deref(), Some("^[A-Z]"));
    }
}
