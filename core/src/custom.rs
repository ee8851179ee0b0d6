//! # Custom Type Registry
//!
//! User-declared type → schema overrides. The dispatcher consults this table
//! before any structural classification, so an override always wins over the
//! built-in mapping for the same type.

use crate::descriptor::TypeRef;
use crate::schema::constraints::ConstraintBag;
use crate::schema::{PrimitiveType, ResolvedSchema};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An explicit schema fragment for a user type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomSchema {
    /// JSON type.
    #[serde(rename = "type")]
    pub ty: PrimitiveType,
    /// Format string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Description emitted with the schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CustomSchema {
    /// A custom schema with a JSON type and optional format.
    pub fn new(ty: PrimitiveType, format: Option<&str>) -> Self {
        Self {
            ty,
            format: format.map(str::to_string),
            description: None,
        }
    }

    /// The schema fragment this override produces.
    pub fn to_schema(&self) -> ResolvedSchema {
        ResolvedSchema::Primitive {
            ty: self.ty,
            format: self.format.clone(),
            constraints: ConstraintBag {
                description: self.description.clone(),
                ..Default::default()
            },
        }
    }
}

/// Registry of custom type overrides, keyed by type name as written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomTypeRegistry {
    entries: IndexMap<String, CustomSchema>,
}

impl CustomTypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an override. Later registrations replace earlier ones.
    pub fn register(&mut self, type_name: impl Into<String>, schema: CustomSchema) {
        self.entries.insert(type_name.into(), schema);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, type_name: impl Into<String>, schema: CustomSchema) -> Self {
        self.register(type_name, schema);
        self
    }

    /// Finds the override for a type.
    ///
    /// Matches the full expression first (`Money<Eur>`), then the path
    /// without arguments (`billing::Money`), then the simple name (`Money`).
    pub fn lookup(&self, ty: &TypeRef) -> Option<&CustomSchema> {
        if let Some(hit) = self.entries.get(&ty.to_string()) {
            return Some(hit);
        }
        if let TypeRef::Path { name, .. } = ty {
            if let Some(hit) = self.entries.get(name) {
                return Some(hit);
            }
        }
        ty.simple_name().and_then(|simple| self.entries.get(simple))
    }

    /// Number of overrides.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no override is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
