//! # Inspection Session
//!
//! One documentation build: the schema cache, the named-schema registry, the
//! in-flight guard and the diagnostics, plus the read-only collaborators the
//! dispatcher consults. Sessions share no mutable state, so independent
//! builds each construct their own.

pub mod cache;

use crate::conflicts::{detect_conflicts, Conflict};
use crate::custom::CustomTypeRegistry;
use crate::descriptor::{DescriptorProvider, TypeRef};
use crate::error::AppResult;
use crate::primitives::{RustPrimitives, TypeMapper};
use crate::report::{Diagnostic, InspectionReport};
use crate::resolver::bindings::BindingContext;
use crate::schema::constraints::ConstraintRegistry;
use crate::schema::refs::{COMPONENTS_PREFIX, DEFS_PREFIX};
use crate::schema::ResolvedSchema;
use cache::{NamedSchemaEntry, SchemaCache};
use indexmap::{IndexMap, IndexSet};
use serde_json::{json, Map, Value};

/// JSON Schema dialect stamped on standalone bundles.
const BUNDLE_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

/// State for one schema build.
pub struct InspectionSession<'p> {
    pub(crate) provider: &'p dyn DescriptorProvider,
    pub(crate) mapper: Box<dyn TypeMapper>,
    pub(crate) custom_types: CustomTypeRegistry,
    pub(crate) constraints: ConstraintRegistry,
    pub(crate) separator: String,
    pub(crate) cache: SchemaCache,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl<'p> InspectionSession<'p> {
    /// A session reading declarations from `provider`.
    pub fn new(provider: &'p dyn DescriptorProvider) -> Self {
        Self {
            provider,
            mapper: Box::new(RustPrimitives),
            custom_types: CustomTypeRegistry::default(),
            constraints: ConstraintRegistry::default(),
            separator: "Of".to_string(),
            cache: SchemaCache::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Sets the custom type overrides.
    pub fn with_custom_types(mut self, custom_types: CustomTypeRegistry) -> Self {
        self.custom_types = custom_types;
        self
    }

    /// Sets the per-member constraint registry.
    pub fn with_constraints(mut self, constraints: ConstraintRegistry) -> Self {
        self.constraints = constraints;
        self
    }

    /// Sets the separator used in generic schema names (`Page` + `Of` + `User`).
    pub fn with_generic_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Replaces the leaf type mapper.
    pub fn with_type_mapper(mut self, mapper: impl TypeMapper + 'static) -> Self {
        self.mapper = Box::new(mapper);
        self
    }

    /// Resolves a type with no enclosing generic bindings.
    pub fn resolve(&mut self, ty: &TypeRef) -> AppResult<ResolvedSchema> {
        self.resolve_in(ty, &BindingContext::empty())
    }

    /// Parses and resolves a type expression.
    pub fn resolve_str(&mut self, ty: &str) -> AppResult<ResolvedSchema> {
        let ty = TypeRef::parse(ty)?;
        self.resolve(&ty)
    }

    /// Resolved named schemas in registration order.
    pub fn named_schemas(&self) -> IndexMap<&str, &ResolvedSchema> {
        self.cache.named_schemas()
    }

    /// Every registry entry, including conflicting identities.
    pub fn entries(&self) -> impl Iterator<Item = &NamedSchemaEntry> {
        self.cache.entries()
    }

    /// Runs the conflict detector over the registry.
    pub fn conflicts(&self) -> Vec<Conflict> {
        detect_conflicts(self.cache.entries())
    }

    /// Resolution gaps recorded so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Conflicts and diagnostics for the current build.
    pub fn report(&self) -> InspectionReport {
        InspectionReport {
            conflicts: self.conflicts(),
            diagnostics: self.diagnostics.clone(),
        }
    }

    /// Tears down cache, registry, in-flight set and diagnostics.
    pub fn reset(&mut self) {
        tracing::debug!(entries = self.cache.len(), "session reset");
        self.cache.clear();
        self.diagnostics.clear();
    }

    /// Named schemas rendered for `components.schemas`.
    pub fn components_json(&self) -> Map<String, Value> {
        self.named_schemas()
            .into_iter()
            .map(|(name, schema)| (name.to_string(), schema.to_json(COMPONENTS_PREFIX)))
            .collect()
    }

    /// Resolves `ty` and renders it as a standalone JSON Schema whose named
    /// dependencies live under `$defs`.
    pub fn schema_bundle(&mut self, ty: &TypeRef) -> AppResult<Value> {
        let root = self.resolve(ty)?;
        let named = self.named_schemas();

        // 1. Walk references breadth-first from the root
        let mut reachable: IndexSet<&str> = IndexSet::new();
        let mut queue = Vec::new();
        root.collect_references(&mut queue);
        while let Some(name) = queue.pop() {
            if reachable.insert(name) {
                if let Some(schema) = named.get(name) {
                    schema.collect_references(&mut queue);
                }
            }
        }

        // 2. Render root and definitions
        let mut defs = Map::new();
        for (name, schema) in &named {
            if reachable.contains(name) {
                defs.insert(name.to_string(), schema.to_json(DEFS_PREFIX));
            }
        }

        let mut bundle = match root.to_json(DEFS_PREFIX) {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("allOf".to_string(), json!([other]));
                map
            }
        };
        bundle.insert("$schema".to_string(), json!(BUNDLE_DIALECT));
        if !defs.is_empty() {
            bundle.insert("$defs".to_string(), Value::Object(defs));
        }
        Ok(Value::Object(bundle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{StructDecl, TypeCatalog};
    use pretty_assertions::assert_eq;

    fn catalog() -> TypeCatalog {
        TypeCatalog::new()
            .with(
                StructDecl::new("Employee")
                    .field("id", "Uuid")
                    .field("manager", "Option<Employee>"),
            )
            .with(StructDecl::new("Unrelated").field("x", "i32"))
    }

    #[test]
    fn test_schema_bundle_includes_reachable_defs_only() {
        let catalog = catalog();
        let mut session = InspectionSession::new(&catalog);
        session.resolve_str("Unrelated").unwrap();

        let bundle = session.schema_bundle(&TypeRef::named("Employee")).unwrap();
        assert_eq!(bundle["$ref"], json!("#/$defs/Employee"));
        assert_eq!(bundle["$schema"], json!(BUNDLE_DIALECT));
        let defs = bundle["$defs"].as_object().unwrap();
        assert_eq!(defs.keys().collect::<Vec<_>>(), vec!["Employee"]);
        assert_eq!(
            defs["Employee"]["properties"]["manager"],
            json!({ "anyOf": [{ "$ref": "#/$defs/Employee" }, { "type": "null" }] })
        );
    }

    #[test]
    fn test_reset_clears_state() {
        let catalog = catalog();
        let mut session = InspectionSession::new(&catalog);
        session.resolve_str("Employee").unwrap();
        session.resolve_str("Mystery").unwrap();
        assert!(!session.named_schemas().is_empty());
        assert_eq!(session.diagnostics().len(), 1);

        session.reset();
        assert!(session.named_schemas().is_empty());
        assert!(session.report().is_clean());
    }

    #[test]
    fn test_components_json() {
        let catalog = catalog();
        let mut session = InspectionSession::new(&catalog);
        session.resolve_str("Employee").unwrap();
        let components = session.components_json();
        assert_eq!(
            components["Employee"]["properties"]["id"],
            json!({ "type": "string", "format": "uuid" })
        );
        assert_eq!(components["Employee"]["required"], json!(["id"]));
    }

    #[test]
    fn test_generic_separator() {
        let catalog = TypeCatalog::new()
            .with(StructDecl::new("Page").with_type_params(&["T"]).field("items", "Vec<T>"))
            .with(StructDecl::new("User").field("id", "i64"));
        let mut session = InspectionSession::new(&catalog).with_generic_separator("_");
        let schema = session.resolve_str("Page<User>").unwrap();
        assert_eq!(schema, ResolvedSchema::reference("Page_User"));
    }
}
