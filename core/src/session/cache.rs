//! # Schema Cache
//!
//! Session-scoped registry of named schemas. Entries are written once; the
//! only mutation is a placeholder being finalized with its resolved body.

use crate::identity::TypeIdentity;
use crate::schema::ResolvedSchema;
use indexmap::IndexMap;
use std::collections::HashSet;

/// The body of a registry entry.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaState {
    /// Registered, body still being resolved.
    Placeholder,
    /// Fully resolved.
    Resolved(ResolvedSchema),
}

impl SchemaState {
    /// The resolved body, if finalized.
    pub fn schema(&self) -> Option<&ResolvedSchema> {
        match self {
            SchemaState::Placeholder => None,
            SchemaState::Resolved(schema) => Some(schema),
        }
    }
}

/// A named schema and the identity that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSchemaEntry {
    /// Derived schema name.
    pub name: String,
    /// Producing type identity.
    pub identity: TypeIdentity,
    /// Placeholder or final body.
    pub state: SchemaState,
}

/// Identity-keyed schema registry plus the in-flight guard set.
#[derive(Debug, Default)]
pub struct SchemaCache {
    entries: IndexMap<TypeIdentity, NamedSchemaEntry>,
    in_flight: HashSet<TypeIdentity>,
}

impl SchemaCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry for `identity`, placeholder or resolved.
    pub fn get(&self, identity: &TypeIdentity) -> Option<&NamedSchemaEntry> {
        self.entries.get(identity)
    }

    /// Whether `identity` has an entry.
    pub fn contains(&self, identity: &TypeIdentity) -> bool {
        self.entries.contains_key(identity)
    }

    /// Registers a placeholder before the body is resolved.
    ///
    /// Returns `false` if the identity was already registered.
    pub fn register_placeholder(&mut self, identity: TypeIdentity, name: String) -> bool {
        if self.entries.contains_key(&identity) {
            return false;
        }
        tracing::debug!(%identity, name = %name, "placeholder registered");
        self.entries.insert(
            identity.clone(),
            NamedSchemaEntry {
                name,
                identity,
                state: SchemaState::Placeholder,
            },
        );
        true
    }

    /// Replaces a placeholder with its resolved body.
    pub fn finalize(&mut self, identity: &TypeIdentity, schema: ResolvedSchema) {
        if let Some(entry) = self.entries.get_mut(identity) {
            entry.state = SchemaState::Resolved(schema);
        }
    }

    /// Drops an entry whose body failed to resolve.
    pub fn discard(&mut self, identity: &TypeIdentity) {
        if self.entries.shift_remove(identity).is_some() {
            tracing::debug!(%identity, "placeholder discarded");
        }
        self.in_flight.remove(identity);
    }

    /// Marks `identity` as mid-resolution.
    pub fn begin(&mut self, identity: &TypeIdentity) {
        self.in_flight.insert(identity.clone());
    }

    /// Clears the mid-resolution mark.
    pub fn end(&mut self, identity: &TypeIdentity) {
        self.in_flight.remove(identity);
    }

    /// Whether `identity` is on the current resolution stack.
    pub fn is_in_flight(&self, identity: &TypeIdentity) -> bool {
        self.in_flight.contains(identity)
    }

    /// Number of types currently mid-resolution.
    pub fn depth(&self) -> usize {
        self.in_flight.len()
    }

    /// All entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &NamedSchemaEntry> {
        self.entries.values()
    }

    /// Resolved schemas keyed by name. When identities conflict, the first
    /// registered body owns the name.
    pub fn named_schemas(&self) -> IndexMap<&str, &ResolvedSchema> {
        let mut out = IndexMap::new();
        for entry in self.entries.values() {
            if let Some(schema) = entry.state.schema() {
                out.entry(entry.name.as_str()).or_insert(schema);
            }
        }
        out
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry and in-flight mark.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.in_flight.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PrimitiveType;

    #[test]
    fn test_placeholder_then_finalize() {
        let mut cache = SchemaCache::new();
        let id = TypeIdentity::new("Node");
        assert!(cache.register_placeholder(id.clone(), "Node".into()));
        assert!(!cache.register_placeholder(id.clone(), "Node".into()));
        assert_eq!(cache.get(&id).unwrap().state, SchemaState::Placeholder);
        assert!(cache.named_schemas().is_empty());

        let body = ResolvedSchema::primitive(PrimitiveType::String, None);
        cache.finalize(&id, body.clone());
        assert_eq!(cache.named_schemas().get("Node"), Some(&&body));
    }

    #[test]
    fn test_discard_removes_entry_and_guard() {
        let mut cache = SchemaCache::new();
        let id = TypeIdentity::new("Broken");
        cache.register_placeholder(id.clone(), "Broken".into());
        cache.begin(&id);
        cache.discard(&id);
        assert!(!cache.contains(&id));
        assert!(!cache.is_in_flight(&id));
    }

    #[test]
    fn test_first_registered_owns_name() {
        let mut cache = SchemaCache::new();
        let a = TypeIdentity::new("a::User");
        let b = TypeIdentity::new("b::User");
        cache.register_placeholder(a.clone(), "User".into());
        cache.register_placeholder(b.clone(), "User".into());
        cache.finalize(&a, ResolvedSchema::primitive(PrimitiveType::Integer, None));
        cache.finalize(&b, ResolvedSchema::primitive(PrimitiveType::String, None));

        let named = cache.named_schemas();
        assert_eq!(named.len(), 1);
        assert_eq!(
            named["User"],
            &ResolvedSchema::primitive(PrimitiveType::Integer, None)
        );
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut cache = SchemaCache::new();
        let id = TypeIdentity::new("A");
        cache.register_placeholder(id.clone(), "A".into());
        cache.begin(&id);
        cache.clear();
        assert!(cache.is_empty());
        assert!(!cache.is_in_flight(&id));
    }
}
