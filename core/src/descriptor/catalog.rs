//! # Type Catalog
//!
//! The in-memory [`DescriptorProvider`]: declarations keyed by qualified name.

use crate::descriptor::extractors::extract_declarations;
use crate::descriptor::models::TypeDecl;
use crate::descriptor::DescriptorProvider;
use crate::error::AppResult;
use indexmap::IndexMap;

/// A set of type declarations, addressable by path.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    decls: IndexMap<String, TypeDecl>,
}

impl TypeCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a declaration, returning the one it replaced.
    pub fn insert(&mut self, decl: impl Into<TypeDecl>) -> Option<TypeDecl> {
        let decl = decl.into();
        let key = decl.qualified_name();
        let previous = self.decls.insert(key.clone(), decl);
        if previous.is_some() {
            tracing::debug!(type_name = %key, "replaced declaration");
        }
        previous
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, decl: impl Into<TypeDecl>) -> Self {
        self.insert(decl);
        self
    }

    /// Parses Rust source and adds every struct and enum it declares.
    ///
    /// Returns the number of declarations added.
    pub fn load_source(&mut self, code: &str) -> AppResult<usize> {
        self.load_module_source(code, &[])
    }

    /// Like [`load_source`](Self::load_source), for a file that is the
    /// module `module` (e.g. `src/models/user.rs` is `models::user`).
    pub fn load_module_source(&mut self, code: &str, module: &[String]) -> AppResult<usize> {
        let decls = extract_declarations(code)?;
        let count = decls.len();
        for mut decl in decls {
            decl.nest_in(module);
            self.insert(decl);
        }
        Ok(count)
    }

    /// Looks up a declaration by exact qualified name only.
    pub fn get(&self, qualified_name: &str) -> Option<&TypeDecl> {
        self.decls.get(qualified_name)
    }

    /// Looks up a declaration by path.
    ///
    /// Tries the exact qualified name, then a unique declaration whose
    /// qualified name ends with `::{path}`. A bare name falls back to the
    /// first declaration registered under it; qualified paths never do.
    pub fn lookup(&self, path: &str) -> Option<&TypeDecl> {
        let mut path = path.trim_start_matches("::");
        while let Some(rest) = path
            .strip_prefix("crate::")
            .or_else(|| path.strip_prefix("self::"))
        {
            path = rest;
        }
        if let Some(decl) = self.decls.get(path) {
            return Some(decl);
        }

        let suffix = format!("::{}", path);
        let mut by_suffix = self.decls.iter().filter(|(key, _)| key.ends_with(&suffix));
        if let (Some((_, decl)), None) = (by_suffix.next(), by_suffix.next()) {
            return Some(decl);
        }

        if path.contains("::") {
            return None;
        }
        let mut by_name = self.decls.values().filter(|decl| decl.name() == path);
        let first = by_name.next()?;
        if by_name.next().is_some() {
            tracing::debug!(path = %path, chosen = %first.qualified_name(), "ambiguous type name");
        }
        Some(first)
    }

    /// All declarations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDecl> {
        self.decls.values()
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

impl DescriptorProvider for TypeCatalog {
    fn describe(&self, path: &str) -> Option<&TypeDecl> {
        self.lookup(path)
    }
}
