//! # Generics Binding Context
//!
//! Maps type parameter names to concrete types for one generic
//! instantiation. Contexts are immutable: merging produces a new context.

use crate::descriptor::TypeRef;
use indexmap::IndexMap;

/// Type parameter → concrete type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingContext {
    bindings: IndexMap<String, TypeRef>,
}

impl BindingContext {
    /// A context that binds nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a context from `(parameter, type)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, TypeRef)>,
    {
        Self {
            bindings: pairs.into_iter().collect(),
        }
    }

    /// The type bound to `param`.
    pub fn get(&self, param: &str) -> Option<&TypeRef> {
        self.bindings.get(param)
    }

    /// Whether `param` is bound.
    pub fn is_bound(&self, param: &str) -> bool {
        self.bindings.contains_key(param)
    }

    /// Whether the context binds nothing.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// A new context with `inner` layered on top; `inner` wins on shared names.
    pub fn merged_with(&self, inner: &BindingContext) -> BindingContext {
        let mut bindings = self.bindings.clone();
        for (param, ty) in &inner.bindings {
            bindings.insert(param.clone(), ty.clone());
        }
        BindingContext { bindings }
    }

    /// Replaces every bound parameter inside `ty`, at any depth.
    ///
    /// Substituted types are not substituted again, so `T → Vec<T>` is safe.
    pub fn substitute(&self, ty: &TypeRef) -> TypeRef {
        if self.bindings.is_empty() {
            return ty.clone();
        }
        match ty {
            TypeRef::Path { name, args } if args.is_empty() => match self.bindings.get(name) {
                Some(bound) => bound.clone(),
                None => ty.clone(),
            },
            TypeRef::Path { name, args } => TypeRef::Path {
                name: name.clone(),
                args: args.iter().map(|a| self.substitute(a)).collect(),
            },
            TypeRef::Array { element, len } => TypeRef::Array {
                element: Box::new(self.substitute(element)),
                len: *len,
            },
            TypeRef::Tuple(items) => TypeRef::Tuple(items.iter().map(|i| self.substitute(i)).collect()),
        }
    }
}
