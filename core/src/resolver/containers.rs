//! Array, collection and map resolvers. Element and value types always
//! re-enter the dispatcher.

use crate::descriptor::{TypeDecl, TypeRef};
use crate::error::{AppError, AppResult};
use crate::primitives::is_string_schema;
use crate::resolver::bindings::BindingContext;
use crate::schema::constraints::ConstraintBag;
use crate::schema::{PrimitiveType, ResolvedSchema};
use crate::session::InspectionSession;

impl<'p> InspectionSession<'p> {
    /// `[T; N]` / `[T]`. Primitive elements map straight from the leaf table
    /// unless a custom override claims them.
    pub(crate) fn resolve_array(
        &mut self,
        element: &TypeRef,
        len: Option<usize>,
        bindings: &BindingContext,
    ) -> AppResult<ResolvedSchema> {
        let leaf = match self.custom_types.lookup(element) {
            Some(_) => None,
            None => self.mapper.map(element),
        };
        let items = match leaf {
            Some(leaf) => leaf,
            None => self.resolve_in(element, bindings)?,
        };
        Ok(ResolvedSchema::Array {
            items: Box::new(items),
            unique_items: false,
            constraints: ConstraintBag {
                min_items: len,
                max_items: len,
                ..Default::default()
            },
        })
    }

    pub(crate) fn resolve_collection(
        &mut self,
        element: &TypeRef,
        unique: bool,
        bindings: &BindingContext,
    ) -> AppResult<ResolvedSchema> {
        let items = self.resolve_in(element, bindings)?;
        Ok(ResolvedSchema::Array {
            items: Box::new(items),
            unique_items: unique,
            constraints: ConstraintBag::default(),
        })
    }

    /// Maps serialize as JSON objects, so keys must be string-like.
    pub(crate) fn resolve_map(
        &mut self,
        map: &TypeRef,
        key: &TypeRef,
        value: &TypeRef,
        bindings: &BindingContext,
    ) -> AppResult<ResolvedSchema> {
        if !self.is_string_key(key) {
            return Err(AppError::InvalidKeyType {
                type_name: map.to_string(),
                key_type: key.to_string(),
            });
        }
        let value = self.resolve_in(value, bindings)?;
        Ok(ResolvedSchema::map_of(value))
    }

    /// Strings, string-typed overrides, unit enums and newtypes over those.
    fn is_string_key(&self, key: &TypeRef) -> bool {
        let (key, _) = key.peel();
        if let Some(custom) = self.custom_types.lookup(key) {
            return custom.ty == PrimitiveType::String;
        }
        if let Some(leaf) = self.mapper.map(key) {
            return is_string_schema(&leaf);
        }
        let TypeRef::Path { name, args } = key else {
            return false;
        };
        if !args.is_empty() {
            return false;
        }
        match self.provider.describe(name) {
            Some(TypeDecl::Enum(e)) => e.is_unit_only(),
            Some(TypeDecl::Struct(s)) => match s.members.as_slice() {
                [only] if only.name == "0" && only.ty != *key => self.is_string_key(&only.ty),
                _ => false,
            },
            None => false,
        }
    }
}
