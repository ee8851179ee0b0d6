//! Generics resolver: one named schema per distinct instantiation, named by
//! joining the base name and argument names with the session separator.

use crate::descriptor::{TypeDecl, TypeRef};
use crate::error::{AppError, AppResult};
use crate::identity::TypeIdentity;
use crate::resolver::bindings::BindingContext;
use crate::schema::ResolvedSchema;
use crate::session::InspectionSession;
use heck::ToUpperCamelCase;

impl<'p> InspectionSession<'p> {
    pub(crate) fn resolve_generic(
        &mut self,
        ty: &TypeRef,
        decl: Option<&'p TypeDecl>,
        bindings: &BindingContext,
    ) -> AppResult<ResolvedSchema> {
        // 1. Leaf types with type arguments (`DateTime<Utc>`)
        if let Some(leaf) = self.mapper.map(ty) {
            return Ok(leaf);
        }
        let Some(decl) = decl else {
            return Ok(self.unknown(ty, "generic type has no structural descriptor"));
        };

        // 2. Arity is checked before anything is registered
        let params = decl.type_params();
        let args = ty.args();
        if params.len() != args.len() {
            return Err(AppError::GenericArityMismatch {
                type_name: ty.to_string(),
                expected: params.len(),
                found: args.len(),
            });
        }

        // 3. Name and identity
        let name = self.instantiation_name(decl, args);
        let identity = TypeIdentity::with_args(
            decl.qualified_name(),
            args.iter().map(|arg| self.qualified(arg).to_string()).collect(),
        );

        // 4. Own bindings shadow the enclosing ones
        let own = BindingContext::from_pairs(params.iter().cloned().zip(args.iter().cloned()));
        let merged = bindings.merged_with(&own);
        tracing::debug!(%identity, name = %name, "generic instantiation");

        self.resolve_named(identity, name, |session| session.build_body(decl, &merged))
    }

    /// The struct or enum body of a declaration under `bindings`.
    pub(crate) fn build_body(
        &mut self,
        decl: &TypeDecl,
        bindings: &BindingContext,
    ) -> AppResult<ResolvedSchema> {
        match decl {
            TypeDecl::Struct(s) => self.object_body(s, bindings),
            TypeDecl::Enum(e) => self.enum_body(e, bindings),
        }
    }

    /// `Page` + [`Employee`] → `PageOfEmployee`.
    fn instantiation_name(&self, decl: &TypeDecl, args: &[TypeRef]) -> String {
        let mut name = decl.schema_name().to_string();
        for arg in args {
            name.push_str(&self.separator);
            name.push_str(&self.argument_name(arg));
        }
        name
    }

    /// The name segment contributed by one type argument.
    fn argument_name(&self, arg: &TypeRef) -> String {
        match arg {
            TypeRef::Path { name, args } => {
                if let Some(decl) = self.provider.describe(name) {
                    if decl.type_params().len() == args.len() {
                        return self.instantiation_name(decl, args);
                    }
                }
                let base = arg.simple_name().unwrap_or(name).to_upper_camel_case();
                args.iter().fold(base, |mut acc, inner| {
                    acc.push_str(&self.separator);
                    acc.push_str(&self.argument_name(inner));
                    acc
                })
            }
            TypeRef::Array { element, .. } => {
                format!("Array{}{}", self.separator, self.argument_name(element))
            }
            TypeRef::Tuple(items) => items.iter().fold("Tuple".to_string(), |mut acc, item| {
                acc.push_str(&self.separator);
                acc.push_str(&self.argument_name(item));
                acc
            }),
        }
    }

    /// Replaces declared names with their fully-qualified form.
    fn qualified(&self, ty: &TypeRef) -> TypeRef {
        let provider = self.provider;
        ty.map_names(&|name: &str| provider.describe(name).map(TypeDecl::qualified_name))
    }
}
