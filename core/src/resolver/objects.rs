//! Object resolver: named structural types, guarded against self-reference.

use crate::descriptor::{TypeDecl, TypeRef};
use crate::error::AppResult;
use crate::identity::TypeIdentity;
use crate::resolver::bindings::BindingContext;
use crate::schema::ResolvedSchema;
use crate::session::InspectionSession;

impl<'p> InspectionSession<'p> {
    pub(crate) fn resolve_object(
        &mut self,
        ty: &TypeRef,
        decl: Option<&'p TypeDecl>,
        bindings: &BindingContext,
    ) -> AppResult<ResolvedSchema> {
        // 1. Object-shaped leaves (dates, UUIDs, URIs) short-circuit here
        if let Some(leaf) = self.mapper.map(ty) {
            return Ok(leaf);
        }
        let Some(decl) = decl else {
            return Ok(self.unknown(ty, "no structural descriptor"));
        };

        let identity = TypeIdentity::new(decl.qualified_name());
        let name = decl.schema_name().to_string();

        // 2. A type on the current resolution stack refers to itself
        if self.cache.is_in_flight(&identity) {
            tracing::debug!(%identity, "self-reference");
            return Ok(ResolvedSchema::reference(name));
        }

        // 3. Placeholder, members, finalize
        self.resolve_named(identity, name, |session| session.build_body(decl, bindings))
    }
}
