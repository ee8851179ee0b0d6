//! Property resolver: walks a struct's members in declaration order and
//! resolves each through the dispatcher.

use crate::descriptor::{MemberDescriptor, StructDecl};
use crate::error::AppResult;
use crate::resolver::bindings::BindingContext;
use crate::schema::constraints::apply_constraints;
use crate::schema::{ObjectDescriptor, PropertySchema, ResolvedSchema};
use crate::session::InspectionSession;

impl<'p> InspectionSession<'p> {
    pub(crate) fn object_body(
        &mut self,
        decl: &StructDecl,
        bindings: &BindingContext,
    ) -> AppResult<ResolvedSchema> {
        let mut object = ObjectDescriptor {
            description: decl.description.clone(),
            is_deprecated: decl.is_deprecated,
            ..Default::default()
        };

        let qualified_owner = {
            let mut parts = decl.module_path.clone();
            parts.push(decl.name.clone());
            parts.join("::")
        };

        // Constructor members first; the sort is stable within each origin
        let mut members: Vec<&MemberDescriptor> = decl.members.iter().collect();
        members.sort_by_key(|m| m.origin);

        for member in members {
            if member.is_transient {
                object.transient.push(member.name.clone());
                continue;
            }

            let serialized = member
                .rename
                .clone()
                .or_else(|| decl.rename_all.map(|rule| rule.apply(&member.name)))
                .unwrap_or_else(|| member.name.clone());

            let ty = self.qualify(&member.ty, &decl.module_path, bindings);
            let ty = bindings.substitute(&ty);
            let (_, is_nullable) = ty.peel();
            let schema = self.resolve_in(&ty, bindings)?;

            let bag = match self
                .constraints
                .lookup(&qualified_owner, &decl.name, &member.name)
            {
                Some(registered) => member.constraints.clone().overlay(registered),
                None => member.constraints.clone(),
            };
            let description = bag.description.clone().or_else(|| member.description.clone());
            let schema = apply_constraints(schema, &bag);

            let is_required = !is_nullable && !member.has_default;
            if is_required {
                object.required.insert(serialized.clone());
            }
            object.properties.insert(
                serialized.clone(),
                PropertySchema {
                    schema,
                    is_nullable,
                    is_required,
                    renamed_from: (serialized != member.name).then(|| member.name.clone()),
                    description,
                    is_deprecated: member.is_deprecated,
                },
            );
        }

        Ok(ResolvedSchema::Object(object))
    }
}
