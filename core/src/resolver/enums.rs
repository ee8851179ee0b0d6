//! Enum resolver. Unit-only enums become a closed set of strings; enums with
//! newtype variants become a `oneOf` over the variant payloads.

use crate::descriptor::{EnumDecl, TypeRef};
use crate::error::AppResult;
use crate::identity::TypeIdentity;
use crate::resolver::bindings::BindingContext;
use crate::schema::constraints::ConstraintBag;
use crate::schema::{CompositionKind, ResolvedSchema};
use crate::session::InspectionSession;

impl<'p> InspectionSession<'p> {
    pub(crate) fn resolve_enum(
        &mut self,
        decl: &'p EnumDecl,
        bindings: &BindingContext,
    ) -> AppResult<ResolvedSchema> {
        let identity = TypeIdentity::new(qualified_enum_name(decl));
        let name = decl.rename.clone().unwrap_or_else(|| decl.name.clone());
        self.resolve_named(identity, name, |session| session.enum_body(decl, bindings))
    }

    pub(crate) fn enum_body(
        &mut self,
        decl: &EnumDecl,
        bindings: &BindingContext,
    ) -> AppResult<ResolvedSchema> {
        let description_bag = || ConstraintBag {
            description: decl.description.clone(),
            ..Default::default()
        };

        if decl.is_unit_only() {
            return Ok(ResolvedSchema::Enum {
                values: decl.variants.iter().map(|v| decl.variant_value(v)).collect(),
                constraints: description_bag(),
            });
        }

        let mut members = Vec::with_capacity(decl.variants.len());
        for variant in &decl.variants {
            let member = match &variant.ty {
                Some(ty) => {
                    let ty = self.qualify(ty, &decl.module_path, bindings);
                    self.resolve_in(&ty, bindings)?
                }
                None if variant.is_record => {
                    let path = TypeRef::named(format!("{}::{}", decl.name, variant.name));
                    self.unknown(&path, "struct-like variant has no structural descriptor")
                }
                None => ResolvedSchema::Enum {
                    values: vec![decl.variant_value(variant)],
                    constraints: ConstraintBag {
                        description: variant.description.clone(),
                        ..Default::default()
                    },
                },
            };
            members.push(member);
        }

        Ok(ResolvedSchema::Composition {
            kind: CompositionKind::OneOf,
            members,
            discriminator: decl.tag.clone(),
            description: decl.description.clone(),
        })
    }
}

fn qualified_enum_name(decl: &EnumDecl) -> String {
    let mut parts = decl.module_path.clone();
    parts.push(decl.name.clone());
    parts.join("::")
}

#[cfg(test)]
mod tests {
    use crate::descriptor::{EnumDecl, RenameRule, StructDecl, TypeCatalog, TypeRef, VariantDecl};
    use crate::schema::ResolvedSchema;
    use crate::session::InspectionSession;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_unit_enum_values_in_order() {
        let mut status = EnumDecl::unit("Status", &["Active", "OnHold", "Closed"]);
        status.rename_all = Some(RenameRule::SnakeCase);
        status.description = Some("Lifecycle.".into());
        let catalog = TypeCatalog::new().with(status);
        let mut session = InspectionSession::new(&catalog);

        assert_eq!(
            session.resolve_str("Status").unwrap(),
            ResolvedSchema::reference("Status")
        );
        assert_eq!(
            session.components_json()["Status"],
            json!({ "type": "string", "enum": ["active", "on_hold", "closed"], "description": "Lifecycle." })
        );
    }

    #[test]
    fn test_enum_is_cached() {
        let catalog = TypeCatalog::new().with(EnumDecl::unit("Status", &["A"]));
        let mut session = InspectionSession::new(&catalog);
        session.resolve_str("Status").unwrap();
        session.resolve_str("Option<Status>").unwrap();
        assert_eq!(session.entries().count(), 1);
    }

    #[test]
    fn test_data_enum_one_of_with_discriminator() {
        let mut pet = EnumDecl::unit("Pet", &["Fish"]);
        pet.variants.insert(
            0,
            VariantDecl {
                ty: Some(TypeRef::named("Cat")),
                ..VariantDecl::unit("Cat")
            },
        );
        pet.tag = Some("kind".into());
        let catalog = TypeCatalog::new()
            .with(pet)
            .with(StructDecl::new("Cat").field("lives", "u8"));
        let mut session = InspectionSession::new(&catalog);
        session.resolve_str("Pet").unwrap();

        assert_eq!(
            session.components_json()["Pet"],
            json!({
                "oneOf": [
                    { "$ref": "#/components/schemas/Cat" },
                    { "type": "string", "enum": ["Fish"] }
                ],
                "discriminator": { "propertyName": "kind" }
            })
        );
        assert_eq!(
            session.named_schemas().keys().copied().collect::<Vec<_>>(),
            vec!["Pet", "Cat"]
        );
    }

    #[test]
    fn test_record_variant_does_not_alias_a_struct() {
        let catalog = TypeCatalog::new()
            .with(StructDecl::new("Walk").field("miles", "u32"))
            .with(EnumDecl {
                variants: vec![
                    VariantDecl {
                        ty: Some(TypeRef::named("u32")),
                        ..VariantDecl::unit("Run")
                    },
                    VariantDecl {
                        is_record: true,
                        ..VariantDecl::unit("Walk")
                    },
                ],
                ..EnumDecl::unit("Activity", &[])
            });
        let mut session = InspectionSession::new(&catalog);
        session.resolve_str("Activity").unwrap();

        assert_eq!(
            session.components_json()["Activity"],
            json!({
                "oneOf": [
                    { "type": "integer", "format": "int32" },
                    { "type": "object" }
                ]
            })
        );
        assert!(session.named_schemas().get("Walk").is_none());
        assert_eq!(session.diagnostics().len(), 1);
        assert_eq!(session.diagnostics()[0].type_name, "Activity::Walk");
    }
}
