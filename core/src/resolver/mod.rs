//! # Resolver Dispatcher
//!
//! Classifies a type and delegates to the matching resolver. The decision
//! order is fixed: custom override, array, collection, map, enum, generic
//! instantiation, object, then the unknown-type fallback. Named results
//! (enums, generic instantiations, objects) are registered once and returned
//! as references.

pub mod bindings;
mod containers;
mod enums;
mod generics;
mod objects;
mod properties;

use crate::custom::CustomSchema;
use crate::descriptor::{EnumDecl, TypeDecl, TypeRef};
use crate::error::AppResult;
use crate::identity::TypeIdentity;
use crate::report::Diagnostic;
use crate::schema::ResolvedSchema;
use crate::session::InspectionSession;
use bindings::BindingContext;

/// Ordered homogeneous containers.
const SEQUENCES: &[&str] = &["Vec", "VecDeque", "LinkedList", "BinaryHeap"];
/// Containers with set semantics.
const SETS: &[&str] = &["HashSet", "BTreeSet", "IndexSet"];
/// Key/value containers.
const MAPS: &[&str] = &["HashMap", "BTreeMap", "IndexMap"];
/// Named types that may be mid-resolution at once. Polymorphic recursion
/// (`Tree<T>` holding `Tree<Tree<T>>`) never hits the cache and stops here.
pub(crate) const MAX_NAMED_DEPTH: usize = 32;

/// The classification of one type, in dispatch order.
#[derive(Debug)]
pub(crate) enum TypeKind<'t, 'p> {
    /// A registered override.
    Custom(CustomSchema),
    /// A base64 byte buffer.
    Bytes,
    /// `[T; N]` or `[T]`.
    Array {
        element: &'t TypeRef,
        len: Option<usize>,
    },
    /// A sequence or set of one element type.
    Collection { element: &'t TypeRef, unique: bool },
    /// A key/value container.
    Map { key: &'t TypeRef, value: &'t TypeRef },
    /// A non-generic enum declaration.
    Enum(&'p EnumDecl),
    /// A type with generic arguments or a generic declaration.
    Generic(Option<&'p TypeDecl>),
    /// Anything else with a name.
    Object(Option<&'p TypeDecl>),
    /// Tuples and other shapes without a schema.
    Unknown,
}

impl<'p> InspectionSession<'p> {
    /// Resolves `ty` under an enclosing binding context.
    ///
    /// Structural errors (invalid map keys, generic arity mismatches)
    /// propagate. Unclassifiable types degrade to a free-form object and a
    /// diagnostic.
    pub fn resolve_in(
        &mut self,
        ty: &TypeRef,
        bindings: &BindingContext,
    ) -> AppResult<ResolvedSchema> {
        // 1. Substitute bound type parameters
        let substituted = bindings.substitute(ty);

        // 2. Nullability and transparent wrappers belong to the member, not the schema
        let (ty, _) = substituted.peel();

        // 3. Classify and delegate
        match self.classify(ty) {
            TypeKind::Custom(custom) => Ok(custom.to_schema()),
            TypeKind::Bytes => Ok(self
                .mapper
                .map(ty)
                .unwrap_or_else(ResolvedSchema::unknown_object)),
            TypeKind::Array { element, len } => self.resolve_array(element, len, bindings),
            TypeKind::Collection { element, unique } => {
                self.resolve_collection(element, unique, bindings)
            }
            TypeKind::Map { key, value } => self.resolve_map(ty, key, value, bindings),
            TypeKind::Enum(decl) => self.resolve_enum(decl, bindings),
            TypeKind::Generic(decl) => self.resolve_generic(ty, decl, bindings),
            TypeKind::Object(decl) => self.resolve_object(ty, decl, bindings),
            TypeKind::Unknown => Ok(self.unknown(ty, "type has no schema representation")),
        }
    }

    pub(crate) fn classify<'t>(&self, ty: &'t TypeRef) -> TypeKind<'t, 'p> {
        if let Some(custom) = self.custom_types.lookup(ty) {
            return TypeKind::Custom(custom.clone());
        }
        if self.mapper.is_byte_buffer(ty) {
            return TypeKind::Bytes;
        }

        let (name, args) = match ty {
            TypeRef::Array { element, len } => {
                return TypeKind::Array {
                    element: &**element,
                    len: *len,
                }
            }
            TypeRef::Tuple(_) => return TypeKind::Unknown,
            TypeRef::Path { name, args } => (name, args),
        };

        let simple = ty.simple_name().unwrap_or(name);
        if args.len() == 1 && (SEQUENCES.contains(&simple) || SETS.contains(&simple)) {
            return TypeKind::Collection {
                element: &args[0],
                unique: SETS.contains(&simple),
            };
        }
        if args.len() >= 2 && MAPS.contains(&simple) {
            return TypeKind::Map {
                key: &args[0],
                value: &args[1],
            };
        }

        let provider = self.provider;
        let decl = provider.describe(name);
        match decl {
            Some(TypeDecl::Enum(e)) if e.type_params.is_empty() && args.is_empty() => {
                TypeKind::Enum(e)
            }
            _ if !args.is_empty() || decl.is_some_and(|d| !d.type_params().is_empty()) => {
                TypeKind::Generic(decl)
            }
            _ => TypeKind::Object(decl),
        }
    }

    /// Registers `identity` under `name` and resolves its body, or returns a
    /// reference to the existing entry.
    ///
    /// The placeholder is registered before `build` runs, so recursive
    /// references inside the body find it. A failed build discards it.
    /// Past [`MAX_NAMED_DEPTH`] nested registrations the type degrades to a
    /// free-form object.
    pub(crate) fn resolve_named<F>(
        &mut self,
        identity: TypeIdentity,
        name: String,
        build: F,
    ) -> AppResult<ResolvedSchema>
    where
        F: FnOnce(&mut Self) -> AppResult<ResolvedSchema>,
    {
        if let Some(entry) = self.cache.get(&identity) {
            tracing::debug!(%identity, name = %entry.name, "schema cache hit");
            return Ok(ResolvedSchema::reference(entry.name.clone()));
        }
        if self.cache.depth() >= MAX_NAMED_DEPTH {
            return Ok(self.degrade(identity.to_string(), "recursion limit reached"));
        }

        self.cache.register_placeholder(identity.clone(), name.clone());
        self.cache.begin(&identity);
        let body = build(self);
        self.cache.end(&identity);

        match body {
            Ok(schema) => {
                self.cache.finalize(&identity, schema);
                Ok(ResolvedSchema::reference(name))
            }
            Err(e) => {
                self.cache.discard(&identity);
                Err(e)
            }
        }
    }

    /// Qualifies every path in `ty` against a declaring module, so a member
    /// of `mod b` typed `User` means `b::User`. Bound parameters are skipped.
    pub(crate) fn qualify(
        &self,
        ty: &TypeRef,
        module_path: &[String],
        bindings: &BindingContext,
    ) -> TypeRef {
        if module_path.is_empty() {
            return ty.clone();
        }
        let provider = self.provider;
        ty.map_names(&|name: &str| {
            if bindings.is_bound(name) {
                return None;
            }
            let mut base: Vec<&str> = module_path.iter().map(String::as_str).collect();
            let mut rest = name;
            while let Some(stripped) = rest.strip_prefix("super::") {
                base.pop();
                rest = stripped;
            }
            rest = rest.strip_prefix("self::").unwrap_or(rest);

            let candidate_at = |depth: usize| {
                let mut parts = base[..depth].to_vec();
                parts.push(rest);
                parts.join("::")
            };
            (0..=base.len())
                .rev()
                .map(candidate_at)
                .find(|candidate| {
                    provider
                        .describe(candidate)
                        .is_some_and(|decl| decl.qualified_name() == *candidate)
                })
                .or_else(|| (rest != name).then(|| candidate_at(base.len())))
        })
    }

    /// The fallback for types with no structural description.
    pub(crate) fn unknown(&mut self, ty: &TypeRef, reason: &str) -> ResolvedSchema {
        self.degrade(ty.to_string(), reason)
    }

    fn degrade(&mut self, type_name: String, reason: &str) -> ResolvedSchema {
        tracing::warn!(%type_name, reason, "unclassifiable type, emitting free-form object");
        let diagnostic = Diagnostic {
            type_name,
            message: reason.to_string(),
        };
        if !self.diagnostics.contains(&diagnostic) {
            self.diagnostics.push(diagnostic);
        }
        ResolvedSchema::unknown_object()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custom::{CustomSchema, CustomTypeRegistry};
    use crate::descriptor::{EnumDecl, StructDecl, TypeCatalog};
    use crate::error::AppError;
    use crate::schema::PrimitiveType;

    fn catalog() -> TypeCatalog {
        TypeCatalog::new()
            .with(EnumDecl::unit("Status", &["Active", "Inactive"]))
            .with(StructDecl::new("Page").with_type_params(&["T"]).field("items", "Vec<T>"))
            .with(StructDecl::new("Employee").field("name", "String"))
    }

    fn kind_name(session: &InspectionSession<'_>, ty: &str) -> &'static str {
        let ty = TypeRef::parse(ty).unwrap();
        match session.classify(&ty) {
            TypeKind::Custom(_) => "custom",
            TypeKind::Bytes => "bytes",
            TypeKind::Array { .. } => "array",
            TypeKind::Collection { unique: false, .. } => "collection",
            TypeKind::Collection { unique: true, .. } => "set",
            TypeKind::Map { .. } => "map",
            TypeKind::Enum(_) => "enum",
            TypeKind::Generic(_) => "generic",
            TypeKind::Object(_) => "object",
            TypeKind::Unknown => "unknown",
        }
    }

    #[test]
    fn test_decision_order() {
        let catalog = catalog();
        let custom = CustomTypeRegistry::new().with(
            "Vec<Employee>",
            CustomSchema::new(PrimitiveType::String, Some("csv")),
        );
        let session = InspectionSession::new(&catalog).with_custom_types(custom);

        let cases = vec![
            ("Vec<Employee>", "custom"),
            ("Vec<u8>", "bytes"),
            ("[Employee; 3]", "array"),
            ("Vec<Page<Employee>>", "collection"),
            ("BTreeSet<String>", "set"),
            ("HashMap<String, Page<Employee>>", "map"),
            ("Status", "enum"),
            ("Page<Employee>", "generic"),
            ("Employee", "object"),
            ("i32", "object"),
            ("(i32, i32)", "unknown"),
        ];
        for (ty, expected) in cases {
            assert_eq!(kind_name(&session, ty), expected, "{ty}");
        }
    }

    #[test]
    fn test_custom_override_wins() {
        let catalog = catalog();
        let custom = CustomTypeRegistry::new()
            .with("Employee", CustomSchema::new(PrimitiveType::String, Some("ref")));
        let mut session = InspectionSession::new(&catalog).with_custom_types(custom);
        assert_eq!(
            session.resolve_str("Employee").unwrap(),
            ResolvedSchema::primitive(PrimitiveType::String, Some("ref"))
        );
        assert!(session.named_schemas().is_empty());
    }

    #[test]
    fn test_unknown_type_degrades_with_diagnostic() {
        let catalog = catalog();
        let mut session = InspectionSession::new(&catalog);
        let schema = session.resolve_str("Option<Box<Mystery>>").unwrap();
        assert_eq!(schema, ResolvedSchema::unknown_object());
        session.resolve_str("Mystery").unwrap();
        assert_eq!(session.diagnostics().len(), 1);
        assert_eq!(session.diagnostics()[0].type_name, "Mystery");
    }

    #[test]
    fn test_failed_body_discards_placeholder() {
        let catalog = TypeCatalog::new().with(
            StructDecl::new("Bad")
                .field("ok", "String")
                .field("scores", "HashMap<i32, String>"),
        );
        let mut session = InspectionSession::new(&catalog);
        let err = session.resolve_str("Bad").unwrap_err();
        assert!(matches!(err, AppError::InvalidKeyType { .. }));
        assert_eq!(session.entries().count(), 0);
    }

    #[test]
    fn test_qualify_against_module() {
        let catalog = TypeCatalog::new()
            .with(StructDecl::new("User").in_module(&["a"]))
            .with(StructDecl::new("User").in_module(&["b"]))
            .with(StructDecl::new("Shared").in_module(&["b"]));
        let session = InspectionSession::new(&catalog);
        let module = vec!["b".to_string(), "inner".to_string()];
        let ty = TypeRef::parse("Vec<User>").unwrap();
        assert_eq!(
            session
                .qualify(&ty, &module, &BindingContext::empty())
                .to_string(),
            "Vec<b::User>"
        );
        let ty = TypeRef::parse("super::super::a::User").unwrap();
        assert_eq!(
            session
                .qualify(&ty, &module, &BindingContext::empty())
                .to_string(),
            "a::User"
        );
    }
}
