//! # Data Models
//!
//! Structural descriptors for user types: what a reflection pass would report
//! about a struct or enum. The engine never inspects Rust types directly; it
//! reads these records through a [`DescriptorProvider`](super::DescriptorProvider).

use crate::descriptor::type_ref::TypeRef;
use crate::schema::constraints::ConstraintBag;
use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase,
    ToUpperCamelCase,
};

/// A serde-style `rename_all` rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    /// `lowercase`
    LowerCase,
    /// `UPPERCASE`
    UpperCase,
    /// `PascalCase`
    PascalCase,
    /// `camelCase`
    CamelCase,
    /// `snake_case`
    SnakeCase,
    /// `SCREAMING_SNAKE_CASE`
    ScreamingSnakeCase,
    /// `kebab-case`
    KebabCase,
    /// `SCREAMING-KEBAB-CASE`
    ScreamingKebabCase,
}

impl RenameRule {
    /// Parses the serde spelling of a rule.
    pub fn parse(rule: &str) -> Option<Self> {
        Some(match rule {
            "lowercase" => RenameRule::LowerCase,
            "UPPERCASE" => RenameRule::UpperCase,
            "PascalCase" => RenameRule::PascalCase,
            "camelCase" => RenameRule::CamelCase,
            "snake_case" => RenameRule::SnakeCase,
            "SCREAMING_SNAKE_CASE" => RenameRule::ScreamingSnakeCase,
            "kebab-case" => RenameRule::KebabCase,
            "SCREAMING-KEBAB-CASE" => RenameRule::ScreamingKebabCase,
            _ => return None,
        })
    }

    /// Applies the rule to a field or variant name.
    pub fn apply(&self, name: &str) -> String {
        match self {
            RenameRule::LowerCase => name.to_lowercase(),
            RenameRule::UpperCase => name.to_uppercase(),
            RenameRule::PascalCase => name.to_upper_camel_case(),
            RenameRule::CamelCase => name.to_lower_camel_case(),
            RenameRule::SnakeCase => name.to_snake_case(),
            RenameRule::ScreamingSnakeCase => name.to_shouty_snake_case(),
            RenameRule::KebabCase => name.to_kebab_case(),
            RenameRule::ScreamingKebabCase => name.to_shouty_kebab_case(),
        }
    }
}

/// Where a member was declared.
///
/// Constructor members always precede body members in schema output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum MemberOrigin {
    /// Declared in the primary constructor / struct field list.
    #[default]
    Constructor,
    /// Declared in the type body (computed or late-initialized members).
    Body,
}

/// A structural member of a struct.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDescriptor {
    /// The member name as declared.
    pub name: String,
    /// The declared type.
    pub ty: TypeRef,
    /// Constructor or body member.
    pub origin: MemberOrigin,
    /// Explicit serialized name (e.g. `#[serde(rename = "...")]`).
    pub rename: Option<String>,
    /// Whether the member has a default value.
    pub has_default: bool,
    /// Whether the member is excluded from serialization.
    pub is_transient: bool,
    /// Whether the member is deprecated.
    pub is_deprecated: bool,
    /// Doc comment.
    pub description: Option<String>,
    /// Annotation-derived constraints.
    pub constraints: ConstraintBag,
}

impl MemberDescriptor {
    /// A plain constructor member with no metadata.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            origin: MemberOrigin::Constructor,
            rename: None,
            has_default: false,
            is_transient: false,
            is_deprecated: false,
            description: None,
            constraints: ConstraintBag::default(),
        }
    }

    /// Sets the explicit serialized name.
    pub fn renamed(mut self, rename: impl Into<String>) -> Self {
        self.rename = Some(rename.into());
        self
    }

    /// Marks the member as having a default value.
    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    /// Marks the member as transient.
    pub fn transient(mut self) -> Self {
        self.is_transient = true;
        self
    }

    /// Marks the member as declared in the type body.
    pub fn in_body(mut self) -> Self {
        self.origin = MemberOrigin::Body;
        self
    }

    /// Sets the doc comment.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attaches annotation constraints.
    pub fn with_constraints(mut self, constraints: ConstraintBag) -> Self {
        self.constraints = constraints;
        self
    }
}

/// A struct declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    /// The struct name.
    pub name: String,
    /// Enclosing module path, outermost first.
    pub module_path: Vec<String>,
    /// Declared type parameter names, in order.
    pub type_params: Vec<String>,
    /// Members in declaration order.
    pub members: Vec<MemberDescriptor>,
    /// Doc comment.
    pub description: Option<String>,
    /// Name override for the schema.
    pub rename: Option<String>,
    /// `rename_all` rule for members.
    pub rename_all: Option<RenameRule>,
    /// Whether the struct is deprecated.
    pub is_deprecated: bool,
}

impl StructDecl {
    /// A struct with no members in the root module.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module_path: Vec::new(),
            type_params: Vec::new(),
            members: Vec::new(),
            description: None,
            rename: None,
            rename_all: None,
            is_deprecated: false,
        }
    }

    /// Places the struct in a module.
    pub fn in_module(mut self, path: &[&str]) -> Self {
        self.module_path = path.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Declares type parameters.
    pub fn with_type_params(mut self, params: &[&str]) -> Self {
        self.type_params = params.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Appends a member.
    pub fn member(mut self, member: MemberDescriptor) -> Self {
        self.members.push(member);
        self
    }

    /// Appends a plain member parsed from a type string.
    ///
    /// Malformed type strings are kept as opaque names and later degrade to
    /// the dispatcher's unknown-type schema.
    pub fn field(self, name: &str, ty: &str) -> Self {
        let ty = TypeRef::parse(ty).unwrap_or_else(|_| TypeRef::named(ty.trim()));
        self.member(MemberDescriptor::new(name, ty))
    }
}

/// A variant of an enum.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantDecl {
    /// The variant name.
    pub name: String,
    /// Payload type for newtype variants.
    pub ty: Option<TypeRef>,
    /// Whether the variant has named fields.
    pub is_record: bool,
    /// Explicit serialized name.
    pub rename: Option<String>,
    /// Doc comment.
    pub description: Option<String>,
    /// Whether the variant is deprecated.
    pub is_deprecated: bool,
}

impl VariantDecl {
    /// A unit variant.
    pub fn unit(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            is_record: false,
            rename: None,
            description: None,
            is_deprecated: false,
        }
    }
}

/// An enum declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    /// Enum name.
    pub name: String,
    /// Enclosing module path, outermost first.
    pub module_path: Vec<String>,
    /// Declared type parameter names.
    pub type_params: Vec<String>,
    /// Variants in declaration order.
    pub variants: Vec<VariantDecl>,
    /// Doc comment.
    pub description: Option<String>,
    /// Name override for the schema.
    pub rename: Option<String>,
    /// `rename_all` rule for variants.
    pub rename_all: Option<RenameRule>,
    /// Internal tag property (`#[serde(tag = "...")]`).
    pub tag: Option<String>,
    /// Whether the enum is deprecated.
    pub is_deprecated: bool,
}

impl EnumDecl {
    /// A unit-only enum in the root module.
    pub fn unit(name: impl Into<String>, variants: &[&str]) -> Self {
        Self {
            name: name.into(),
            module_path: Vec::new(),
            type_params: Vec::new(),
            variants: variants.iter().map(|v| VariantDecl::unit(*v)).collect(),
            description: None,
            rename: None,
            rename_all: None,
            tag: None,
            is_deprecated: false,
        }
    }

    /// Whether every variant is a unit variant.
    pub fn is_unit_only(&self) -> bool {
        self.variants.iter().all(|v| v.ty.is_none() && !v.is_record)
    }

    /// The serialized name of a variant.
    pub fn variant_value(&self, variant: &VariantDecl) -> String {
        variant.rename.clone().unwrap_or_else(|| {
            self.rename_all
                .as_ref()
                .map(|rule| rule.apply(&variant.name))
                .unwrap_or_else(|| variant.name.clone())
        })
    }
}

/// Either kind of user declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDecl {
    /// A struct.
    Struct(StructDecl),
    /// An enum.
    Enum(EnumDecl),
}

impl TypeDecl {
    /// Declared name.
    pub fn name(&self) -> &str {
        match self {
            TypeDecl::Struct(s) => &s.name,
            TypeDecl::Enum(e) => &e.name,
        }
    }

    /// Enclosing module path.
    pub fn module_path(&self) -> &[String] {
        match self {
            TypeDecl::Struct(s) => &s.module_path,
            TypeDecl::Enum(e) => &e.module_path,
        }
    }

    /// Prefixes the module path with `outer`, for declarations read from a
    /// file that is itself a module.
    pub fn nest_in(&mut self, outer: &[String]) {
        let path = match self {
            TypeDecl::Struct(s) => &mut s.module_path,
            TypeDecl::Enum(e) => &mut e.module_path,
        };
        let mut nested = outer.to_vec();
        nested.append(path);
        *path = nested;
    }

    /// `module::path::Name`.
    pub fn qualified_name(&self) -> String {
        let mut parts: Vec<&str> = self.module_path().iter().map(String::as_str).collect();
        parts.push(self.name());
        parts.join("::")
    }

    /// Declared type parameters.
    pub fn type_params(&self) -> &[String] {
        match self {
            TypeDecl::Struct(s) => &s.type_params,
            TypeDecl::Enum(e) => &e.type_params,
        }
    }

    /// Schema name before generic decoration: the rename if present.
    pub fn schema_name(&self) -> &str {
        let rename = match self {
            TypeDecl::Struct(s) => s.rename.as_deref(),
            TypeDecl::Enum(e) => e.rename.as_deref(),
        };
        rename.unwrap_or_else(|| self.name())
    }
}

impl From<StructDecl> for TypeDecl {
    fn from(value: StructDecl) -> Self {
        TypeDecl::Struct(value)
    }
}

impl From<EnumDecl> for TypeDecl {
    fn from(value: EnumDecl) -> Self {
        TypeDecl::Enum(value)
    }
}
