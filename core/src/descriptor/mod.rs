//! # Descriptor Module
//!
//! Structural descriptions of user types, and the provider boundary the
//! engine reads them through. The bundled provider is [`TypeCatalog`], filled
//! by hand or from Rust source via the rust-analyzer syntax library.

pub mod attributes;
pub mod catalog;
pub mod extractors;
pub mod models;
pub mod type_ref;

pub use catalog::TypeCatalog;
pub use extractors::{catalog_from_source, extract_declarations};
pub use models::{
    EnumDecl, MemberDescriptor, MemberOrigin, RenameRule, StructDecl, TypeDecl, VariantDecl,
};
pub use type_ref::TypeRef;

/// Supplies structural declarations for named types.
pub trait DescriptorProvider {
    /// Describes the type at `path`, or `None` when the type is unknown.
    fn describe(&self, path: &str) -> Option<&TypeDecl>;
}
