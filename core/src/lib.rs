#![deny(missing_docs)]

//! # Typeschema Core
//!
//! Derives OpenAPI 3.1 schemas from Rust type declarations.
//!
//! Declarations come from a [`DescriptorProvider`] (usually a [`TypeCatalog`]
//! loaded from source text). An [`InspectionSession`] resolves types into
//! [`ResolvedSchema`] values, registering each named schema once and breaking
//! cycles with placeholders. The [`SchemaComposer`] turns endpoint operations
//! into a full [`Document`].
//!
//! ```
//! use typeschema_core::{catalog_from_source, InspectionSession, ResolvedSchema};
//!
//! let catalog = catalog_from_source(
//!     "pub struct Employee { pub id: Uuid, pub name: String, pub manager: Option<Box<Employee>> }",
//! )
//! .unwrap();
//! let mut session = InspectionSession::new(&catalog);
//! let schema = session.resolve_str("Employee").unwrap();
//! assert_eq!(schema, ResolvedSchema::reference("Employee"));
//! assert_eq!(session.named_schemas().len(), 1);
//! ```

/// Shared error types.
pub mod error;

/// Structural type descriptions and the Rust source adapter.
pub mod descriptor;

/// Resolved schemas, constraints and `$ref` helpers.
pub mod schema;

/// Leaf type mapping (Rust -> JSON).
pub mod primitives;

/// User-declared type overrides.
pub mod custom;

/// Cache keys for structural types.
pub mod identity;

/// Per-build state: cache, registry, diagnostics.
pub mod session;

/// Type classification and the per-kind resolvers.
pub mod resolver;

/// Schema name conflict detection.
pub mod conflicts;

/// Non-fatal build findings.
pub mod report;

/// Document assembly from endpoint operations.
pub mod composer;

pub use composer::document::{ApiInfo, Document};
pub use composer::operations::{
    BodySlot, EndpointOperation, HttpMethod, ParameterLocation, ParameterSlot, ResponseSlot,
};
pub use composer::SchemaComposer;
pub use conflicts::{detect_conflicts, Conflict};
pub use custom::{CustomSchema, CustomTypeRegistry};
pub use descriptor::{
    catalog_from_source, extract_declarations, DescriptorProvider, TypeCatalog, TypeDecl, TypeRef,
};
pub use error::{AppError, AppResult};
pub use identity::TypeIdentity;
pub use primitives::{RustPrimitives, TypeMapper};
pub use report::{Diagnostic, InspectionReport};
pub use resolver::bindings::BindingContext;
pub use schema::constraints::{ConstraintBag, ConstraintRegistry};
pub use schema::{CompositionKind, ObjectDescriptor, PrimitiveType, PropertySchema, ResolvedSchema};
pub use session::InspectionSession;
