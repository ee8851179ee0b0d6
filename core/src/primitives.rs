//! # Primitive Type Mapping
//!
//! Maps leaf Rust types (numbers, strings, dates, UUIDs, URIs, byte buffers)
//! directly to schema fragments. Some of these are structs in their home
//! crates (`Uuid`, `DateTime<Utc>`, `Decimal`); by convention they serialize
//! as strings and never become named schemas.

use crate::descriptor::TypeRef;
use crate::schema::{PrimitiveType, ResolvedSchema};

/// Trait for mapping leaf types to schemas.
pub trait TypeMapper {
    /// Maps a type to a leaf schema, or `None` when the type is not a leaf.
    fn map(&self, ty: &TypeRef) -> Option<ResolvedSchema>;

    /// Whether the type is a byte buffer serialized as a base64 string.
    fn is_byte_buffer(&self, ty: &TypeRef) -> bool;
}

/// The standard implementation of `TypeMapper` for Rust and its common crates.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustPrimitives;

impl TypeMapper for RustPrimitives {
    fn map(&self, ty: &TypeRef) -> Option<ResolvedSchema> {
        if self.is_byte_buffer(ty) {
            return Some(byte_schema());
        }
        let name = ty.simple_name()?;
        let (json_type, format) = map_name(name)?;
        Some(ResolvedSchema::primitive(json_type, format))
    }

    fn is_byte_buffer(&self, ty: &TypeRef) -> bool {
        match ty {
            TypeRef::Array { element, .. } => element.simple_name() == Some("u8"),
            TypeRef::Path { args, .. } => match ty.simple_name() {
                Some("Vec") => args.len() == 1 && args[0].simple_name() == Some("u8"),
                Some("Bytes") | Some("ByteBuf") | Some("BytesMut") => args.is_empty(),
                _ => false,
            },
            TypeRef::Tuple(_) => false,
        }
    }
}

/// Maps a simple type name to its JSON type and format.
fn map_name(name: &str) -> Option<(PrimitiveType, Option<&'static str>)> {
    use PrimitiveType::*;
    Some(match name {
        "i8" | "i16" | "i32" | "u8" | "u16" | "u32" => (Integer, Some("int32")),
        "i64" | "u64" | "i128" | "u128" | "isize" | "usize" => (Integer, Some("int64")),
        "f32" => (Number, Some("float")),
        "f64" => (Number, Some("double")),
        "bool" => (Boolean, None),
        "String" | "str" | "char" => (String, None),

        // Complex / Formats
        "Uuid" => (String, Some("uuid")),
        "NaiveDate" => (String, Some("date")),
        "NaiveDateTime" | "DateTime" | "OffsetDateTime" | "PrimitiveDateTime" | "SystemTime" => {
            (String, Some("date-time"))
        }
        "NaiveTime" => (String, Some("time")),
        "Duration" => (String, Some("duration")),
        "Decimal" | "BigDecimal" => (String, Some("decimal")),
        "Url" | "Uri" => (String, Some("uri")),
        "IpAddr" => (String, Some("ip")),
        "Ipv4Addr" => (String, Some("ipv4")),
        "Ipv6Addr" => (String, Some("ipv6")),

        // Free-form JSON
        "Value" | "JsonValue" => (Object, None),

        _ => return None,
    })
}

fn byte_schema() -> ResolvedSchema {
    ResolvedSchema::primitive(PrimitiveType::String, Some("byte"))
}

/// Whether a leaf schema can be used as a JSON object key.
pub fn is_string_schema(schema: &ResolvedSchema) -> bool {
    matches!(
        schema,
        ResolvedSchema::Primitive {
            ty: PrimitiveType::String,
            ..
        } | ResolvedSchema::Enum { .. }
    )
}
