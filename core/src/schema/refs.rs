//! # Reference Utilities
//!
//! Builds and decodes `$ref` strings for named schemas. Names are escaped as
//! JSON Pointer segments (RFC 6901) and then percent-encoded for use in a URI
//! fragment.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

/// Prefix of every reference into the OpenAPI components namespace.
pub const COMPONENTS_PREFIX: &str = "#/components/schemas/";

/// Prefix used by standalone JSON Schema bundles.
pub const DEFS_PREFIX: &str = "#/$defs/";

/// Characters that may not appear raw in a URI fragment.
const FRAGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b']')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Escapes a name as a JSON Pointer segment (`~` → `~0`, `/` → `~1`).
pub fn encode_pointer_segment(name: &str) -> String {
    name.replace('~', "~0").replace('/', "~1")
}

/// Reverses [`encode_pointer_segment`].
pub fn decode_pointer_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Builds a `$ref` string for `name` under `prefix`.
pub fn schema_ref(prefix: &str, name: &str) -> String {
    let segment = encode_pointer_segment(name);
    format!("{}{}", prefix, utf8_percent_encode(&segment, FRAGMENT))
}

/// `#/components/schemas/{name}`.
pub fn component_ref(name: &str) -> String {
    schema_ref(COMPONENTS_PREFIX, name)
}

/// Extracts the schema name from a `$ref` under `prefix`.
pub fn schema_name_from_ref(prefix: &str, reference: &str) -> Option<String> {
    let segment = reference.strip_prefix(prefix)?;
    if segment.is_empty() || segment.contains('/') {
        return None;
    }
    let decoded = percent_decode_str(segment).decode_utf8().ok()?;
    Some(decode_pointer_segment(&decoded))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_ref_plain_name() {
        assert_eq!(component_ref("PageOfEmployee"), "#/components/schemas/PageOfEmployee");
    }

    #[test]
    fn test_component_ref_escapes() {
        let r = component_ref("a/b~c d");
        assert_eq!(r, "#/components/schemas/a~1b~0c%20d");
        assert_eq!(
            schema_name_from_ref(COMPONENTS_PREFIX, &r).as_deref(),
            Some("a/b~c d")
        );
    }

    #[test]
    fn test_name_from_foreign_ref() {
        assert_eq!(schema_name_from_ref(COMPONENTS_PREFIX, "#/$defs/User"), None);
        assert_eq!(
            schema_name_from_ref(DEFS_PREFIX, "#/$defs/User").as_deref(),
            Some("User")
        );
    }
}
