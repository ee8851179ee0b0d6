//! # Attribute Operations
//!
//! Reads `#[serde(...)]`, `#[schema(...)]` and `#[deprecated]` attributes off
//! a syntax node.

use crate::descriptor::models::RenameRule;
use crate::schema::constraints::ConstraintBag;
use ra_ap_syntax::ast::{self};
use ra_ap_syntax::{AstNode, SyntaxNode};
use regex::Regex;
use std::str::FromStr;
use std::sync::OnceLock;

/// Attributes extracted from a single node.
#[derive(Default, Debug)]
pub struct AttrInfo {
    /// The rename value if present.
    pub rename: Option<String>,
    /// The `rename_all` rule if present and recognized.
    pub rename_all: Option<RenameRule>,
    /// Whether `skip` / `skip_serializing` was found.
    pub is_skipped: bool,
    /// Whether `default` was found.
    pub has_default: bool,
    /// The tag value (for enums) if present.
    pub tag: Option<String>,
    /// Whether the untagged flag was found (for enums).
    pub untagged: bool,
    /// Whether `#[deprecated]` is present.
    pub is_deprecated: bool,
    /// Constraints from `#[schema(...)]`.
    pub constraints: ConstraintBag,
}

/// Analyzes the attributes on a node.
pub fn extract_attributes(node: &SyntaxNode) -> AttrInfo {
    let mut info = AttrInfo::default();

    for attr in node.children().filter_map(ast::Attr::cast) {
        let Some(meta) = attr.meta() else {
            continue;
        };
        let Some(path) = meta.path() else {
            continue;
        };
        let content = meta
            .token_tree()
            .map(|tt| tt.to_string())
            .unwrap_or_default();

        match path.to_string().as_str() {
            "serde" => parse_serde_content(&content, &mut info),
            "schema" => parse_schema_content(&content, &mut info.constraints),
            "deprecated" => info.is_deprecated = true,
            _ => {}
        }
    }

    info
}

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("Invalid regex"))
}

fn capture(re: &Regex, content: &str) -> Option<String> {
    re.captures(content)
        .and_then(|caps| caps.get(1))
        .map(|val| val.as_str().to_string())
}

/// Parses the inner content of a `#[serde(...)]` attribute.
fn parse_serde_content(content: &str, info: &mut AttrInfo) {
    static RENAME_RE: OnceLock<Regex> = OnceLock::new();
    static RENAME_ALL_RE: OnceLock<Regex> = OnceLock::new();
    static SKIP_RE: OnceLock<Regex> = OnceLock::new();
    static DEFAULT_RE: OnceLock<Regex> = OnceLock::new();
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    static UNTAGGED_RE: OnceLock<Regex> = OnceLock::new();
    static STRING_RE: OnceLock<Regex> = OnceLock::new();

    let rename_re = regex(&RENAME_RE, r#"\brename\s*=\s*"([^"]+)""#);
    let rename_all_re = regex(&RENAME_ALL_RE, r#"\brename_all\s*=\s*"([^"]+)""#);
    let skip_re = regex(&SKIP_RE, r"\bskip(_serializing)?\b");
    let default_re = regex(&DEFAULT_RE, r"\bdefault\b");
    let tag_re = regex(&TAG_RE, r#"\btag\s*=\s*"([^"]+)""#);
    let untagged_re = regex(&UNTAGGED_RE, r"\buntagged\b");
    let string_re = regex(&STRING_RE, r#""(?:[^"\\]|\\.)*""#);

    // Flag keys are matched with string values blanked out
    let keys = string_re.replace_all(content, "\"\"");

    if let Some(val) = capture(rename_re, content) {
        info.rename = Some(val);
    }
    if let Some(val) = capture(rename_all_re, content) {
        info.rename_all = RenameRule::parse(&val);
        if info.rename_all.is_none() {
            tracing::warn!(rule = %val, "unrecognized rename_all rule");
        }
    }
    if skip_re.is_match(&keys) {
        info.is_skipped = true;
    }
    if default_re.is_match(&keys) {
        info.has_default = true;
    }
    if let Some(val) = capture(tag_re, content) {
        info.tag = Some(val);
    }
    if untagged_re.is_match(&keys) {
        info.untagged = true;
    }
}

/// Parses the inner content of a `#[schema(...)]` attribute.
fn parse_schema_content(content: &str, bag: &mut ConstraintBag) {
    static MIN_LENGTH_RE: OnceLock<Regex> = OnceLock::new();
    static MAX_LENGTH_RE: OnceLock<Regex> = OnceLock::new();
    static MINIMUM_RE: OnceLock<Regex> = OnceLock::new();
    static MAXIMUM_RE: OnceLock<Regex> = OnceLock::new();
    static PATTERN_RE: OnceLock<Regex> = OnceLock::new();
    static MIN_ITEMS_RE: OnceLock<Regex> = OnceLock::new();
    static MAX_ITEMS_RE: OnceLock<Regex> = OnceLock::new();

    fn number<T: FromStr>(re: &Regex, content: &str) -> Option<T> {
        capture(re, content).and_then(|raw| raw.replace('_', "").parse().ok())
    }

    let min_length = regex(&MIN_LENGTH_RE, r"\bmin_length\s*=\s*([\d_]+)");
    let max_length = regex(&MAX_LENGTH_RE, r"\bmax_length\s*=\s*([\d_]+)");
    let minimum = regex(&MINIMUM_RE, r"\bminimum\s*=\s*(-?[\d_]+(?:\.[\d_]+)?)");
    let maximum = regex(&MAXIMUM_RE, r"\bmaximum\s*=\s*(-?[\d_]+(?:\.[\d_]+)?)");
    let pattern = regex(&PATTERN_RE, r#"\bpattern\s*=\s*"((?:[^"\\]|\\.)*)""#);
    let min_items = regex(&MIN_ITEMS_RE, r"\bmin_items\s*=\s*([\d_]+)");
    let max_items = regex(&MAX_ITEMS_RE, r"\bmax_items\s*=\s*([\d_]+)");

    bag.min_length = number(min_length, content).or(bag.min_length);
    bag.max_length = number(max_length, content).or(bag.max_length);
    bag.minimum = number(minimum, content).or(bag.minimum);
    bag.maximum = number(maximum, content).or(bag.maximum);
    bag.min_items = number(min_items, content).or(bag.min_items);
    bag.max_items = number(max_items, content).or(bag.max_items);
    if let Some(val) = capture(pattern, content) {
        bag.pattern = Some(val.replace("\\\\", "\\").replace("\\\"", "\""));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ra_ap_edition::Edition;
    use ra_ap_syntax::{ast, AstNode, SourceFile};

    fn parse_first_struct(code: &str) -> ast::Struct {
        let parse = SourceFile::parse(code, Edition::Edition2021);
        let file = parse.tree();
        file.syntax()
            .descendants()
            .find_map(ast::Struct::cast)
            .expect("struct missing")
    }

    fn first_field(s: &ast::Struct) -> ast::RecordField {
        s.field_list()
            .and_then(|list| match list {
                ast::FieldList::RecordFieldList(list) => list.fields().next(),
                _ => None,
            })
            .expect("field missing")
    }

    #[test]
    fn test_extract_struct_rename_and_rename_all() {
        let code = r#"
            #[serde(rename = "UserModel", rename_all = "camelCase")]
            struct User {
                id: i32,
            }
        "#;
        let info = extract_attributes(parse_first_struct(code).syntax());
        assert_eq!(info.rename.as_deref(), Some("UserModel"));
        assert_eq!(info.rename_all, Some(RenameRule::CamelCase));
        assert!(!info.is_skipped);
    }

    #[test]
    fn test_extract_field_flags() {
        let code = r#"
            struct Secret {
                #[serde(default, skip_serializing_if = "Option::is_none")]
                #[deprecated]
                token: Option<String>,
            }
        "#;
        let info = extract_attributes(first_field(&parse_first_struct(code)).syntax());
        assert!(info.has_default);
        assert!(!info.is_skipped);
        assert!(info.is_deprecated);
    }

    #[test]
    fn test_extract_skip() {
        let code = r#"
            struct Secret {
                #[serde(skip)]
                token: String,
            }
        "#;
        let info = extract_attributes(first_field(&parse_first_struct(code)).syntax());
        assert!(info.is_skipped);
        assert!(!info.has_default);
    }

    #[test]
    fn test_flag_words_inside_values_are_not_flags() {
        let code = r#"
            struct Choice {
                #[serde(rename = "default", alias = "skip untagged")]
                value: String,
            }
        "#;
        let info = extract_attributes(first_field(&parse_first_struct(code)).syntax());
        assert_eq!(info.rename.as_deref(), Some("default"));
        assert!(!info.has_default);
        assert!(!info.is_skipped);
        assert!(!info.untagged);

        let code = r#"
            struct Choice {
                #[serde(default = "fallback", rename = "v")]
                value: String,
            }
        "#;
        let info = extract_attributes(first_field(&parse_first_struct(code)).syntax());
        assert!(info.has_default);
    }

    #[test]
    fn test_extract_schema_constraints() {
        let code = r#"
            struct Account {
                #[schema(min_length = 3, max_length = 1_000, pattern = "^[a-z]+\\d?$")]
                #[schema(minimum = -1.5, max_items = 4)]
                handle: String,
            }
        "#;
        let info = extract_attributes(first_field(&parse_first_struct(code)).syntax());
        let bag = info.constraints;
        assert_eq!(bag.min_length, Some(3));
        assert_eq!(bag.max_length, Some(1000));
        assert_eq!(bag.pattern.as_deref(), Some("^[a-z]+\\d?$"));
        assert_eq!(bag.minimum, Some(-1.5));
        assert_eq!(bag.max_items, Some(4));
        assert_eq!(bag.maximum, None);
    }

    #[test]
    fn test_ignores_non_target_attributes() {
        let code = r#"
            #[derive(Debug)]
            struct Ignored {
                #[doc = "not serde"]
                value: String,
            }
        "#;
        let info = extract_attributes(parse_first_struct(code).syntax());
        assert!(info.rename.is_none());
        assert!(!info.is_skipped);
        assert!(info.tag.is_none());
        assert!(!info.untagged);
        assert!(info.constraints.is_empty());
    }
}
