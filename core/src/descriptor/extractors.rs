//! # Extraction Logic
//!
//! Parses Rust source into structural descriptors, using the rust-analyzer
//! syntax library.

use crate::descriptor::attributes::extract_attributes;
use crate::descriptor::catalog::TypeCatalog;
use crate::descriptor::models::{
    EnumDecl, MemberDescriptor, MemberOrigin, StructDecl, TypeDecl, VariantDecl,
};
use crate::descriptor::type_ref::TypeRef;
use crate::error::AppResult;
use ra_ap_edition::Edition;
use ra_ap_syntax::ast::{self, HasGenericParams, HasName};
use ra_ap_syntax::{AstNode, SourceFile, SyntaxKind, SyntaxNode};

/// Parses every struct and enum in `code` into a fresh catalog.
pub fn catalog_from_source(code: &str) -> AppResult<TypeCatalog> {
    let mut catalog = TypeCatalog::new();
    for decl in extract_declarations(code)? {
        catalog.insert(decl);
    }
    Ok(catalog)
}

/// Extracts all struct and enum declarations, in source order.
pub fn extract_declarations(code: &str) -> AppResult<Vec<TypeDecl>> {
    let parse = SourceFile::parse(code, Edition::Edition2021);
    let file = parse.tree();
    let mut decls = Vec::new();

    for node in file.syntax().descendants() {
        if let Some(struct_def) = ast::Struct::cast(node.clone()) {
            if let Some(decl) = parse_struct_node(&struct_def) {
                decls.push(decl.into());
            }
        } else if let Some(enum_def) = ast::Enum::cast(node) {
            if let Some(decl) = parse_enum_node(&enum_def) {
                decls.push(decl.into());
            }
        }
    }

    tracing::debug!(count = decls.len(), "extracted declarations");
    Ok(decls)
}

fn parse_struct_node(struct_def: &ast::Struct) -> Option<StructDecl> {
    let name = struct_def.name()?;
    let attrs = extract_attributes(struct_def.syntax());

    let mut members = Vec::new();
    if let Some(field_list) = struct_def.field_list() {
        match field_list {
            ast::FieldList::RecordFieldList(list) => {
                for field in list.fields() {
                    if let (Some(fname), Some(ty)) = (field.name(), field.ty()) {
                        members.push(parse_member(
                            fname.text().to_string(),
                            &ty,
                            field.syntax(),
                        ));
                    }
                }
            }
            ast::FieldList::TupleFieldList(list) => {
                for (i, field) in list.fields().enumerate() {
                    if let Some(ty) = field.ty() {
                        members.push(parse_member(i.to_string(), &ty, field.syntax()));
                    }
                }
            }
        }
    }

    // A container-level `#[serde(default)]` fills every missing field
    if attrs.has_default {
        for member in &mut members {
            member.has_default = true;
        }
    }

    Some(StructDecl {
        name: name.text().to_string(),
        module_path: module_path(struct_def.syntax()),
        type_params: type_params(struct_def),
        members,
        description: extract_doc_comment(struct_def.syntax()),
        rename: attrs.rename,
        rename_all: attrs.rename_all,
        is_deprecated: attrs.is_deprecated,
    })
}

fn parse_member(name: String, ty: &ast::Type, node: &SyntaxNode) -> MemberDescriptor {
    let attrs = extract_attributes(node);
    let raw = ty.syntax().text().to_string();
    let ty = TypeRef::parse(&raw).unwrap_or_else(|e| {
        tracing::warn!(member = %name, error = %e, "unparseable member type");
        TypeRef::named(raw.trim())
    });

    MemberDescriptor {
        name,
        ty,
        origin: MemberOrigin::Constructor,
        rename: attrs.rename,
        has_default: attrs.has_default,
        is_transient: attrs.is_skipped,
        is_deprecated: attrs.is_deprecated,
        description: extract_doc_comment(node),
        constraints: attrs.constraints,
    }
}

fn parse_enum_node(enum_def: &ast::Enum) -> Option<EnumDecl> {
    let name = enum_def.name()?;
    let attrs = extract_attributes(enum_def.syntax());

    let mut variants = Vec::new();
    if let Some(list) = enum_def.variant_list() {
        for variant in list.variants() {
            let Some(vname) = variant.name() else {
                continue;
            };
            let vattrs = extract_attributes(variant.syntax());
            if vattrs.is_skipped {
                continue;
            }

            // Newtype variants carry their payload; struct-like variants have
            // no descriptor of their own.
            let (ty, is_record) = match variant.field_list() {
                Some(ast::FieldList::TupleFieldList(tfl)) => {
                    let ty = tfl.fields().next().and_then(|first| first.ty()).map(|ty| {
                        let raw = ty.syntax().text().to_string();
                        TypeRef::parse(&raw).unwrap_or_else(|_| TypeRef::named(raw.trim()))
                    });
                    (ty, false)
                }
                Some(ast::FieldList::RecordFieldList(_)) => (None, true),
                None => (None, false),
            };

            variants.push(VariantDecl {
                name: vname.text().to_string(),
                ty,
                is_record,
                rename: vattrs.rename,
                description: extract_doc_comment(variant.syntax()),
                is_deprecated: vattrs.is_deprecated,
            });
        }
    }

    let tag = if attrs.untagged { None } else { attrs.tag };

    Some(EnumDecl {
        name: name.text().to_string(),
        module_path: module_path(enum_def.syntax()),
        type_params: type_params(enum_def),
        variants,
        description: extract_doc_comment(enum_def.syntax()),
        rename: attrs.rename,
        rename_all: attrs.rename_all,
        tag,
        is_deprecated: attrs.is_deprecated,
    })
}

/// Names of the enclosing inline `mod` blocks, outermost first.
fn module_path(node: &SyntaxNode) -> Vec<String> {
    let mut path: Vec<String> = node
        .ancestors()
        .filter_map(ast::Module::cast)
        .filter_map(|m| m.name().map(|n| n.text().to_string()))
        .collect();
    path.reverse();
    path
}

/// Declared type parameter names; lifetimes and const generics are skipped.
fn type_params(node: &impl HasGenericParams) -> Vec<String> {
    node.generic_param_list()
        .map(|list| {
            list.generic_params()
                .filter_map(|param| match param {
                    ast::GenericParam::TypeParam(tp) => tp.name().map(|n| n.text().to_string()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Helper to extract `///` comments from a syntax node's trivia children.
pub(crate) fn extract_doc_comment(node: &SyntaxNode) -> Option<String> {
    let mut lines = Vec::new();

    for child in node.children_with_tokens() {
        if child.kind() == SyntaxKind::COMMENT {
            let text = child.to_string();
            if let Some(content) = text.strip_prefix("///") {
                lines.push(content.strip_prefix(' ').unwrap_or(content).to_owned());
            }
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n").trim().to_string())
    }
}
