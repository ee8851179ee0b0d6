//! # Resolved Schemas
//!
//! The engine's output unit and its JSON rendering. Named complex schemas
//! (objects, enums, generic instantiations) live once in the session registry;
//! everywhere else they appear as [`ResolvedSchema::Reference`].

pub mod constraints;
pub mod refs;

use crate::schema::constraints::ConstraintBag;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Leaf JSON types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    /// `string`
    String,
    /// `integer`
    Integer,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// A free-form `object`.
    Object,
}

impl PrimitiveType {
    /// The JSON Schema `type` keyword value.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Number => "number",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Object => "object",
        }
    }
}

/// How alternative schemas combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompositionKind {
    /// Valid against at least one member.
    #[default]
    #[serde(rename = "anyOf")]
    AnyOf,
    /// Valid against every member.
    #[serde(rename = "allOf")]
    AllOf,
    /// Valid against exactly one member.
    #[serde(rename = "oneOf")]
    OneOf,
}

impl CompositionKind {
    /// The JSON Schema keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            CompositionKind::AnyOf => "anyOf",
            CompositionKind::AllOf => "allOf",
            CompositionKind::OneOf => "oneOf",
        }
    }
}

/// A resolved schema fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedSchema {
    /// A leaf value.
    Primitive {
        /// JSON type.
        ty: PrimitiveType,
        /// Format hint (`uuid`, `date-time`, `int64`, ...).
        format: Option<String>,
        /// Attached constraints.
        constraints: ConstraintBag,
    },
    /// A homogeneous sequence.
    Array {
        /// Element schema.
        items: Box<ResolvedSchema>,
        /// Set semantics.
        unique_items: bool,
        /// Attached constraints.
        constraints: ConstraintBag,
    },
    /// A string-keyed map.
    MapOf {
        /// Value schema.
        value: Box<ResolvedSchema>,
        /// Attached constraints.
        constraints: ConstraintBag,
    },
    /// A closed set of string constants, in declaration order.
    Enum {
        /// Serialized constant names.
        values: Vec<String>,
        /// Attached constraints.
        constraints: ConstraintBag,
    },
    /// A structural object.
    Object(ObjectDescriptor),
    /// A pointer at a named schema.
    Reference {
        /// The derived name of the target schema.
        target: String,
    },
    /// A combination of alternative schemas.
    Composition {
        /// Combination rule.
        kind: CompositionKind,
        /// Member schemas, in order.
        members: Vec<ResolvedSchema>,
        /// Discriminator property for tagged unions.
        discriminator: Option<String>,
        /// Doc comment.
        description: Option<String>,
    },
}

impl ResolvedSchema {
    /// A bare primitive.
    pub fn primitive(ty: PrimitiveType, format: Option<&str>) -> Self {
        ResolvedSchema::Primitive {
            ty,
            format: format.map(str::to_string),
            constraints: ConstraintBag::default(),
        }
    }

    /// The free-form object used for unclassifiable types.
    pub fn unknown_object() -> Self {
        ResolvedSchema::primitive(PrimitiveType::Object, None)
    }

    /// An array of `items`.
    pub fn array(items: ResolvedSchema) -> Self {
        ResolvedSchema::Array {
            items: Box::new(items),
            unique_items: false,
            constraints: ConstraintBag::default(),
        }
    }

    /// A string-keyed map of `value`.
    pub fn map_of(value: ResolvedSchema) -> Self {
        ResolvedSchema::MapOf {
            value: Box::new(value),
            constraints: ConstraintBag::default(),
        }
    }

    /// A reference to a named schema.
    pub fn reference(target: impl Into<String>) -> Self {
        ResolvedSchema::Reference {
            target: target.into(),
        }
    }

    /// The referenced name, if this is a reference.
    pub fn reference_target(&self) -> Option<&str> {
        match self {
            ResolvedSchema::Reference { target } => Some(target),
            _ => None,
        }
    }

    /// Renders the schema, pointing references under `ref_prefix`.
    pub fn to_json(&self, ref_prefix: &str) -> Value {
        let mut map = Map::new();
        match self {
            ResolvedSchema::Primitive {
                ty,
                format,
                constraints,
            } => {
                map.insert("type".to_string(), json!(ty.as_str()));
                if let Some(format) = format {
                    map.insert("format".to_string(), json!(format));
                }
                constraints.write_into(&mut map);
            }
            ResolvedSchema::Array {
                items,
                unique_items,
                constraints,
            } => {
                map.insert("type".to_string(), json!("array"));
                map.insert("items".to_string(), items.to_json(ref_prefix));
                if *unique_items {
                    map.insert("uniqueItems".to_string(), json!(true));
                }
                constraints.write_into(&mut map);
            }
            ResolvedSchema::MapOf { value, constraints } => {
                map.insert("type".to_string(), json!("object"));
                map.insert(
                    "additionalProperties".to_string(),
                    value.to_json(ref_prefix),
                );
                constraints.write_into(&mut map);
            }
            ResolvedSchema::Enum {
                values,
                constraints,
            } => {
                map.insert("type".to_string(), json!("string"));
                map.insert("enum".to_string(), json!(values));
                constraints.write_into(&mut map);
            }
            ResolvedSchema::Object(object) => return object.to_json(ref_prefix),
            ResolvedSchema::Reference { target } => {
                map.insert(
                    "$ref".to_string(),
                    json!(refs::schema_ref(ref_prefix, target)),
                );
            }
            ResolvedSchema::Composition {
                kind,
                members,
                discriminator,
                description,
            } => {
                if let Some(desc) = description {
                    map.insert("description".to_string(), json!(desc));
                }
                let rendered: Vec<Value> = members.iter().map(|m| m.to_json(ref_prefix)).collect();
                map.insert(kind.keyword().to_string(), Value::Array(rendered));
                if let Some(property) = discriminator {
                    map.insert(
                        "discriminator".to_string(),
                        json!({ "propertyName": property }),
                    );
                }
            }
        }
        Value::Object(map)
    }

    /// Collects every reference target reachable inside this schema.
    pub fn collect_references<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            ResolvedSchema::Reference { target } => out.push(target),
            ResolvedSchema::Array { items, .. } => items.collect_references(out),
            ResolvedSchema::MapOf { value, .. } => value.collect_references(out),
            ResolvedSchema::Object(object) => {
                for property in object.properties.values() {
                    property.schema.collect_references(out);
                }
            }
            ResolvedSchema::Composition { members, .. } => {
                for member in members {
                    member.collect_references(out);
                }
            }
            ResolvedSchema::Primitive { .. } | ResolvedSchema::Enum { .. } => {}
        }
    }
}

/// A member of an [`ObjectDescriptor`].
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySchema {
    /// The member's resolved type.
    pub schema: ResolvedSchema,
    /// Whether `null` is an accepted value.
    pub is_nullable: bool,
    /// Whether the property must be present.
    pub is_required: bool,
    /// The structural name, when the serialized name differs.
    pub renamed_from: Option<String>,
    /// Doc comment or configured description.
    pub description: Option<String>,
    /// Whether the member is deprecated.
    pub is_deprecated: bool,
}

impl PropertySchema {
    /// A required, non-nullable property.
    pub fn required(schema: ResolvedSchema) -> Self {
        Self {
            schema,
            is_nullable: false,
            is_required: true,
            renamed_from: None,
            description: None,
            is_deprecated: false,
        }
    }

    fn to_json(&self, ref_prefix: &str) -> Value {
        let mut value = self.schema.to_json(ref_prefix);
        if self.is_nullable {
            value = make_nullable_schema(value);
        }
        if let Some(obj) = value.as_object_mut() {
            if let Some(desc) = &self.description {
                obj.entry("description".to_string())
                    .or_insert_with(|| json!(desc));
            }
            if self.is_deprecated {
                obj.insert("deprecated".to_string(), json!(true));
            }
        }
        value
    }
}

/// An object schema: properties in declaration order plus the required set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectDescriptor {
    /// Properties keyed by serialized name, in declaration order.
    pub properties: IndexMap<String, PropertySchema>,
    /// Names of required properties.
    pub required: IndexSet<String>,
    /// Structural members excluded from the schema.
    pub transient: Vec<String>,
    /// Doc comment.
    pub description: Option<String>,
    /// Whether the type is deprecated.
    pub is_deprecated: bool,
}

impl ObjectDescriptor {
    /// Property names in output order.
    pub fn property_names(&self) -> Vec<&str> {
        self.properties.keys().map(String::as_str).collect()
    }

    fn to_json(&self, ref_prefix: &str) -> Value {
        let mut map = Map::new();
        map.insert("type".to_string(), json!("object"));
        if let Some(desc) = &self.description {
            map.insert("description".to_string(), json!(desc));
        }
        if self.is_deprecated {
            map.insert("deprecated".to_string(), json!(true));
        }

        let mut properties = Map::new();
        for (name, property) in &self.properties {
            properties.insert(name.clone(), property.to_json(ref_prefix));
        }
        map.insert("properties".to_string(), Value::Object(properties));

        if !self.required.is_empty() {
            map.insert("required".to_string(), json!(self.required));
        }
        Value::Object(map)
    }
}

/// Marks a rendered schema as accepting `null`.
///
/// Typed schemas gain `"null"` in their `type` list; references and
/// compositions are wrapped in `anyOf`.
pub(crate) fn make_nullable_schema(schema: Value) -> Value {
    let Some(obj) = schema.as_object() else {
        return json!({ "anyOf": [schema, { "type": "null" }] });
    };

    if obj.contains_key("$ref") {
        return json!({ "anyOf": [schema, { "type": "null" }] });
    }

    if let Some(type_val) = obj.get("type") {
        let mut types = match type_val {
            Value::String(s) => vec![Value::String(s.clone())],
            Value::Array(arr) => arr.clone(),
            _ => Vec::new(),
        };

        if !types
            .iter()
            .any(|t| matches!(t, Value::String(s) if s == "null"))
        {
            types.push(Value::String("null".to_string()));
        }

        let mut new_obj = obj.clone();
        new_obj.insert("type".to_string(), Value::Array(types));
        if let Some(Value::Array(values)) = new_obj.get_mut("enum") {
            values.push(Value::Null);
        }
        return Value::Object(new_obj);
    }

    json!({ "anyOf": [schema, { "type": "null" }] })
}
