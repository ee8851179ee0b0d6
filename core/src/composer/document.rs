//! # Composed Document
//!
//! The finished OpenAPI document and its wire renderings.

use crate::error::{AppError, AppResult};
use crate::report::InspectionReport;
use crate::schema::refs::{schema_name_from_ref, COMPONENTS_PREFIX};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use utoipa::openapi::OpenApi;

/// OpenAPI version stamped on every document.
pub const OPENAPI_VERSION: &str = "3.1.0";

/// The document's `info` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiInfo {
    /// API title.
    pub title: String,
    /// API version.
    pub version: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ApiInfo {
    /// Info with a title and version.
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            description: None,
        }
    }
}

impl Default for ApiInfo {
    fn default() -> Self {
        ApiInfo::new("API", "0.1.0")
    }
}

/// A composed document plus the findings of the build that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// API metadata.
    pub info: ApiInfo,
    /// Path items keyed by path template, in registration order.
    pub paths: Map<String, Value>,
    /// Named schemas for `components.schemas`.
    pub components: Map<String, Value>,
    /// Conflicts and diagnostics.
    pub report: InspectionReport,
}

impl Document {
    /// The document as a JSON value. Empty components are omitted.
    pub fn to_json_value(&self) -> Value {
        let mut root = Map::new();
        root.insert("openapi".to_string(), json!(OPENAPI_VERSION));
        root.insert("info".to_string(), json!(self.info));
        root.insert("paths".to_string(), Value::Object(self.paths.clone()));
        if !self.components.is_empty() {
            root.insert(
                "components".to_string(),
                json!({ "schemas": self.components }),
            );
        }
        Value::Object(root)
    }

    /// Pretty-printed JSON.
    pub fn to_json_string(&self) -> AppResult<String> {
        serde_json::to_string_pretty(&self.to_json_value())
            .map_err(|e| AppError::Serialization(e.to_string()))
    }

    /// YAML with the same field order as the JSON rendering.
    pub fn to_yaml_string(&self) -> AppResult<String> {
        serde_yaml::to_string(&self.to_json_value())
            .map_err(|e| AppError::Serialization(e.to_string()))
    }

    /// Re-parses the document into the typed OpenAPI model, failing if it is
    /// not well formed.
    pub fn to_openapi(&self) -> AppResult<OpenApi> {
        serde_json::from_value(self.to_json_value())
            .map_err(|e| AppError::Serialization(format!("invalid OpenAPI document: {}", e)))
    }

    /// Component names referenced anywhere in the document but not defined.
    pub fn dangling_references(&self) -> Vec<String> {
        let mut found = IndexSet::new();
        for value in self.paths.values().chain(self.components.values()) {
            collect_refs(value, &mut found);
        }
        found
            .into_iter()
            .filter(|name| !self.components.contains_key(name))
            .collect()
    }
}

fn collect_refs(value: &Value, out: &mut IndexSet<String>) {
    match value {
        Value::Object(map) => {
            for (key, inner) in map {
                match (key.as_str(), inner) {
                    ("$ref", Value::String(reference)) => {
                        if let Some(name) = schema_name_from_ref(COMPONENTS_PREFIX, reference) {
                            out.insert(name);
                        }
                    }
                    _ => collect_refs(inner, out),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_refs(item, out);
            }
        }
        _ => {}
    }
}
