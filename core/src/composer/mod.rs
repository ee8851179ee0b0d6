//! # Schema Composer
//!
//! Assembles paths, responses and components for a set of endpoint
//! operations. Each distinct slot type is resolved once per build; slots
//! naming several types combine them under a composition keyword.

pub mod document;
pub mod operations;

use crate::descriptor::TypeRef;
use crate::error::{AppError, AppResult};
use crate::schema::refs::COMPONENTS_PREFIX;
use crate::schema::{make_nullable_schema, CompositionKind};
use crate::session::InspectionSession;
use document::{ApiInfo, Document};
use operations::{BodySlot, EndpointOperation, HttpMethod, ParameterSlot, ResponseSlot};
use serde_json::{json, Map, Value};
use std::collections::{HashMap, HashSet};

/// Builds [`Document`]s from endpoint operations.
pub struct SchemaComposer<'p> {
    session: InspectionSession<'p>,
    info: ApiInfo,
    memo: HashMap<TypeRef, Value>,
}

impl<'p> SchemaComposer<'p> {
    /// A composer driving `session`.
    pub fn new(session: InspectionSession<'p>, info: ApiInfo) -> Self {
        Self {
            session,
            info,
            memo: HashMap::new(),
        }
    }

    /// The underlying session, for inspecting the last build.
    pub fn session(&self) -> &InspectionSession<'p> {
        &self.session
    }

    /// Runs one documentation build.
    ///
    /// Structural errors from the resolvers propagate unchanged. Name
    /// conflicts do not fail the build; they land in the document's report.
    pub fn compose(&mut self, operations: &[EndpointOperation]) -> AppResult<Document> {
        // 1. Fresh session state
        self.session.reset();
        self.memo.clear();

        // 2. Validate identifiers and method/path uniqueness
        let mut seen: HashSet<(HttpMethod, &str)> = HashSet::new();
        for op in operations {
            op.validate()?;
            if !seen.insert((op.method, op.path.as_str())) {
                return Err(AppError::DuplicateOperation {
                    method: op.method.to_string(),
                    path: op.path.clone(),
                });
            }
        }

        // 3. Operations, grouped by path in first-seen order
        let mut paths = Map::new();
        for op in operations {
            let rendered = self.operation(op)?;
            let item = paths
                .entry(op.path.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(item) = item {
                item.insert(op.method.as_key().to_string(), rendered);
            }
        }

        // 4. Components and findings
        let report = self.session.report();
        tracing::debug!(
            operations = operations.len(),
            schemas = self.session.named_schemas().len(),
            conflicts = report.conflicts.len(),
            "document composed"
        );
        Ok(Document {
            info: self.info.clone(),
            paths,
            components: self.session.components_json(),
            report,
        })
    }

    fn operation(&mut self, op: &EndpointOperation) -> AppResult<Value> {
        let mut out = Map::new();
        if !op.tags.is_empty() {
            out.insert("tags".to_string(), json!(op.tags));
        }
        if let Some(summary) = &op.summary {
            out.insert("summary".to_string(), json!(summary));
        }
        if let Some(description) = &op.description {
            out.insert("description".to_string(), json!(description));
        }
        if let Some(id) = &op.operation_id {
            out.insert("operationId".to_string(), json!(id));
        }

        if !op.parameters.is_empty() {
            let mut parameters = Vec::with_capacity(op.parameters.len());
            for parameter in &op.parameters {
                parameters.push(self.parameter(parameter)?);
            }
            out.insert("parameters".to_string(), Value::Array(parameters));
        }

        if let Some(body) = &op.request_body {
            out.insert("requestBody".to_string(), self.request_body(body)?);
        }

        let mut responses = Map::new();
        for response in &op.responses {
            responses.insert(response.status.clone(), self.response(response)?);
        }
        if responses.is_empty() {
            responses.insert("200".to_string(), json!({ "description": "OK" }));
        }
        out.insert("responses".to_string(), Value::Object(responses));

        if !op.security.is_empty() {
            let requirements: Vec<Value> = op
                .security
                .iter()
                .map(|scheme| json!({ scheme.as_str(): [] }))
                .collect();
            out.insert("security".to_string(), Value::Array(requirements));
        }
        Ok(Value::Object(out))
    }

    fn parameter(&mut self, parameter: &ParameterSlot) -> AppResult<Value> {
        let mut out = Map::new();
        out.insert("name".to_string(), json!(parameter.serialized_name()));
        out.insert("in".to_string(), json!(parameter.location));
        if let Some(description) = &parameter.description {
            out.insert("description".to_string(), json!(description));
        }
        out.insert("required".to_string(), json!(parameter.is_required()));
        let (inner, _) = parameter.ty.peel();
        out.insert("schema".to_string(), self.type_schema(inner)?);
        Ok(Value::Object(out))
    }

    fn request_body(&mut self, body: &BodySlot) -> AppResult<Value> {
        let mut out = Map::new();
        if let Some(description) = &body.description {
            out.insert("description".to_string(), json!(description));
        }
        let content = match self.slot_schema(&body.types, body.composition)? {
            Some(schema) => json!({ body.content_type.as_str(): { "schema": schema } }),
            None => json!({ body.content_type.as_str(): {} }),
        };
        out.insert("content".to_string(), content);
        out.insert("required".to_string(), json!(body.required));
        Ok(Value::Object(out))
    }

    fn response(&mut self, response: &ResponseSlot) -> AppResult<Value> {
        let mut out = Map::new();
        out.insert("description".to_string(), json!(response.description));
        if let Some(schema) = self.slot_schema(&response.types, response.composition)? {
            out.insert(
                "content".to_string(),
                json!({ response.content_type.as_str(): { "schema": schema } }),
            );
        }
        Ok(Value::Object(out))
    }

    /// One schema for a slot: nothing, the lone type, or a composition.
    fn slot_schema(
        &mut self,
        types: &[TypeRef],
        composition: Option<CompositionKind>,
    ) -> AppResult<Option<Value>> {
        match types {
            [] => Ok(None),
            [only] => self.type_schema(only).map(Some),
            many => {
                let kind = composition.unwrap_or_default();
                let mut members = Vec::with_capacity(many.len());
                for ty in many {
                    members.push(self.type_schema(ty)?);
                }
                Ok(Some(json!({ kind.keyword(): members })))
            }
        }
    }

    /// Resolves a slot type once per build; `Option<T>` slots accept `null`.
    fn type_schema(&mut self, ty: &TypeRef) -> AppResult<Value> {
        if let Some(hit) = self.memo.get(ty) {
            return Ok(hit.clone());
        }
        let schema = self.session.resolve(ty)?.to_json(COMPONENTS_PREFIX);
        let schema = if ty.is_option() {
            make_nullable_schema(schema)
        } else {
            schema
        };
        self.memo.insert(ty.clone(), schema.clone());
        Ok(schema)
    }
}
