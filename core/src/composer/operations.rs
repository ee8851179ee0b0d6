//! # Endpoint Operations
//!
//! The typed slots an API description hands to the composer: parameters, a
//! request body and responses, each naming one or more Rust types.

use crate::descriptor::TypeRef;
use crate::error::{AppError, AppResult};
use crate::schema::CompositionKind;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{self, Display};

/// Default media type of bodies and responses.
pub const JSON_CONTENT_TYPE: &str = "application/json";

fn default_content_type() -> String {
    JSON_CONTENT_TYPE.to_string()
}

fn default_true() -> bool {
    true
}

/// HTTP methods an operation can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `PUT`
    Put,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
    /// `OPTIONS`
    Options,
    /// `HEAD`
    Head,
    /// `PATCH`
    Patch,
    /// `TRACE`
    Trace,
}

impl HttpMethod {
    /// The lowercase key used in OpenAPI path items.
    pub fn as_key(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key().to_uppercase())
    }
}

/// Where a parameter travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// A path template segment; always required.
    Path,
    /// A query string entry.
    Query,
    /// A request header.
    Header,
    /// A cookie.
    Cookie,
}

/// A typed parameter slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSlot {
    /// Structural name.
    pub name: String,
    /// Parameter location.
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// The parameter's type.
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Whether the parameter must be supplied.
    #[serde(default)]
    pub required: bool,
    /// Serialized name, when it differs from `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rename: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParameterSlot {
    /// A parameter of type `ty`. Path parameters start out required.
    pub fn new(name: impl Into<String>, location: ParameterLocation, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            location,
            ty,
            required: location == ParameterLocation::Path,
            rename: None,
            description: None,
        }
    }

    /// Marks the parameter as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// The name the parameter is serialized under.
    pub fn serialized_name(&self) -> &str {
        self.rename.as_deref().unwrap_or(&self.name)
    }

    /// Effective required flag; path parameters are always required.
    pub fn is_required(&self) -> bool {
        self.required || self.location == ParameterLocation::Path
    }
}

/// A request body slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySlot {
    /// Alternative payload types.
    pub types: Vec<TypeRef>,
    /// How alternatives combine; `anyOf` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composition: Option<CompositionKind>,
    /// Media type.
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// Whether the body must be sent.
    #[serde(default = "default_true")]
    pub required: bool,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BodySlot {
    /// A required JSON body of one type.
    pub fn json(ty: TypeRef) -> Self {
        Self {
            types: vec![ty],
            composition: None,
            content_type: default_content_type(),
            required: true,
            description: None,
        }
    }
}

/// A response slot for one status code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSlot {
    /// Status code or `default`.
    #[serde(deserialize_with = "status_code")]
    pub status: String,
    /// Response description.
    pub description: String,
    /// Alternative payload types; empty for bodiless responses.
    #[serde(default)]
    pub types: Vec<TypeRef>,
    /// How alternatives combine; `anyOf` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composition: Option<CompositionKind>,
    /// Media type.
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

impl ResponseSlot {
    /// A JSON response.
    pub fn json(status: impl Into<String>, description: impl Into<String>, types: Vec<TypeRef>) -> Self {
        Self {
            status: status.into(),
            description: description.into(),
            types,
            composition: None,
            content_type: default_content_type(),
        }
    }

    /// Sets the composition rule.
    pub fn composed(mut self, kind: CompositionKind) -> Self {
        self.composition = Some(kind);
        self
    }
}

/// Accepts `200` as well as `"200"` and `"default"`.
fn status_code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Status {
        Code(u16),
        Text(String),
    }
    Ok(match Status::deserialize(deserializer)? {
        Status::Code(code) => code.to_string(),
        Status::Text(text) => text,
    })
}

/// One endpoint operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointOperation {
    /// HTTP method.
    pub method: HttpMethod,
    /// URL path template.
    pub path: String,
    /// Operation id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Tag names.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Security scheme names.
    #[serde(default)]
    pub security: Vec<String>,
    /// Parameters.
    #[serde(default)]
    pub parameters: Vec<ParameterSlot>,
    /// Request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<BodySlot>,
    /// Responses, in status order as given.
    #[serde(default)]
    pub responses: Vec<ResponseSlot>,
}

impl EndpointOperation {
    /// An operation with no slots.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            operation_id: None,
            summary: None,
            description: None,
            tags: Vec::new(),
            security: Vec::new(),
            parameters: Vec::new(),
            request_body: None,
            responses: Vec::new(),
        }
    }

    /// `METHOD /path`, used in error messages and logs.
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    /// Sets the operation id.
    pub fn with_operation_id(mut self, id: impl Into<String>) -> Self {
        self.operation_id = Some(id.into());
        self
    }

    /// Adds a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Adds a security requirement by scheme name.
    pub fn with_security(mut self, scheme: impl Into<String>) -> Self {
        self.security.push(scheme.into());
        self
    }

    /// Adds a parameter.
    pub fn with_parameter(mut self, parameter: ParameterSlot) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the request body. A second body is a configuration error.
    pub fn with_request_body(mut self, body: BodySlot) -> AppResult<Self> {
        if self.request_body.is_some() {
            return Err(AppError::DuplicateRequestBody {
                operation: self.label(),
            });
        }
        self.request_body = Some(body);
        Ok(self)
    }

    /// Adds a response.
    pub fn with_response(mut self, response: ResponseSlot) -> Self {
        self.responses.push(response);
        self
    }

    /// Checks identifiers that must not be blank.
    pub fn validate(&self) -> AppResult<()> {
        if self.path.trim().is_empty() {
            return Err(AppError::blank("operation path"));
        }
        if self.parameters.iter().any(|p| p.serialized_name().trim().is_empty()) {
            return Err(AppError::blank("parameter name"));
        }
        if self.tags.iter().any(|t| t.trim().is_empty()) {
            return Err(AppError::blank("tag name"));
        }
        if self.security.iter().any(|s| s.trim().is_empty()) {
            return Err(AppError::blank("security scheme name"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_request_body() {
        let op = EndpointOperation::new(HttpMethod::Post, "/employees")
            .with_request_body(BodySlot::json(TypeRef::named("Employee")))
            .unwrap();
        match op.with_request_body(BodySlot::json(TypeRef::named("Department"))) {
            Err(AppError::DuplicateRequestBody { operation }) => {
                assert_eq!(operation, "POST /employees")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_blank_identifiers() {
        let base = EndpointOperation::new(HttpMethod::Get, "/x");
        assert!(base.validate().is_ok());

        let cases = vec![
            (EndpointOperation::new(HttpMethod::Get, " "), "operation path"),
            (base.clone().with_tag(""), "tag name"),
            (base.clone().with_security("  "), "security scheme name"),
            (
                base.clone().with_parameter(ParameterSlot::new(
                    "",
                    ParameterLocation::Query,
                    TypeRef::named("String"),
                )),
                "parameter name",
            ),
        ];
        for (op, kind) in cases {
            match op.validate() {
                Err(AppError::BlankIdentifier { kind: found }) => assert_eq!(found, kind),
                other => panic!("{kind}: unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn test_path_parameter_always_required() {
        let mut param = ParameterSlot::new("id", ParameterLocation::Path, TypeRef::named("Uuid"));
        param.required = false;
        assert!(param.is_required());
        let query = ParameterSlot::new("q", ParameterLocation::Query, TypeRef::named("String"));
        assert!(!query.is_required());
    }

    #[test]
    fn test_deserialize_operation_from_yaml() {
        let yaml = r#"
method: get
path: /employees/{id}
tags: [hr]
parameters:
  - name: id
    in: path
    type: Uuid
responses:
  - status: 200
    description: Found
    types: ["Employee", "Option<Department>"]
    composition: oneOf
"#;
        let op: EndpointOperation = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(op.method, HttpMethod::Get);
        assert_eq!(op.parameters[0].location, ParameterLocation::Path);
        assert!(op.parameters[0].is_required());
        assert_eq!(op.responses[0].status, "200");
        assert_eq!(op.responses[0].types[1].to_string(), "Option<Department>");
        assert_eq!(op.responses[0].composition, Some(CompositionKind::OneOf));
        assert_eq!(op.responses[0].content_type, "application/json");
    }
}
