//! Declarative descriptors read from handler groups and handlers.
//!
//! These are plain data: the core never cares whether they were read from
//! source attributes, a config file, or built by hand in a test.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// HTTP methods an endpoint can be documented with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "delete" => Ok(HttpMethod::Delete),
            "patch" => Ok(HttpMethod::Patch),
            "options" => Ok(HttpMethod::Options),
            "head" => Ok(HttpMethod::Head),
            other => Err(format!("unsupported HTTP method: {}", other)),
        }
    }
}

/// Reference to a data-shape type, as written on a field or an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A primitive, enum or struct looked up by its simple name
    Named(String),
    /// A homogeneous collection; `None` when the element type is not statically known
    Collection(Option<Box<TypeRef>>),
    /// The universal base type: anything with no statically known fields
    Any,
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    /// Wraps an element type in a collection, degrading to an untyped
    /// collection when the element is [`TypeRef::Any`].
    pub fn collection_of(element: TypeRef) -> Self {
        match element {
            TypeRef::Any => TypeRef::Collection(None),
            other => TypeRef::Collection(Some(Box::new(other))),
        }
    }
}

/// A leaf field declared explicitly instead of derived from a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub type_name: String,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Group-level (controller) defaults, attached once per handler group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDescriptor {
    pub group_name: String,
    pub base_url: String,
    pub default_accept_type: String,
    pub default_content_type: String,
    pub default_roles: Vec<String>,
}

impl Default for GroupDescriptor {
    fn default() -> Self {
        Self {
            group_name: "/".to_string(),
            base_url: String::new(),
            default_accept_type: "text/plain".to_string(),
            default_content_type: "text/plain".to_string(),
            default_roles: Vec::new(),
        }
    }
}

/// Endpoint-level description of one handler.
///
/// `None` and empty strings both mean "not overridden".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub group_override: Option<String>,
    pub http_method: HttpMethod,
    pub url_suffix: String,
    pub accept_override: Option<String>,
    pub content_type_override: Option<String>,
    pub description: Option<String>,
    pub headers: Vec<(String, String)>,
    pub request_fields: Option<Vec<FieldSpec>>,
    pub request_type: Option<TypeRef>,
    pub response_fields: Option<Vec<FieldSpec>>,
    pub response_type: Option<TypeRef>,
    pub status_codes: Vec<(u16, String)>,
    pub roles_override: Option<Vec<String>>,
}

impl EndpointDescriptor {
    /// Creates a descriptor with only the mandatory method and URL set.
    pub fn new(http_method: HttpMethod, url_suffix: impl Into<String>) -> Self {
        Self {
            group_override: None,
            http_method,
            url_suffix: url_suffix.into(),
            accept_override: None,
            content_type_override: None,
            description: None,
            headers: Vec::new(),
            request_fields: None,
            request_type: None,
            response_fields: None,
            response_type: None,
            status_codes: Vec::new(),
            roles_override: None,
        }
    }
}
