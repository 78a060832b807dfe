//! Structural required-field validation of the assembled document.
//!
//! Each node of the document graph declares which of its fields the output
//! contract requires and which child nodes to descend into. Validation only
//! checks presence; it never looks at field contents.

use crate::document::{ResolvedEndpoint, ServiceDocument};
use crate::error::{Error, Result};
use crate::service_info::ServiceInfo;
use log::debug;

/// A node of the document graph with required fields.
pub trait Validate {
    /// Required field names, each paired with whether a value is present.
    fn required_fields(&self) -> Vec<(&'static str, bool)>;

    /// Child nodes to validate, with the key they sit under.
    fn children(&self) -> Vec<(String, &dyn Validate)> {
        Vec::new()
    }
}

/// Walks the graph from `root`, failing on the first absent required field.
///
/// # Errors
///
/// Returns [`Error::ValidationError`] carrying the dotted path of the field,
/// e.g. `endpoints[0].headers`.
pub fn validate(root: &dyn Validate) -> Result<()> {
    validate_at("", root)
}

fn validate_at(path: &str, node: &dyn Validate) -> Result<()> {
    for (field, present) in node.required_fields() {
        if !present {
            let field_path = join_path(path, field);
            debug!("Required field {} is missing", field_path);
            return Err(Error::ValidationError(field_path));
        }
    }

    for (key, child) in node.children() {
        validate_at(&join_path(path, &key), child)?;
    }
    Ok(())
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else if key.starts_with('[') {
        format!("{}{}", parent, key)
    } else {
        format!("{}.{}", parent, key)
    }
}

impl Validate for ServiceDocument {
    fn required_fields(&self) -> Vec<(&'static str, bool)> {
        Vec::new()
    }

    fn children(&self) -> Vec<(String, &dyn Validate)> {
        let mut children: Vec<(String, &dyn Validate)> =
            vec![("apiInfo".to_string(), &self.api_info as &dyn Validate)];
        children.extend(
            self.endpoints
                .iter()
                .enumerate()
                .map(|(index, endpoint)| (format!("endpoints[{}]", index), endpoint as &dyn Validate)),
        );
        children
    }
}

impl Validate for ServiceInfo {
    /// Every service field is optional and omitted when unset.
    fn required_fields(&self) -> Vec<(&'static str, bool)> {
        Vec::new()
    }
}

impl Validate for ResolvedEndpoint {
    fn required_fields(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("headers", self.headers.is_some()),
            ("roles", self.roles.is_some()),
            ("statusCodes", self.status_codes.is_some()),
        ]
    }
}
