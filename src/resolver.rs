//! Merging of group-level defaults with endpoint-level overrides.
//!
//! Precedence for every overridable field: a non-empty endpoint value wins,
//! then the group value, then the built-in default.

use crate::descriptor::{EndpointDescriptor, FieldSpec, GroupDescriptor, TypeRef};
use crate::document::ResolvedEndpoint;
use crate::error::{Direction, Error, Result};
use crate::introspector::Introspector;
use crate::ordered_map::OrderedMap;
use crate::schema::SchemaNode;
use crate::type_registry::TypeRegistry;
use log::debug;

/// Role assigned when neither the group nor the endpoint names any
pub const DEFAULT_ROLE: &str = "any";

/// Descriptor merge resolver
pub struct Resolver<'a> {
    introspector: Introspector<'a>,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            introspector: Introspector::new(registry),
        }
    }

    /// Resolves one endpoint against its group.
    ///
    /// `handler` only identifies the endpoint in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConflictingSchemaSource`] when an endpoint declares both
    /// explicit fields and a shape type for its request or its response.
    pub fn resolve(
        &self,
        handler: &str,
        endpoint: &EndpointDescriptor,
        group: &GroupDescriptor,
    ) -> Result<ResolvedEndpoint> {
        debug!("Resolving endpoint {} {} ({})", endpoint.http_method, endpoint.url_suffix, handler);

        let request = self.resolve_schema(
            handler,
            Direction::Request,
            endpoint.request_fields.as_deref(),
            endpoint.request_type.as_ref(),
        )?;
        let response = self.resolve_schema(
            handler,
            Direction::Response,
            endpoint.response_fields.as_deref(),
            endpoint.response_type.as_ref(),
        )?;

        let headers: OrderedMap<String> = endpoint
            .headers
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        let status_codes: OrderedMap<String> = endpoint
            .status_codes
            .iter()
            .map(|(code, description)| (code.to_string(), description.clone()))
            .collect();

        Ok(ResolvedEndpoint {
            group: non_empty(&endpoint.group_override)
                .unwrap_or(&group.group_name)
                .to_string(),
            method: endpoint.http_method,
            accept: non_empty(&endpoint.accept_override)
                .unwrap_or(&group.default_accept_type)
                .to_string(),
            url: join_url(&group.base_url, &endpoint.url_suffix),
            description: endpoint.description.clone().unwrap_or_default(),
            content_type: non_empty(&endpoint.content_type_override)
                .unwrap_or(&group.default_content_type)
                .to_string(),
            request,
            response,
            headers: Some(headers),
            roles: Some(resolve_roles(endpoint.roles_override.as_deref(), &group.default_roles)),
            status_codes: Some(status_codes),
        })
    }

    /// Builds the request or response shape.
    ///
    /// Neither source set means the payload is undocumented and stays absent.
    fn resolve_schema(
        &self,
        handler: &str,
        direction: Direction,
        fields: Option<&[FieldSpec]>,
        shape_type: Option<&TypeRef>,
    ) -> Result<Option<SchemaNode>> {
        let fields = fields.filter(|f| !f.is_empty());

        match (fields, shape_type) {
            (Some(_), Some(_)) => Err(Error::ConflictingSchemaSource {
                handler: handler.to_string(),
                direction,
            }),
            (Some(fields), None) => Ok(Some(SchemaNode::Object(
                fields
                    .iter()
                    .map(|f| (f.name.clone(), SchemaNode::leaf(f.type_name.clone())))
                    .collect(),
            ))),
            (None, Some(shape_type)) => Ok(Some(self.introspector.expand_root(shape_type))),
            (None, None) => Ok(None),
        }
    }
}

/// Joins a group base URL and an endpoint suffix with exactly one `/` between them.
pub fn join_url(base_url: &str, url_suffix: &str) -> String {
    let mut url = base_url.to_string();
    if !url.ends_with('/') {
        url.push('/');
    }
    url.push_str(url_suffix.strip_prefix('/').unwrap_or(url_suffix));
    url
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn resolve_roles(endpoint_roles: Option<&[String]>, group_roles: &[String]) -> Vec<String> {
    let chosen = match endpoint_roles {
        Some(roles) if !roles.is_empty() => roles,
        _ => group_roles,
    };

    if chosen.is_empty() {
        return vec![DEFAULT_ROLE.to_string()];
    }

    let mut roles: Vec<String> = Vec::with_capacity(chosen.len());
    for role in chosen {
        if !roles.contains(role) {
            roles.push(role.clone());
        }
    }
    roles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::HttpMethod;
    use crate::type_registry::FieldDef;

    fn group() -> GroupDescriptor {
        GroupDescriptor {
            group_name: "items".to_string(),
            base_url: "items/".to_string(),
            default_accept_type: "application/xml".to_string(),
            default_content_type: "application/json".to_string(),
            default_roles: vec!["admin".to_string()],
        }
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register_struct(
            "Item",
            vec![
                FieldDef::new("name", TypeRef::named("String")),
                FieldDef::new("quantity", TypeRef::named("u32")),
            ],
        );
        registry
    }

    #[test]
    fn test_accept_falls_back_to_group() {
        let registry = registry();
        let resolver = Resolver::new(&registry);
        let endpoint = EndpointDescriptor::new(HttpMethod::Get, "/");

        let resolved = resolver.resolve("list", &endpoint, &group()).unwrap();

        assert_eq!(resolved.accept, "application/xml");
        assert_eq!(resolved.content_type, "application/json");
        assert_eq!(resolved.group, "items");
    }

    #[test]
    fn test_endpoint_overrides_win() {
        let registry = registry();
        let resolver = Resolver::new(&registry);
        let mut endpoint = EndpointDescriptor::new(HttpMethod::Post, "/");
        endpoint.accept_override = Some("application/json".to_string());
        endpoint.content_type_override = Some("text/plain".to_string());
        endpoint.group_override = Some("stock".to_string());
        endpoint.roles_override = Some(vec!["clerk".to_string()]);

        let resolved = resolver.resolve("add", &endpoint, &group()).unwrap();

        assert_eq!(resolved.accept, "application/json");
        assert_eq!(resolved.content_type, "text/plain");
        assert_eq!(resolved.group, "stock");
        assert_eq!(resolved.roles, Some(vec!["clerk".to_string()]));
    }

    #[test]
    fn test_empty_overrides_count_as_unset() {
        let registry = registry();
        let resolver = Resolver::new(&registry);
        let mut endpoint = EndpointDescriptor::new(HttpMethod::Get, "/");
        endpoint.accept_override = Some(String::new());
        endpoint.group_override = Some(String::new());
        endpoint.roles_override = Some(Vec::new());
        endpoint.description = Some(String::new());

        let resolved = resolver.resolve("list", &endpoint, &group()).unwrap();

        assert_eq!(resolved.accept, "application/xml");
        assert_eq!(resolved.group, "items");
        assert_eq!(resolved.roles, Some(vec!["admin".to_string()]));
        assert_eq!(resolved.description, "");
    }

    #[test]
    fn test_roles_default_to_any() {
        let registry = registry();
        let resolver = Resolver::new(&registry);
        let group = GroupDescriptor {
            default_roles: Vec::new(),
            ..group()
        };
        let endpoint = EndpointDescriptor::new(HttpMethod::Get, "/");

        let resolved = resolver.resolve("list", &endpoint, &group).unwrap();

        assert_eq!(resolved.roles, Some(vec!["any".to_string()]));
    }

    #[test]
    fn test_roles_are_an_ordered_set() {
        let roles = resolve_roles(
            Some(&["user".to_string(), "admin".to_string(), "user".to_string()]),
            &[],
        );

        assert_eq!(roles, vec!["user", "admin"]);
    }

    #[test]
    fn test_url_assembly() {
        assert_eq!(join_url("items/", "/box-items"), "items/box-items");
        assert_eq!(join_url("items", "box-items"), "items/box-items");
        assert_eq!(join_url("/", "/"), "/");
        assert_eq!(join_url("", "auth/login"), "/auth/login");
        assert_eq!(join_url("", "/"), "/");
    }

    #[test]
    fn test_conflicting_request_sources() {
        let registry = registry();
        let resolver = Resolver::new(&registry);
        let mut endpoint = EndpointDescriptor::new(HttpMethod::Post, "/");
        endpoint.request_fields = Some(vec![FieldSpec::new("foo", "string")]);
        endpoint.request_type = Some(TypeRef::named("Item"));

        let err = resolver.resolve("ItemController::add_item", &endpoint, &group()).unwrap_err();

        match err {
            Error::ConflictingSchemaSource { handler, direction } => {
                assert_eq!(handler, "ItemController::add_item");
                assert_eq!(direction, Direction::Request);
            }
            other => panic!("Expected ConflictingSchemaSource, got {:?}", other),
        }
    }

    #[test]
    fn test_conflicting_response_sources() {
        let registry = registry();
        let resolver = Resolver::new(&registry);
        let mut endpoint = EndpointDescriptor::new(HttpMethod::Get, "/");
        endpoint.response_fields = Some(vec![FieldSpec::new("status", "boolean")]);
        endpoint.response_type = Some(TypeRef::named("Item"));

        let result = resolver.resolve("get", &endpoint, &group());

        assert!(matches!(
            result,
            Err(Error::ConflictingSchemaSource {
                direction: Direction::Response,
                ..
            })
        ));
    }

    #[test]
    fn test_explicit_fields_are_leaves() {
        let registry = registry();
        let resolver = Resolver::new(&registry);
        let mut endpoint = EndpointDescriptor::new(HttpMethod::Post, "auth/login");
        endpoint.request_fields = Some(vec![
            FieldSpec::new("username", "string"),
            FieldSpec::new("password", "string"),
        ]);
        endpoint.response_fields = Some(vec![FieldSpec::new("status", "boolean")]);

        let resolved = resolver.resolve("login", &endpoint, &group()).unwrap();

        let request = resolved.request.unwrap();
        assert_eq!(request.field("username"), Some(&SchemaNode::leaf("string")));
        assert_eq!(request.field("password"), Some(&SchemaNode::leaf("string")));
        let response = resolved.response.unwrap();
        assert_eq!(response.field("status"), Some(&SchemaNode::leaf("boolean")));
    }

    #[test]
    fn test_shape_type_is_expanded() {
        let registry = registry();
        let resolver = Resolver::new(&registry);
        let mut endpoint = EndpointDescriptor::new(HttpMethod::Post, "/");
        endpoint.request_type = Some(TypeRef::named("Item"));
        endpoint.response_type = Some(TypeRef::named("Item"));

        let resolved = resolver.resolve("add", &endpoint, &group()).unwrap();

        // each direction gets its own visited set
        assert_eq!(resolved.request, resolved.response);
        assert_eq!(
            resolved.request.unwrap().field("quantity"),
            Some(&SchemaNode::leaf("u32"))
        );
    }

    #[test]
    fn test_missing_payloads_are_absent() {
        let registry = registry();
        let resolver = Resolver::new(&registry);
        let endpoint = EndpointDescriptor::new(HttpMethod::Delete, "/");

        let resolved = resolver.resolve("remove", &endpoint, &group()).unwrap();

        assert!(resolved.request.is_none());
        assert!(resolved.response.is_none());
        assert_eq!(resolved.headers, Some(OrderedMap::new()));
        assert_eq!(resolved.status_codes, Some(OrderedMap::new()));
    }

    #[test]
    fn test_headers_and_status_codes_overwrite_duplicates() {
        let registry = registry();
        let resolver = Resolver::new(&registry);
        let mut endpoint = EndpointDescriptor::new(HttpMethod::Get, "/");
        endpoint.headers = vec![
            ("Authorization".to_string(), "Bearer a".to_string()),
            ("X-Trace".to_string(), "on".to_string()),
            ("Authorization".to_string(), "Bearer b".to_string()),
        ];
        endpoint.status_codes = vec![
            (200, "OK".to_string()),
            (500, "Internal error".to_string()),
            (200, "Fine".to_string()),
        ];

        let resolved = resolver.resolve("get", &endpoint, &group()).unwrap();

        let headers = resolved.headers.unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("Authorization").map(String::as_str), Some("Bearer b"));
        let status_codes = resolved.status_codes.unwrap();
        let codes: Vec<_> = status_codes.keys().collect();
        assert_eq!(codes, vec!["200", "500"]);
        assert_eq!(status_codes.get("200").map(String::as_str), Some("Fine"));
    }
}
