//! The assembled documentation document.

use crate::descriptor::HttpMethod;
use crate::ordered_map::OrderedMap;
use crate::schema::SchemaNode;
use crate::service_info::ServiceInfo;
use log::debug;
use serde::Serialize;

/// An endpoint after all override precedence has been applied.
///
/// `headers`, `roles` and `status_codes` are required by the output contract.
/// The resolver always fills them; they are optional only so that validation
/// can reject a document in which they went missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedEndpoint {
    pub group: String,
    pub method: HttpMethod,
    pub accept: String,
    pub url: String,
    pub description: String,
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<SchemaNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<SchemaNode>,
    #[serde(skip_serializing_if = "is_absent_or_empty")]
    pub headers: Option<OrderedMap<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_codes: Option<OrderedMap<String>>,
}

fn is_absent_or_empty(map: &Option<OrderedMap<String>>) -> bool {
    map.as_ref().map_or(true, OrderedMap::is_empty)
}

/// Service information paired with the ordered endpoint list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDocument {
    pub api_info: ServiceInfo,
    pub endpoints: Vec<ResolvedEndpoint>,
}

/// Pairs service metadata with the collected endpoints.
pub fn assemble(info: ServiceInfo, endpoints: Vec<ResolvedEndpoint>) -> ServiceDocument {
    debug!("Assembling document with {} endpoints", endpoints.len());
    ServiceDocument {
        api_info: info,
        endpoints,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greet_endpoint() -> ResolvedEndpoint {
        ResolvedEndpoint {
            group: "basic".to_string(),
            method: HttpMethod::Get,
            accept: "text/plain".to_string(),
            url: "/".to_string(),
            description: String::new(),
            content_type: "text/plain".to_string(),
            request: None,
            response: None,
            headers: Some(OrderedMap::new()),
            roles: Some(vec!["any".to_string()]),
            status_codes: Some(OrderedMap::new()),
        }
    }

    #[test]
    fn test_empty_headers_omitted_and_description_kept() {
        let json = serde_json::to_string(&greet_endpoint()).unwrap();

        assert_eq!(
            json,
            r#"{"group":"basic","method":"GET","accept":"text/plain","url":"/","description":"","contentType":"text/plain","roles":["any"],"statusCodes":{}}"#
        );
    }

    #[test]
    fn test_payload_keys_follow_content_type() {
        let mut endpoint = greet_endpoint();
        endpoint.description = "Greet".to_string();
        endpoint.request = Some(SchemaNode::Object(
            vec![("name", SchemaNode::leaf("String"))].into_iter().collect(),
        ));

        let json = serde_json::to_string(&endpoint).unwrap();
        let position = |key: &str| json.find(&format!("\"{}\":", key)).unwrap();
        assert!(position("description") < position("contentType"));
        assert!(position("contentType") < position("request"));
        assert!(position("request") < position("roles"));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["request"]["name"], "String");
        assert_eq!(value["description"], "Greet");
        assert!(value.get("response").is_none());
    }

    #[test]
    fn test_assemble_keeps_endpoint_order() {
        let mut second = greet_endpoint();
        second.url = "/second".to_string();

        let doc = assemble(
            ServiceInfo::new().title("API"),
            vec![greet_endpoint(), second],
        );

        assert_eq!(doc.endpoints[0].url, "/");
        assert_eq!(doc.endpoints[1].url, "/second");
        assert_eq!(doc.api_info.title.as_deref(), Some("API"));
    }
}
