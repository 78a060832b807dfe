//! Validated serialization of the documentation document, plus the file sink.
//!
//! Every serializer validates required fields first; a document that fails
//! validation is never written out.

use crate::document::ServiceDocument;
use crate::error::{Error, Result};
use crate::validator::validate;
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes the document to JSON, compact or pretty-printed.
///
/// # Errors
///
/// Returns [`Error::ValidationError`] if a required field is absent, or
/// [`Error::SerializationError`] if JSON encoding fails.
pub fn serialize(doc: &ServiceDocument, pretty: bool) -> Result<String> {
    validate(doc)?;

    debug!("Serializing document to JSON (pretty: {})", pretty);
    let json = if pretty {
        serde_json::to_string_pretty(doc)?
    } else {
        serde_json::to_string(doc)?
    };
    Ok(json)
}

/// Serializes the document to YAML.
pub fn serialize_yaml(doc: &ServiceDocument) -> Result<String> {
    validate(doc)?;

    debug!("Serializing document to YAML");
    Ok(serde_yaml::to_string(doc)?)
}

/// Writes string content to a file, creating parent directories as needed.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Serializes the document as pretty JSON and writes it to `path`.
pub fn persist(doc: &ServiceDocument, path: &Path) -> Result<()> {
    let json = serialize(doc, true)?;
    write_to_file(&json, path)
}

/// Reads back a document previously written by [`persist`] as raw JSON.
pub fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::HttpMethod;
    use crate::document::{assemble, ResolvedEndpoint};
    use crate::ordered_map::OrderedMap;
    use crate::service_info::ServiceInfo;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn greet_endpoint() -> ResolvedEndpoint {
        let mut headers = OrderedMap::new();
        headers.insert("Authorization", "Bearer token".to_string());
        let mut status_codes = OrderedMap::new();
        status_codes.insert("200", "OK".to_string());
        status_codes.insert("500", "Internal error".to_string());

        ResolvedEndpoint {
            group: "basic".to_string(),
            method: HttpMethod::Get,
            accept: "text/plain".to_string(),
            url: "/".to_string(),
            description: "Greet the viewer".to_string(),
            content_type: "text/plain".to_string(),
            request: None,
            response: None,
            headers: Some(headers),
            roles: Some(vec!["user".to_string(), "admin".to_string()]),
            status_codes: Some(status_codes),
        }
    }

    fn create_test_document() -> ServiceDocument {
        assemble(
            ServiceInfo::new().title("Test API").version("1.0.0"),
            vec![greet_endpoint()],
        )
    }

    #[test]
    fn test_serialize_compact() {
        let json = serialize(&create_test_document(), false).unwrap();

        assert_eq!(
            json,
            "{\"apiInfo\":{\"title\":\"Test API\",\"version\":\"1.0.0\"},\"endpoints\":[\
             {\"group\":\"basic\",\"method\":\"GET\",\"accept\":\"text/plain\",\"url\":\"/\",\
             \"description\":\"Greet the viewer\",\"contentType\":\"text/plain\",\
             \"headers\":{\"Authorization\":\"Bearer token\"},\"roles\":[\"user\",\"admin\"],\
             \"statusCodes\":{\"200\":\"OK\",\"500\":\"Internal error\"}}]}"
        );
    }

    #[test]
    fn test_serialize_pretty_format() {
        let json = serialize(&create_test_document(), true).unwrap();

        assert!(json.contains('\n'));
        assert!(json.contains("  \"apiInfo\": {"));
        assert!(json.lines().count() > 5);
    }

    #[test]
    fn test_serialize_rejects_missing_headers() {
        let mut doc = create_test_document();
        doc.endpoints[0].headers = None;

        let err = serialize(&doc, false).unwrap_err();

        assert!(matches!(err, Error::ValidationError(_)));
        assert!(err.to_string().contains("headers"));
    }

    #[test]
    fn test_serialize_yaml() {
        let yaml = serialize_yaml(&create_test_document()).unwrap();

        assert!(yaml.contains("apiInfo:"));
        assert!(yaml.contains("title: Test API"));
        assert!(yaml.contains("method: GET"));
        assert!(yaml.contains("Authorization: Bearer token"));
    }

    #[test]
    fn test_serialize_yaml_validates() {
        let mut doc = create_test_document();
        doc.endpoints[0].status_codes = None;

        assert!(matches!(serialize_yaml(&doc), Err(Error::ValidationError(_))));
    }

    #[test]
    fn test_serialize_without_title() {
        let doc = assemble(ServiceInfo::new().version("1"), Vec::new());

        let json = serialize(&doc, false).unwrap();

        assert_eq!(json, r#"{"apiInfo":{"version":"1"},"endpoints":[]}"#);
    }

    #[test]
    fn test_write_to_file_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("doc").join("nested").join("api-doc.json");

        write_to_file("content", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "content");
    }

    #[test]
    fn test_write_to_file_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("api-doc.json");

        write_to_file("initial content", &file_path).unwrap();
        write_to_file("new content", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new content");
    }

    #[test]
    fn test_persist_writes_pretty_json() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("doc/api-doc.json");

        persist(&create_test_document(), &file_path).unwrap();

        let value = read_json(&file_path).unwrap();
        assert_eq!(value["apiInfo"]["title"], "Test API");
        assert_eq!(value["endpoints"][0]["statusCodes"]["500"], "Internal error");
        assert!(fs::read_to_string(&file_path).unwrap().contains('\n'));
    }

    #[test]
    fn test_persist_refuses_invalid_document() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("api-doc.json");
        let mut doc = create_test_document();
        doc.endpoints[0].roles = None;

        assert!(persist(&doc, &file_path).is_err());
        assert!(!file_path.exists());
    }
}
