use crate::ordered_map::OrderedMap;
use serde::{Deserialize, Serialize};

/// General information about the documented service.
///
/// Built with chained by-value setters before the document is assembled:
///
/// ```
/// use apidoc_from_source::service_info::ServiceInfo;
///
/// let info = ServiceInfo::new()
///     .title("API Documentation")
///     .version("1")
///     .add_contact("email", "support@example.com")
///     .add_license("title", "MIT");
/// assert_eq!(info.title.as_deref(), Some("API Documentation"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,
    #[serde(skip_serializing_if = "OrderedMap::is_empty")]
    pub contact: OrderedMap<String>,
    #[serde(skip_serializing_if = "OrderedMap::is_empty")]
    pub license: OrderedMap<String>,
}

impl ServiceInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn terms_of_service(mut self, terms_of_service: impl Into<String>) -> Self {
        self.terms_of_service = Some(terms_of_service.into());
        self
    }

    /// Replaces the whole contact map.
    pub fn contact(mut self, contact: OrderedMap<String>) -> Self {
        self.contact = contact;
        self
    }

    /// Replaces the whole license map.
    pub fn license(mut self, license: OrderedMap<String>) -> Self {
        self.license = license;
        self
    }

    pub fn add_contact(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.contact.insert(key, value.into());
        self
    }

    pub fn add_license(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.license.insert(key, value.into());
        self
    }

    /// Fills every field unset here from `fallback`; contact and license
    /// entries from `fallback` are added only for keys not already present.
    pub fn or(mut self, fallback: ServiceInfo) -> Self {
        self.title = self.title.or(fallback.title);
        self.version = self.version.or(fallback.version);
        self.description = self.description.or(fallback.description);
        self.terms_of_service = self.terms_of_service.or(fallback.terms_of_service);
        for (key, value) in fallback.contact {
            if !self.contact.contains_key(&key) {
                self.contact.insert(key, value);
            }
        }
        for (key, value) in fallback.license {
            if !self.license.contains_key(&key) {
                self.license.insert(key, value);
            }
        }
        self
    }
}
