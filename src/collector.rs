//! Walks handler groups and turns every described handler into a resolved endpoint.

use crate::descriptor::{EndpointDescriptor, GroupDescriptor};
use crate::document::ResolvedEndpoint;
use crate::error::{Error, Result};
use crate::resolver::Resolver;
use crate::type_registry::TypeRegistry;
use log::{debug, info};

/// A handler type (controller) with its handlers in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerGroup {
    pub name: String,
    pub descriptor: Option<GroupDescriptor>,
    pub handlers: Vec<Handler>,
}

/// A single handler function; only handlers carrying a descriptor are documented.
#[derive(Debug, Clone, PartialEq)]
pub struct Handler {
    pub name: String,
    pub descriptor: Option<EndpointDescriptor>,
}

impl HandlerGroup {
    pub fn new(name: impl Into<String>, descriptor: Option<GroupDescriptor>) -> Self {
        Self {
            name: name.into(),
            descriptor,
            handlers: Vec::new(),
        }
    }

    pub fn with_handler(mut self, name: impl Into<String>, descriptor: Option<EndpointDescriptor>) -> Self {
        self.handlers.push(Handler {
            name: name.into(),
            descriptor,
        });
        self
    }
}

/// Endpoint collector
pub struct EndpointCollector<'a> {
    resolver: Resolver<'a>,
}

impl<'a> EndpointCollector<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            resolver: Resolver::new(registry),
        }
    }

    /// Collects the resolved endpoints of all groups, in group order and then
    /// handler declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingGroupDescriptor`] for a group without a group
    /// descriptor, and propagates resolution errors. Either aborts the whole run.
    pub fn collect(&self, groups: &[HandlerGroup]) -> Result<Vec<ResolvedEndpoint>> {
        let mut endpoints = Vec::new();

        for group in groups {
            let group_descriptor = group
                .descriptor
                .as_ref()
                .ok_or_else(|| Error::MissingGroupDescriptor(group.name.clone()))?;

            let before = endpoints.len();
            for handler in &group.handlers {
                let Some(endpoint) = &handler.descriptor else {
                    debug!("Skipping undocumented handler {}::{}", group.name, handler.name);
                    continue;
                };

                let handler_name = format!("{}::{}", group.name, handler.name);
                endpoints.push(self.resolver.resolve(&handler_name, endpoint, group_descriptor)?);
            }

            debug!(
                "Collected {} endpoints from {}",
                endpoints.len() - before,
                group.name
            );
        }

        info!("Collected {} endpoints from {} groups", endpoints.len(), groups.len());
        Ok(endpoints)
    }
}
