//! Resource service: listing and reading registered resources.

use std::collections::BTreeMap;

use rmcp::model::{ReadResourceResult, Resource, ResourceContents};
use serde_json::json;
use tracing::{debug, info};

use super::error::ResourceError;
use super::registry::get_all_resources;
use crate::core::config::Config;

/// Serves the registered resources.
///
/// Dynamic resources are rendered from a snapshot of the configuration taken
/// at construction. The access token is never part of that snapshot.
pub struct ResourceService {
    server_info: ServerInfoSnapshot,
    resources: BTreeMap<String, ResourceEntry>,
}

#[derive(Debug, Clone)]
pub struct ResourceEntry {
    pub resource: Resource,
    pub content: ResourceContent,
}

#[derive(Debug, Clone)]
pub enum ResourceContent {
    /// Fixed text computed at registration.
    Text(String),

    /// Rendered on every read.
    Dynamic(DynamicResourceType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynamicResourceType {
    ServerInfo,
}

/// Non-secret settings reported by the server info resource.
#[derive(Debug, Clone)]
struct ServerInfoSnapshot {
    name: String,
    version: String,
    transport: String,
    base_url: String,
    api_version: String,
    timeout_secs: u64,
    page_limit: u32,
}

impl ServerInfoSnapshot {
    fn from_config(config: &Config) -> Self {
        Self {
            name: config.server.name.clone(),
            version: config.server.version.clone(),
            transport: config.transport.description(),
            base_url: config.graph.base_url.clone(),
            api_version: config.graph.api_version.clone(),
            timeout_secs: config.graph.timeout_secs,
            page_limit: config.graph.page_limit,
        }
    }
}

impl ResourceService {
    pub fn new(config: &Config) -> Self {
        let mut service = Self {
            server_info: ServerInfoSnapshot::from_config(config),
            resources: BTreeMap::new(),
        };

        for entry in get_all_resources() {
            service.register_resource(entry);
        }
        info!("Registered {} resource(s)", service.resources.len());

        service
    }

    pub fn register_resource(&mut self, entry: ResourceEntry) {
        debug!("Registering resource: {}", entry.resource.raw.uri);
        self.resources
            .insert(entry.resource.raw.uri.to_string(), entry);
    }

    pub async fn list_resources(&self) -> Vec<Resource> {
        self.resources
            .values()
            .map(|entry| entry.resource.clone())
            .collect()
    }

    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        let entry = self
            .resources
            .get(uri)
            .ok_or_else(|| ResourceError::not_found(uri))?;

        let content = match &entry.content {
            ResourceContent::Text(text) => ResourceContents::text(text, uri),
            ResourceContent::Dynamic(dynamic) => self.resolve_dynamic_content(uri, *dynamic)?,
        };

        Ok(ReadResourceResult {
            contents: vec![content],
        })
    }

    fn resolve_dynamic_content(
        &self,
        uri: &str,
        dynamic: DynamicResourceType,
    ) -> Result<ResourceContents, ResourceError> {
        match dynamic {
            DynamicResourceType::ServerInfo => {
                let info = &self.server_info;
                let body = json!({
                    "name": info.name,
                    "version": info.version,
                    "transport": info.transport,
                    "graph": {
                        "base_url": info.base_url,
                        "api_version": info.api_version,
                        "timeout_secs": info.timeout_secs,
                        "page_limit": info.page_limit,
                    },
                });

                Ok(ResourceContents::text(
                    serde_json::to_string_pretty(&body)
                        .map_err(|e| ResourceError::internal(e.to_string()))?,
                    uri,
                ))
            }
        }
    }
}
