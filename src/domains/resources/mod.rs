//! Resources domain module.
//!
//! Read-only documents for MCP clients: the insights catalog and the
//! running server's settings.
//!
//! - `definitions/` - one file per resource
//! - `registry.rs` - the list of resources
//! - `service.rs` - listing and reading, including dynamic content

pub mod definitions;
mod error;
mod registry;
mod service;

pub use definitions::ResourceDefinition;
pub use error::ResourceError;
pub use registry::{get_all_resources, resource_uris};
pub use service::{DynamicResourceType, ResourceContent, ResourceEntry, ResourceService};
