//! Resource definitions, one file per resource.

pub mod insights_catalog;
pub mod server_info;

pub use insights_catalog::InsightsCatalogResource;
pub use server_info::ServerInfoResource;

use super::service::ResourceContent;

/// Metadata and content source of a resource.
pub trait ResourceDefinition {
    const URI: &'static str;
    const NAME: &'static str;
    const DESCRIPTION: &'static str;
    const MIME_TYPE: &'static str;

    fn content() -> ResourceContent;
}
