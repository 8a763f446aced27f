//! Resource registry.

use rmcp::model::{AnnotateAble, RawResource};

use super::definitions::{InsightsCatalogResource, ResourceDefinition, ServerInfoResource};
use super::service::ResourceEntry;

fn build_resource<R: ResourceDefinition>() -> ResourceEntry {
    let mut raw = RawResource::new(R::URI, R::NAME);
    raw.description = Some(R::DESCRIPTION.to_string());
    raw.mime_type = Some(R::MIME_TYPE.to_string());

    ResourceEntry {
        resource: raw.no_annotation(),
        content: R::content(),
    }
}

/// Every resource the server exposes.
pub fn get_all_resources() -> Vec<ResourceEntry> {
    vec![
        build_resource::<InsightsCatalogResource>(),
        build_resource::<ServerInfoResource>(),
    ]
}

pub fn resource_uris() -> Vec<&'static str> {
    vec![InsightsCatalogResource::URI, ServerInfoResource::URI]
}
