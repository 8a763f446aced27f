//! Facebook Graph API domain.
//!
//! This module holds the logic that sits between the MCP tools and the
//! Marketing API:
//!
//! - `source` - a single authenticated GET against the Graph API
//! - `pager` - cursor-following pagination that merges every page
//! - `normalize` - flattening and numeric typing of insights rows
//! - `query` - endpoint and parameter builders for each listing
//! - `client` - the facade the tools call
//!
//! Nothing here caches or shares mutable state between calls; each fetch is a
//! fresh, strictly sequential chain of requests.

mod account;
mod client;
mod error;
mod normalize;
mod pager;
pub mod query;
mod source;

use std::collections::BTreeMap;

pub use account::{ACCOUNT_ID_PREFIX, normalize_account_id};
pub use client::GraphClient;
pub use error::{GraphError, GraphResult};
pub use normalize::{ActionEntry, ActionKeyTable, Normalizer, convert_numeric_fields};
pub use pager::{Page, Pager, Paging, next_page_params};
pub use query::{EntityKind, GraphRequest, InsightsLevel, InsightsQuery, ListQuery, StatusFilter};
pub use source::{HttpPageSource, PageSource};

#[cfg(test)]
pub(crate) use source::testing;

/// One row returned by a listing endpoint.
///
/// The shape is endpoint-dependent and never validated against a schema.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Query parameters for a single Graph API request.
pub type QueryParams = BTreeMap<String, String>;
