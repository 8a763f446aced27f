//! `list_ad_accounts`: every ad account the access token can see.
//!
//! This is the entry point of a reporting session; the `id` it returns
//! (`act_...`) is the `account_id` every other tool takes.

use std::sync::Arc;

use rmcp::{
    handler::server::tool::{ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use super::super::common::{blocking_route, graph_failure, rows_result};
use crate::domains::graph::GraphClient;

/// `list_ad_accounts` takes no arguments.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListAdAccountsParams {}

#[derive(Debug, Clone)]
pub struct ListAdAccountsTool;

impl ListAdAccountsTool {
    pub const NAME: &'static str = "list_ad_accounts";

    pub const DESCRIPTION: &'static str = "List all Facebook ad accounts accessible with the \
        configured access token. Call this first: use the returned 'id' (e.g. 'act_123456789') \
        as account_id for every other tool. Pagination is handled internally, so the result \
        contains ALL accounts with id, account_id, name, currency, timezone_name, \
        account_status (1 = active, 101 = disabled) and business.";

    #[instrument(skip_all, fields(tool = Self::NAME))]
    pub fn execute(_params: &ListAdAccountsParams, client: &GraphClient) -> CallToolResult {
        info!("Listing ad accounts");

        match client.ad_accounts() {
            Ok(rows) => {
                let summary = format!("Found {} ad account(s)", rows.len());
                rows_result(summary, rows)
            }
            Err(e) => graph_failure(Self::NAME, e),
        }
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        client: Arc<GraphClient>,
    ) -> Result<serde_json::Value, crate::domains::tools::ToolError> {
        super::super::common::http_call(Self::NAME, arguments, client, Self::execute).await
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ListAdAccountsParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: Some("List ad accounts".into()),
        }
    }

    pub fn create_route<S>(client: Arc<GraphClient>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        blocking_route(Self::to_tool(), client, Self::execute)
    }
}
