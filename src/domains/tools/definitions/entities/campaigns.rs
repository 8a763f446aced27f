//! `list_campaigns`: campaigns under one ad account.

use std::sync::Arc;

use rmcp::{
    handler::server::tool::{ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use tracing::instrument;

use super::super::common::blocking_route;
use super::{EntityListParams, list_entities};
use crate::domains::graph::{EntityKind, GraphClient};

#[derive(Debug, Clone)]
pub struct ListCampaignsTool;

impl ListCampaignsTool {
    pub const NAME: &'static str = "list_campaigns";

    pub const DESCRIPTION: &'static str = "List ALL campaigns of an ad account (pagination is \
        handled internally). Returns id, name, status, effective_status, objective, \
        daily_budget, lifetime_budget, created_time and updated_time. To report on campaigns \
        whose names match a pattern, filter this list by name and pass the matching ids to \
        get_account_insights as campaign_ids. Budgets are in the account currency's minor \
        unit (cents).";

    #[instrument(skip_all, fields(tool = Self::NAME))]
    pub fn execute(params: &EntityListParams, client: &GraphClient) -> CallToolResult {
        list_entities(Self::NAME, EntityKind::Campaigns, params, client)
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
            input_schema: cached_schema_for_type::<EntityListParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: Some("List campaigns".into()),
        }
    }

    pub fn create_route<S>(client: Arc<GraphClient>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        blocking_route(Self::to_tool(), client, Self::execute)
    }
}
