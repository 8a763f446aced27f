//! Builds the rmcp `ToolRouter` from the tool definitions.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use super::definitions::{
    AccountInsightsTool, CampaignInsightsTool, ListAdAccountsTool, ListAdSetsTool, ListAdsTool,
    ListCampaignsTool,
};
use crate::domains::graph::GraphClient;

/// Build the tool router with every registered tool sharing `client`.
pub fn build_tool_router<S>(client: Arc<GraphClient>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(ListAdAccountsTool::create_route(client.clone()))
        .with_route(ListCampaignsTool::create_route(client.clone()))
        .with_route(ListAdSetsTool::create_route(client.clone()))
        .with_route(ListAdsTool::create_route(client.clone()))
        .with_route(AccountInsightsTool::create_route(client.clone()))
        .with_route(CampaignInsightsTool::create_route(client))
}
