//! Tool registry: the list of tools and HTTP dispatch.

use std::sync::Arc;

use rmcp::model::Tool;
#[cfg(feature = "http")]
use tracing::warn;

#[cfg(feature = "http")]
use super::ToolError;
use super::definitions::{
    AccountInsightsTool, CampaignInsightsTool, ListAdAccountsTool, ListAdSetsTool, ListAdsTool,
    ListCampaignsTool,
};
use crate::domains::graph::GraphClient;

/// Central list of tools, bound to the shared Graph client.
pub struct ToolRegistry {
    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    client: Arc<GraphClient>,
}

impl ToolRegistry {
    pub fn new(client: Arc<GraphClient>) -> Self {
        Self { client }
    }

    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            ListAdAccountsTool::NAME,
            ListCampaignsTool::NAME,
            ListAdSetsTool::NAME,
            ListAdsTool::NAME,
            AccountInsightsTool::NAME,
            CampaignInsightsTool::NAME,
        ]
    }

    /// Metadata for every tool.
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            ListAdAccountsTool::to_tool(),
            ListCampaignsTool::to_tool(),
            ListAdSetsTool::to_tool(),
            ListAdsTool::to_tool(),
            AccountInsightsTool::to_tool(),
            CampaignInsightsTool::to_tool(),
        ]
    }

    /// Dispatch an HTTP tool call by name.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let client = self.client.clone();
        match name {
            ListAdAccountsTool::NAME => ListAdAccountsTool::http_handler(arguments, client).await,
            ListCampaignsTool::NAME => ListCampaignsTool::http_handler(arguments, client).await,
            ListAdSetsTool::NAME => ListAdSetsTool::http_handler(arguments, client).await,
            ListAdsTool::NAME => ListAdsTool::http_handler(arguments, client).await,
            AccountInsightsTool::NAME => AccountInsightsTool::http_handler(arguments, client).await,
            CampaignInsightsTool::NAME => CampaignInsightsTool::http_handler(arguments, client).await,
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(ToolError::not_found(name))
            }
        }
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tool_names())
            .finish()
    }
}
