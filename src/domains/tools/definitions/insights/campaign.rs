//! `get_campaign_insights`: insights broken down by campaign.

use std::sync::Arc;

use rmcp::{
    handler::server::tool::{ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use super::super::common::{blocking_route, default_true};
use super::run_insights;
use crate::domains::graph::{GraphClient, InsightsLevel, InsightsQuery};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CampaignInsightsParams {
    #[schemars(description = "Ad account ID, with or without the 'act_' prefix")]
    pub account_id: String,

    #[schemars(description = "Start date, YYYY-MM-DD (inclusive)")]
    pub start_date: String,

    #[schemars(description = "End date, YYYY-MM-DD (inclusive)")]
    pub end_date: String,

    #[schemars(description = "Metrics to retrieve; include 'campaign_name'")]
    pub fields: Vec<String>,

    #[schemars(description = "Time granularity: '1' daily, 'all_days' or omitted for totals")]
    #[serde(default)]
    pub time_increment: Option<String>,

    #[schemars(description = "Flatten action lists into columns (default: true)")]
    #[serde(default = "default_true")]
    pub flatten_actions: bool,
}

impl CampaignInsightsParams {
    /// Account insights query with the level pinned to `campaign`.
    pub fn to_query(&self) -> InsightsQuery {
        InsightsQuery {
            level: InsightsLevel::Campaign,
            time_increment: self.time_increment.clone(),
            ..InsightsQuery::new(
                self.account_id.clone(),
                self.start_date.clone(),
                self.end_date.clone(),
                self.fields.clone(),
            )
        }
    }
}

#[derive(Debug, Clone)]
pub struct CampaignInsightsTool;

impl CampaignInsightsTool {
    pub const NAME: &'static str = "get_campaign_insights";

    pub const DESCRIPTION: &'static str = "Get performance insights broken down by campaign. \
        Shortcut for get_account_insights with level='campaign'; all pages are fetched \
        automatically. Include 'campaign_name' in fields.";

    #[instrument(skip_all, fields(tool = Self::NAME))]
    pub fn execute(params: &CampaignInsightsParams, client: &GraphClient) -> CallToolResult {
        run_insights(Self::NAME, &params.to_query(), params.flatten_actions, client)
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
            input_schema: cached_schema_for_type::<CampaignInsightsParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: Some("Campaign insights".into()),
        }
    }

    pub fn create_route<S>(client: Arc<GraphClient>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        blocking_route(Self::to_tool(), client, Self::execute)
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::common::testing::{is_error, structured};
    use super::*;
    use crate::domains::graph::testing::{ScriptedSource, page_body};
    use serde_json::json;

    #[test]
    fn test_level_forced_to_campaign() {
        let source = Arc::new(ScriptedSource::new().page(page_body(
            vec![json!({ "campaign_name": "Q1", "spend": "42" })],
            None,
        )));
        let client = GraphClient::with_source(source.clone(), 50);
        let params: CampaignInsightsParams = serde_json::from_value(json!({
            "account_id": "777",
            "start_date": "2025-01-01",
            "end_date": "2025-03-31",
            "fields": ["campaign_name", "spend"]
        }))
        .unwrap();

        let result = CampaignInsightsTool::execute(&params, &client);

        assert!(!is_error(&result));
        assert_eq!(structured(&result)["rows"][0]["spend"], json!(42));

        let requests = source.requests();
        assert_eq!(requests[0].0, "/act_777/insights");
        assert_eq!(requests[0].1.get("level").map(String::as_str), Some("campaign"));
        assert_eq!(requests[0].1.get("limit").map(String::as_str), Some("50"));
        assert!(!requests[0].1.contains_key("time_increment"));
    }
}
