//! `get_account_insights`: the general performance report.

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
pub struct AccountInsightsParams {
    #[schemars(description = "Ad account ID, with or without the 'act_' prefix")]
    pub account_id: String,

    #[schemars(description = "Start date, YYYY-MM-DD (inclusive)")]
    pub start_date: String,

    #[schemars(description = "End date, YYYY-MM-DD (inclusive)")]
    pub end_date: String,

    #[schemars(
        description = "Metrics to retrieve, e.g. spend, impressions, reach, inline_link_clicks, \
                       clicks, ctr, cpc, cpm, campaign_name, adset_name, ad_name, actions, \
                       action_values, conversions, purchase_roas"
    )]
    pub fields: Vec<String>,

    #[schemars(
        description = "Aggregation level: account (default), campaign, adset or ad. Include the \
                       matching *_name field when not 'account'"
    )]
    #[serde(default)]
    pub level: InsightsLevel,

    #[schemars(description = "Optional breakdowns, e.g. ['age'], ['gender'], ['country'], ['publisher_platform']")]
    #[serde(default)]
    pub breakdowns: Vec<String>,

    #[schemars(
        description = "Time granularity: '1' daily, '7' weekly, 'monthly', or 'all_days' / omitted for one total row"
    )]
    #[serde(default)]
    pub time_increment: Option<String>,

    #[schemars(description = "Only report these campaign IDs (get them from list_campaigns)")]
    #[serde(default)]
    pub campaign_ids: Vec<String>,

    #[schemars(description = "Only report these ad set IDs")]
    #[serde(default)]
    pub adset_ids: Vec<String>,

    #[schemars(description = "Only report these ad IDs")]
    #[serde(default)]
    pub ad_ids: Vec<String>,

    #[schemars(
        description = "Flatten action lists into columns such as action_purchase and convert \
                       numeric strings to numbers (default: true). False returns raw rows"
    )]
    #[serde(default = "default_true")]
    pub flatten_actions: bool,
}

impl AccountInsightsParams {
    pub fn to_query(&self) -> InsightsQuery {
        InsightsQuery {
            account_id: self.account_id.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            fields: self.fields.clone(),
            level: self.level,
            breakdowns: self.breakdowns.clone(),
            time_increment: self.time_increment.clone(),
            campaign_ids: self.campaign_ids.clone(),
            adset_ids: self.adset_ids.clone(),
            ad_ids: self.ad_ids.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccountInsightsTool;

impl AccountInsightsTool {
    pub const NAME: &'static str = "get_account_insights";

    pub const DESCRIPTION: &'static str = "Get performance insights for an ad account over a date \
        range. All pages are fetched automatically. Choose the level (account, campaign, adset, \
        ad), optional breakdowns and time_increment, and filter by campaign_ids, adset_ids or \
        ad_ids. To report on campaigns matching a name, call list_campaigns first and pass the \
        matching ids as campaign_ids. With flatten_actions (default) 'actions' becomes \
        action_<type>, 'action_values' becomes action_value_<type> and 'conversions' becomes \
        conversion_<type>. To match the Ads Manager UI compute CTR = inline_link_clicks / \
        impressions * 100 and CPC = spend / inline_link_clicks.";

    #[instrument(skip_all, fields(tool = Self::NAME))]
    pub fn execute(params: &AccountInsightsParams, client: &GraphClient) -> CallToolResult {
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
            input_schema: cached_schema_for_type::<AccountInsightsParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: Some("Account insights".into()),
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
    use super::super::super::common::testing::{is_error, structured, text};
    use super::*;
    use crate::domains::graph::testing::{ScriptedSource, page_body};
    use serde_json::{Value, json};

    fn params(arguments: Value) -> AccountInsightsParams {
        serde_json::from_value(arguments).unwrap()
    }

    #[test]
    fn test_params_defaults() {
        let p = params(json!({
            "account_id": "123",
            "start_date": "2025-01-01",
            "end_date": "2025-01-31",
            "fields": ["spend"]
        }));

        assert_eq!(p.level, InsightsLevel::Account);
        assert!(p.flatten_actions);
        assert!(p.breakdowns.is_empty());
        assert!(p.time_increment.is_none());
        assert!(p.campaign_ids.is_empty());
    }

    #[test]
    fn test_flattened_report_across_pages() {
        let source = Arc::new(
            ScriptedSource::new()
                .page(page_body(
                    vec![json!({
                        "campaign_name": "Summer Sale",
                        "spend": "150.50",
                        "impressions": "25000",
                        "actions": [
                            { "action_type": "purchase", "value": "12" },
                            { "action_type": "offsite_conversion.fb_pixel_lead", "value": "3" },
                            { "value": "7" }
                        ],
                        "date_start": "2025-01-01"
                    })],
                    Some("https://graph.facebook.com/v24.0/act_1/insights?after=abc&limit=100"),
                ))
                .page(page_body(
                    vec![json!({ "campaign_name": "Winter", "spend": "0", "impressions": "10" })],
                    None,
                )),
        );
        let client = GraphClient::with_source(source.clone(), 100);
        let p = params(json!({
            "account_id": "act_1",
            "start_date": "2025-01-01",
            "end_date": "2025-01-07",
            "fields": ["campaign_name", "spend", "impressions", "actions"],
            "level": "campaign",
            "time_increment": "1",
            "campaign_ids": ["111", "222"]
        }));

        let result = AccountInsightsTool::execute(&p, &client);

        assert!(!is_error(&result));
        assert_eq!(
            text(&result, 0),
            "Fetched 2 insights row(s) at campaign level for 2025-01-01 to 2025-01-07"
        );
        let rows = &structured(&result)["rows"];
        assert_eq!(
            rows[0],
            json!({
                "campaign_name": "Summer Sale",
                "spend": 150.5,
                "impressions": 25000,
                "action_purchase": 12,
                "action_offsite_conversion_fb_pixel_lead": 3,
                "date_start": "2025-01-01"
            })
        );
        assert_eq!(rows[1]["spend"], json!(0));

        let requests = source.requests();
        assert_eq!(requests.len(), 2);
        let first = &requests[0].1;
        assert_eq!(first.get("level").map(String::as_str), Some("campaign"));
        assert_eq!(first.get("time_increment").map(String::as_str), Some("1"));
        assert!(first["filtering"].contains("campaign.id"));
        assert_eq!(requests[1].1.get("after").map(String::as_str), Some("abc"));
        assert!(!requests[1].1.contains_key("filtering"));
    }

    #[test]
    fn test_raw_rows_when_not_flattening() {
        let source = Arc::new(ScriptedSource::new().page(page_body(
            vec![json!({ "spend": "9.99", "actions": [{ "action_type": "lead", "value": "1" }] })],
            None,
        )));
        let client = GraphClient::with_source(source, 100);
        let p = params(json!({
            "account_id": "1",
            "start_date": "2025-02-01",
            "end_date": "2025-02-28",
            "fields": ["spend", "actions"],
            "flatten_actions": false
        }));

        let result = AccountInsightsTool::execute(&p, &client);

        let row = &structured(&result)["rows"][0];
        assert_eq!(row["spend"], "9.99");
        assert!(row["actions"].is_array());
    }

    #[test]
    fn test_reversed_dates_rejected_before_request() {
        let source = Arc::new(ScriptedSource::new());
        let client = GraphClient::with_source(source.clone(), 100);
        let p = params(json!({
            "account_id": "1",
            "start_date": "2025-03-01",
            "end_date": "2025-02-01",
            "fields": ["spend"]
        }));

        let result = AccountInsightsTool::execute(&p, &client);

        assert!(is_error(&result));
        assert!(text(&result, 0).contains("after end_date"));
        assert!(source.requests().is_empty());
    }
}
