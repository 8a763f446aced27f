//! Endpoint and parameter builders for each Graph listing.
//!
//! Field catalogs and parameter encodings live here so the tools only deal
//! with typed arguments.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{GraphError, GraphResult, QueryParams, normalize_account_id};

/// Default number of rows requested per page.
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Date format accepted for insights ranges.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const AD_ACCOUNT_FIELDS: &str =
    "id,name,account_id,currency,timezone_name,account_status,business";

pub const CAMPAIGN_FIELDS: &str = "id,name,status,effective_status,objective,daily_budget,\
                                   lifetime_budget,created_time,updated_time";

pub const AD_SET_FIELDS: &str = "id,name,status,effective_status,daily_budget,lifetime_budget,\
                                 targeting,created_time,updated_time";

pub const AD_FIELDS: &str =
    "id,name,status,effective_status,creative{id,title,body,image_url},created_time,updated_time";

/// A resolved request: endpoint path plus its initial parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphRequest {
    pub endpoint: String,
    pub params: QueryParams,
}

impl GraphRequest {
    /// All ad accounts visible to the token.
    pub fn ad_accounts(limit: u32) -> Self {
        Self {
            endpoint: "/me/adaccounts".to_string(),
            params: QueryParams::from([
                ("fields".to_string(), AD_ACCOUNT_FIELDS.to_string()),
                ("limit".to_string(), limit.to_string()),
            ]),
        }
    }
}

/// Effective status filter for entity listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusFilter {
    Active,
    Paused,
    Archived,
}

impl StatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Paused => "PAUSED",
            Self::Archived => "ARCHIVED",
        }
    }
}

/// Entities listed under an ad account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Campaigns,
    AdSets,
    Ads,
}

impl EntityKind {
    /// Graph edge name under the account node.
    pub fn edge(self) -> &'static str {
        match self {
            Self::Campaigns => "campaigns",
            Self::AdSets => "adsets",
            Self::Ads => "ads",
        }
    }

    pub fn fields(self) -> &'static str {
        match self {
            Self::Campaigns => CAMPAIGN_FIELDS,
            Self::AdSets => AD_SET_FIELDS,
            Self::Ads => AD_FIELDS,
        }
    }

    /// Human-readable plural used in summaries.
    pub fn label(self) -> &'static str {
        match self {
            Self::Campaigns => "campaign(s)",
            Self::AdSets => "ad set(s)",
            Self::Ads => "ad(s)",
        }
    }
}

/// Listing of campaigns, ad sets or ads for one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub account_id: String,
    pub kind: EntityKind,
    pub status: Option<StatusFilter>,
}

impl ListQuery {
    pub fn new(account_id: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            account_id: account_id.into(),
            kind,
            status: None,
        }
    }

    pub fn with_status(mut self, status: Option<StatusFilter>) -> Self {
        self.status = status;
        self
    }

    pub fn build(&self, limit: u32) -> GraphResult<GraphRequest> {
        let account_id = normalize_account_id(&self.account_id)?;

        let mut params = QueryParams::from([
            ("fields".to_string(), self.kind.fields().to_string()),
            ("limit".to_string(), limit.to_string()),
        ]);
        if let Some(status) = self.status {
            params.insert(
                "effective_status".to_string(),
                json!([status.as_str()]).to_string(),
            );
        }

        Ok(GraphRequest {
            endpoint: format!("/{}/{}", account_id, self.kind.edge()),
            params,
        })
    }
}

/// Aggregation level of an insights report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum InsightsLevel {
    #[default]
    Account,
    Campaign,
    Adset,
    Ad,
}

impl InsightsLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Campaign => "campaign",
            Self::Adset => "adset",
            Self::Ad => "ad",
        }
    }
}

/// An insights report request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InsightsQuery {
    pub account_id: String,
    /// Inclusive start, `YYYY-MM-DD`.
    pub start_date: String,
    /// Inclusive end, `YYYY-MM-DD`.
    pub end_date: String,
    pub fields: Vec<String>,
    pub level: InsightsLevel,
    pub breakdowns: Vec<String>,
    /// `1`, `7`, `monthly`, `all_days`, ...
    pub time_increment: Option<String>,
    pub campaign_ids: Vec<String>,
    pub adset_ids: Vec<String>,
    pub ad_ids: Vec<String>,
}

impl InsightsQuery {
    pub fn new(
        account_id: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        fields: Vec<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            fields,
            ..Default::default()
        }
    }

    /// Validate the query and encode it as Graph parameters.
    pub fn build(&self, limit: u32) -> GraphResult<GraphRequest> {
        let account_id = normalize_account_id(&self.account_id)?;

        let since = parse_date("start_date", &self.start_date)?;
        let until = parse_date("end_date", &self.end_date)?;
        if since > until {
            return Err(GraphError::invalid_query(format!(
                "start_date {} is after end_date {}",
                self.start_date, self.end_date
            )));
        }

        let fields = join_non_empty(&self.fields);
        if fields.is_empty() {
            return Err(GraphError::invalid_query(
                "at least one insights field is required",
            ));
        }

        let mut params = QueryParams::from([
            ("fields".to_string(), fields),
            ("level".to_string(), self.level.as_str().to_string()),
            (
                "time_range".to_string(),
                json!({
                    "since": since.format(DATE_FORMAT).to_string(),
                    "until": until.format(DATE_FORMAT).to_string(),
                })
                .to_string(),
            ),
            ("limit".to_string(), limit.to_string()),
        ]);

        let breakdowns = join_non_empty(&self.breakdowns);
        if !breakdowns.is_empty() {
            params.insert("breakdowns".to_string(), breakdowns);
        }

        if let Some(increment) = self.time_increment.as_deref().map(str::trim) {
            if !increment.is_empty() {
                params.insert("time_increment".to_string(), increment.to_string());
            }
        }

        if let Some(filtering) = self.filtering() {
            params.insert("filtering".to_string(), filtering);
        }

        Ok(GraphRequest {
            endpoint: format!("/{account_id}/insights"),
            params,
        })
    }

    /// JSON `filtering` array for the campaign, ad set and ad id filters.
    fn filtering(&self) -> Option<String> {
        let filters: Vec<_> = [
            ("campaign.id", &self.campaign_ids),
            ("adset.id", &self.adset_ids),
            ("ad.id", &self.ad_ids),
        ]
        .into_iter()
        .filter(|(_, ids)| !ids.is_empty())
        .map(|(field, ids)| json!({ "field": field, "operator": "IN", "value": ids }))
        .collect();

        if filters.is_empty() {
            None
        } else {
            Some(serde_json::Value::Array(filters).to_string())
        }
    }
}

fn parse_date(name: &str, value: &str) -> GraphResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        GraphError::invalid_query(format!("{name} must be in YYYY-MM-DD format, got '{value}'"))
    })
}

fn join_non_empty(items: &[String]) -> String {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn param<'a>(request: &'a GraphRequest, key: &str) -> Option<&'a str> {
        request.params.get(key).map(String::as_str)
    }

    #[test]
    fn test_ad_accounts_request() {
        let request = GraphRequest::ad_accounts(DEFAULT_PAGE_LIMIT);
        assert_eq!(request.endpoint, "/me/adaccounts");
        assert_eq!(param(&request, "fields"), Some(AD_ACCOUNT_FIELDS));
        assert_eq!(param(&request, "limit"), Some("100"));
    }

    #[test]
    fn test_list_query_with_status() {
        let request = ListQuery::new("123", EntityKind::Campaigns)
            .with_status(Some(StatusFilter::Active))
            .build(50)
            .unwrap();

        assert_eq!(request.endpoint, "/act_123/campaigns");
        assert_eq!(param(&request, "effective_status"), Some(r#"["ACTIVE"]"#));
        assert_eq!(param(&request, "limit"), Some("50"));
        assert_eq!(param(&request, "fields"), Some(CAMPAIGN_FIELDS));
    }

    #[test]
    fn test_list_query_edges() {
        let adsets = ListQuery::new("act_9", EntityKind::AdSets).build(100).unwrap();
        assert_eq!(adsets.endpoint, "/act_9/adsets");
        assert!(!adsets.params.contains_key("effective_status"));

        let ads = ListQuery::new("9", EntityKind::Ads).build(100).unwrap();
        assert_eq!(ads.endpoint, "/act_9/ads");
        assert_eq!(param(&ads, "fields"), Some(AD_FIELDS));
    }

    #[test]
    fn test_status_filter_deserialization() {
        let status: StatusFilter = serde_json::from_str(r#""PAUSED""#).unwrap();
        assert_eq!(status, StatusFilter::Paused);
        assert!(serde_json::from_str::<StatusFilter>(r#""paused""#).is_err());
    }

    #[test]
    fn test_insights_query_params() {
        let mut query = InsightsQuery::new(
            "123",
            "2025-01-01",
            "2025-01-31",
            strings(&["campaign_name", "spend", " impressions "]),
        );
        query.level = InsightsLevel::Campaign;
        query.breakdowns = strings(&["age", "gender"]);
        query.time_increment = Some("1".to_string());

        let request = query.build(100).unwrap();

        assert_eq!(request.endpoint, "/act_123/insights");
        assert_eq!(param(&request, "fields"), Some("campaign_name,spend,impressions"));
        assert_eq!(param(&request, "level"), Some("campaign"));
        assert_eq!(
            param(&request, "time_range"),
            Some(r#"{"since":"2025-01-01","until":"2025-01-31"}"#)
        );
        assert_eq!(param(&request, "breakdowns"), Some("age,gender"));
        assert_eq!(param(&request, "time_increment"), Some("1"));
        assert!(!request.params.contains_key("filtering"));
    }

    #[test]
    fn test_insights_filtering() {
        let mut query =
            InsightsQuery::new("act_1", "2025-01-01", "2025-01-02", strings(&["spend"]));
        query.campaign_ids = strings(&["11", "22"]);
        query.ad_ids = strings(&["33"]);

        let request = query.build(100).unwrap();
        let filtering: serde_json::Value =
            serde_json::from_str(param(&request, "filtering").unwrap()).unwrap();

        assert_eq!(
            filtering,
            json!([
                { "field": "campaign.id", "operator": "IN", "value": ["11", "22"] },
                { "field": "ad.id", "operator": "IN", "value": ["33"] }
            ])
        );
    }

    #[test]
    fn test_insights_validation() {
        let fields = strings(&["spend"]);

        let bad_date = InsightsQuery::new("1", "2025/01/01", "2025-01-31", fields.clone());
        assert!(matches!(bad_date.build(100), Err(GraphError::InvalidQuery(_))));

        let reversed = InsightsQuery::new("1", "2025-02-01", "2025-01-31", fields);
        assert!(matches!(reversed.build(100), Err(GraphError::InvalidQuery(_))));

        let no_fields = InsightsQuery::new("1", "2025-01-01", "2025-01-31", strings(&[" "]));
        assert!(matches!(no_fields.build(100), Err(GraphError::InvalidQuery(_))));
    }

    #[test]
    fn test_insights_level_default() {
        assert_eq!(InsightsLevel::default(), InsightsLevel::Account);
        let level: InsightsLevel = serde_json::from_str(r#""adset""#).unwrap();
        assert_eq!(level, InsightsLevel::Adset);
    }
}
