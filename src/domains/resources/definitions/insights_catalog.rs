//! Catalog of insights fields, levels and breakdowns.
//!
//! Gives clients the vocabulary for `get_account_insights` without a round
//! trip to the API documentation.

use serde_json::{Value, json};

use super::ResourceDefinition;
use crate::domains::graph::ActionKeyTable;
use crate::domains::resources::service::ResourceContent;

pub struct InsightsCatalogResource;

const BASIC_FIELDS: &[(&str, &str)] = &[
    ("spend", "Total amount spent"),
    ("impressions", "Number of times ads were shown"),
    ("reach", "Unique people who saw the ads"),
    ("inline_link_clicks", "Link clicks; use for CTR and CPC"),
    ("clicks", "All clicks, including likes, comments and shares"),
    ("frequency", "Average impressions per person"),
];

const CALCULATED_FIELDS: &[(&str, &str)] = &[
    ("ctr", "Click-through rate as computed by the API"),
    ("cpc", "Cost per click as computed by the API"),
    ("cpm", "Cost per 1000 impressions"),
];

const ENTITY_FIELDS: &[(&str, &str)] = &[
    ("campaign_id", "Campaign ID"),
    ("campaign_name", "Campaign name; include at level=campaign"),
    ("adset_id", "Ad set ID"),
    ("adset_name", "Ad set name; include at level=adset"),
    ("ad_id", "Ad ID"),
    ("ad_name", "Ad name; include at level=ad"),
];

const CONVERSION_FIELDS: &[(&str, &str)] = &[
    ("actions", "Pixel and standard events, flattened to action_<type>"),
    ("action_values", "Monetary value of actions, flattened to action_value_<type>"),
    ("conversions", "Conversions API events, flattened to conversion_<type>"),
    ("purchase_roas", "Return on ad spend for purchases"),
];

const BREAKDOWNS: &[&str] = &[
    "age",
    "gender",
    "country",
    "region",
    "publisher_platform",
    "platform_position",
    "device_platform",
];

const TIME_INCREMENTS: &[(&str, &str)] = &[
    ("1", "One row per day"),
    ("7", "One row per week"),
    ("monthly", "One row per month"),
    ("all_days", "Single total row (default)"),
];

fn describe(entries: &[(&str, &str)]) -> Value {
    entries
        .iter()
        .map(|(name, description)| json!({ "name": name, "description": description }))
        .collect()
}

/// The catalog document served by this resource.
pub fn catalog() -> Value {
    let action_prefixes: serde_json::Map<String, Value> = ActionKeyTable::default()
        .iter()
        .map(|(key, prefix)| (key.to_string(), Value::String(prefix.to_string())))
        .collect();

    json!({
        "levels": ["account", "campaign", "adset", "ad"],
        "fields": {
            "basic": describe(BASIC_FIELDS),
            "calculated": describe(CALCULATED_FIELDS),
            "entity": describe(ENTITY_FIELDS),
            "conversion": describe(CONVERSION_FIELDS),
        },
        "breakdowns": BREAKDOWNS,
        "time_increments": describe(TIME_INCREMENTS),
        "action_prefixes": action_prefixes,
        "ui_metrics": {
            "ctr": "inline_link_clicks / impressions * 100",
            "cpc": "spend / inline_link_clicks",
        },
    })
}

impl ResourceDefinition for InsightsCatalogResource {
    const URI: &'static str = "facebook-ads://catalog/insights";
    const NAME: &'static str = "Insights Catalog";
    const DESCRIPTION: &'static str =
        "Insights fields, levels, breakdowns, time increments and flattened action prefixes";
    const MIME_TYPE: &'static str = "application/json";

    fn content() -> ResourceContent {
        ResourceContent::Text(format!("{:#}", catalog()))
    }
}
