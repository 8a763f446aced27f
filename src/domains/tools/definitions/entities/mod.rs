//! Entity listing tools: ad accounts, campaigns, ad sets and ads.
//!
//! Every listing follows the Graph cursor to the end, so a single call
//! returns the complete set.

pub mod ad_accounts;
pub mod ad_sets;
pub mod ads;
pub mod campaigns;

pub use ad_accounts::{ListAdAccountsParams, ListAdAccountsTool};
pub use ad_sets::ListAdSetsTool;
pub use ads::ListAdsTool;
pub use campaigns::ListCampaignsTool;

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use super::common::{graph_failure, rows_result};
use crate::domains::graph::{EntityKind, GraphClient, StatusFilter};

/// Parameters shared by the per-account listing tools.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EntityListParams {
    /// Ad account id, with or without the `act_` prefix.
    #[schemars(description = "Ad account ID, with or without the 'act_' prefix (e.g. 'act_123456789')")]
    pub account_id: String,

    /// Restrict to one effective status.
    #[schemars(description = "Optional status filter: ACTIVE, PAUSED or ARCHIVED. Omit for all")]
    #[serde(default)]
    pub status_filter: Option<StatusFilter>,
}

/// Fetch every entity of `kind` under the requested account.
fn list_entities(
    tool: &str,
    kind: EntityKind,
    params: &EntityListParams,
    client: &GraphClient,
) -> CallToolResult {
    info!(
        tool,
        account_id = %params.account_id,
        status = ?params.status_filter,
        "Listing {}",
        kind.edge()
    );

    match client.entities(&params.account_id, kind, params.status_filter) {
        Ok(rows) => {
            let summary = format!(
                "Found {} {} in account {}",
                rows.len(),
                kind.label(),
                params.account_id.trim()
            );
            rows_result(summary, rows)
        }
        Err(e) => graph_failure(tool, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_params_status_optional() {
        let params: EntityListParams =
            serde_json::from_value(json!({ "account_id": "123" })).unwrap();
        assert_eq!(params.account_id, "123");
        assert!(params.status_filter.is_none());
    }

    #[test]
    fn test_params_status_uppercase() {
        let params: EntityListParams = serde_json::from_value(json!({
            "account_id": "act_1",
            "status_filter": "ARCHIVED"
        }))
        .unwrap();
        assert_eq!(params.status_filter, Some(StatusFilter::Archived));

        let bad = serde_json::from_value::<EntityListParams>(json!({
            "account_id": "act_1",
            "status_filter": "DELETED"
        }));
        assert!(bad.is_err());
    }
}
