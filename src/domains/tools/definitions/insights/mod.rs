//! Insights reporting tools.
//!
//! Both tools fetch the complete report across all pages. With
//! `flatten_actions` on (the default) nested action lists become flat
//! columns and numeric strings become numbers.

pub mod account;
pub mod campaign;

pub use account::{AccountInsightsParams, AccountInsightsTool};
pub use campaign::{CampaignInsightsParams, CampaignInsightsTool};

use rmcp::model::CallToolResult;
use tracing::info;

use super::common::{graph_failure, rows_result};
use crate::domains::graph::{GraphClient, InsightsQuery};

/// Run an insights query and shape the rows for the client.
fn run_insights(
    tool: &str,
    query: &InsightsQuery,
    flatten_actions: bool,
    client: &GraphClient,
) -> CallToolResult {
    info!(
        tool,
        account_id = %query.account_id,
        level = query.level.as_str(),
        since = %query.start_date,
        until = %query.end_date,
        flatten_actions,
        "Fetching insights"
    );

    match client.insights(query, flatten_actions) {
        Ok(rows) => {
            let summary = format!(
                "Fetched {} insights row(s) at {} level for {} to {}",
                rows.len(),
                query.level.as_str(),
                query.start_date,
                query.end_date
            );
            rows_result(summary, rows)
        }
        Err(e) => graph_failure(tool, e),
    }
}
