//! `list_ads`: ads under one ad account, with their creative summary.

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
pub struct ListAdsTool;

impl ListAdsTool {
    pub const NAME: &'static str = "list_ads";

    pub const DESCRIPTION: &'static str = "List ALL ads of an ad account (pagination is handled \
        internally). Returns id, name, status, effective_status, creative (id, title, body, \
        image_url), created_time and updated_time.";

    #[instrument(skip_all, fields(tool = Self::NAME))]
    pub fn execute(params: &EntityListParams, client: &GraphClient) -> CallToolResult {
        list_entities(Self::NAME, EntityKind::Ads, params, client)
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
            title: Some("List ads".into()),
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
    use super::super::super::common::testing::{is_error, text};
    use super::*;
    use crate::domains::graph::{GraphError, StatusFilter};
    use crate::domains::graph::testing::{ScriptedSource, page_body};
    use serde_json::json;

    #[test]
    fn test_failure_on_second_page_returns_no_rows() {
        let source = Arc::new(
            ScriptedSource::new()
                .page(page_body(
                    vec![json!({ "id": "ad1" })],
                    Some("https://graph.facebook.com/v24.0/act_5/ads?after=p2"),
                ))
                .fail(GraphError::transport("Request timed out")),
        );
        let client = GraphClient::with_source(source.clone(), 100);
        let params = EntityListParams {
            account_id: "act_5".to_string(),
            status_filter: Some(StatusFilter::Paused),
        };

        let result = ListAdsTool::execute(&params, &client);

        assert!(is_error(&result));
        assert!(result.structured_content.is_none());
        assert_eq!(
            text(&result, 0),
            "Facebook API request failed: Request timed out"
        );
        assert_eq!(source.requests().len(), 2);
    }
}
