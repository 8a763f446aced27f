//! Helpers shared by every Graph-backed tool.
//!
//! Each tool supplies a params type and a blocking `execute` function; the
//! helpers here turn that pair into an rmcp route and an HTTP handler, and
//! shape the rows a tool returns into a `CallToolResult`.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute},
    model::{CallToolResult, Content, Tool},
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::error;

use crate::domains::graph::{GraphClient, GraphError, Record};
#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

/// Blocking body of a tool.
pub type Execute<P> = fn(&P, &GraphClient) -> CallToolResult;

/// Serde default for boolean flags that are on unless disabled.
pub fn default_true() -> bool {
    true
}

/// Successful result: a summary line, the rows as JSON text, and structured
/// content `{"count", "rows"}`.
pub fn rows_result(summary: String, rows: Vec<Record>) -> CallToolResult {
    let rows: Vec<Value> = rows.into_iter().map(Value::Object).collect();
    let count = rows.len();
    let rows = Value::Array(rows);

    CallToolResult {
        content: vec![Content::text(summary), Content::text(format!("{:#}", rows))],
        structured_content: Some(json!({ "count": count, "rows": rows })),
        is_error: Some(false),
        meta: None,
    }
}

/// Error result carrying a descriptive message.
pub fn error_result(message: &str) -> CallToolResult {
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Log a failed Graph call and report it to the client.
pub fn graph_failure(tool: &str, err: GraphError) -> CallToolResult {
    error!(tool, error = %err, "Tool call failed");
    error_result(&err.to_string())
}

/// Build an rmcp route that decodes `P` and runs `execute` off the async
/// runtime, since the Graph client blocks on network I/O.
pub fn blocking_route<S, P>(tool: Tool, client: Arc<GraphClient>, execute: Execute<P>) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
    P: DeserializeOwned + Send + 'static,
{
    ToolRoute::new_dyn(tool, move |ctx: ToolCallContext<'_, S>| {
        let args = ctx.arguments.clone().unwrap_or_default();
        let client = client.clone();
        async move {
            let params: P = serde_json::from_value(Value::Object(args))
                .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

            tokio::task::spawn_blocking(move || execute(&params, &client))
                .await
                .map_err(|e| McpError::internal_error(format!("Tool task failed: {}", e), None))
        }
        .boxed()
    })
}

/// Run a tool for the HTTP transport and encode its result as JSON.
///
/// The call runs on the blocking pool, like the rmcp route, so a multi-page
/// fetch never holds a runtime worker.
#[cfg(feature = "http")]
pub async fn http_call<P>(
    name: &str,
    arguments: Value,
    client: Arc<GraphClient>,
    execute: Execute<P>,
) -> Result<Value, ToolError>
where
    P: DeserializeOwned + Send + 'static,
{
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments
    };
    let params: P = serde_json::from_value(arguments)
        .map_err(|e| ToolError::invalid_arguments(format!("{}: {}", name, e)))?;

    let result = tokio::task::spawn_blocking(move || execute(&params, &client))
        .await
        .map_err(|e| ToolError::execution_failed(format!("{} failed: {}", name, e)))?;

    Ok(to_http_response(result))
}

/// JSON shape of a `CallToolResult` as returned over HTTP.
#[cfg(feature = "http")]
pub fn to_http_response(result: CallToolResult) -> Value {
    let mut response = serde_json::Map::new();
    response.insert("content".to_string(), json!(result.content));
    response.insert(
        "isError".to_string(),
        Value::Bool(result.is_error.unwrap_or(false)),
    );
    if let Some(structured) = result.structured_content {
        response.insert("structuredContent".to_string(), structured);
    }
    Value::Object(response)
}

/// Test helpers for reading tool results.
#[cfg(test)]
pub(crate) mod testing {
    use rmcp::model::{CallToolResult, RawContent};
    use serde_json::Value;

    /// Text of the content block at `index`.
    pub fn text(result: &CallToolResult, index: usize) -> &str {
        match &result.content[index].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    pub fn structured(result: &CallToolResult) -> &Value {
        result
            .structured_content
            .as_ref()
            .expect("structured content")
    }

    pub fn is_error(result: &CallToolResult) -> bool {
        result.is_error.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn test_rows_result_shape() {
        let mut row = Record::new();
        row.insert("id".to_string(), json!("c1"));

        let result = rows_result("Found 1 campaign(s)".to_string(), vec![row]);

        assert!(!is_error(&result));
        assert_eq!(text(&result, 0), "Found 1 campaign(s)");
        assert!(text(&result, 1).contains("\"c1\""));
        assert_eq!(
            structured(&result),
            &json!({ "count": 1, "rows": [{ "id": "c1" }] })
        );
    }

    #[test]
    fn test_graph_failure_keeps_message() {
        let err = GraphError::transport("Request timed out");
        let result = graph_failure("list_ads", err);

        assert!(is_error(&result));
        assert_eq!(
            text(&result, 0),
            "Facebook API request failed: Request timed out"
        );
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_response_includes_structured_content() {
        let response = to_http_response(rows_result("none".to_string(), Vec::new()));
        assert_eq!(response["isError"], false);
        assert_eq!(response["structuredContent"]["count"], 0);
        assert_eq!(response["content"][0]["text"], "none");
    }
}
