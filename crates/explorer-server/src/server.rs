//! Newline-delimited JSON serving loop.
//!
//! One request per line on stdin, one response per line on stdout; logging
//! goes to stderr so the protocol channel stays clean. Each request runs to
//! completion before the next line is read.

use explorer_core::{ToolCall, ToolExecutor};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(Debug, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub tool: Option<String>,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub id: Option<serde_json::Value>,
    pub success: bool,
    pub result: serde_json::Value,
}

impl Response {
    fn error(id: Option<serde_json::Value>, message: String) -> Self {
        Self {
            id,
            success: false,
            result: serde_json::Value::String(message),
        }
    }
}

/// Handle one request line. Malformed input becomes an error response, never
/// a crash: the contract with the caller is "always get a response back".
pub async fn handle_line(executor: &dyn ToolExecutor, line: &str) -> Response {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("Malformed request line: {}", e);
            return Response::error(None, format!("Error: Invalid request: {}", e));
        }
    };

    if request.method.as_deref() == Some("tools/list") {
        let schemas = executor.list_tools();
        return Response {
            id: request.id,
            success: true,
            result: serde_json::to_value(schemas).unwrap_or_default(),
        };
    }

    let Some(tool) = request.tool else {
        return Response::error(
            request.id,
            "Error: Request must name a 'tool' or use method 'tools/list'.".to_string(),
        );
    };

    let call = ToolCall::new(tool, request.arguments);
    match executor.execute(&call).await {
        Ok(result) => Response {
            id: request.id,
            success: result.success,
            result: serde_json::Value::String(result.result),
        },
        Err(e) => {
            log::error!("Tool call '{}' failed: {}", call.function.name, e);
            Response::error(request.id, format!("Error: {}", e))
        }
    }
}

/// Serve requests from stdin until EOF.
pub async fn serve(executor: &dyn ToolExecutor) -> std::io::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut lines = stdin.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(executor, &line).await;
        let encoded = serde_json::to_string(&response)?;
        stdout.write_all(encoded.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use explorer_core::ExplorerConfig;
    use explorer_tools::{BuiltinToolExecutor, ExplorerContext};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn executor(storage: &TempDir) -> BuiltinToolExecutor {
        let ctx = Arc::new(ExplorerContext::new(ExplorerConfig::new(
            storage.path(),
            "/no/such/uploads",
        )));
        BuiltinToolExecutor::new(ctx)
    }

    #[tokio::test]
    async fn tool_request_round_trips() {
        let storage = TempDir::new().unwrap();
        fs::write(storage.path().join("greeting.txt"), "hello").unwrap();
        let executor = executor(&storage);

        let line = r#"{"id": 1, "tool": "read_file", "arguments": {"file_name": "greeting"}}"#;
        let response = handle_line(&executor, line).await;

        assert!(response.success);
        assert_eq!(response.id, Some(serde_json::json!(1)));
        assert_eq!(response.result, serde_json::json!("hello"));
    }

    #[tokio::test]
    async fn tools_list_returns_all_schemas() {
        let storage = TempDir::new().unwrap();
        let executor = executor(&storage);

        let response = handle_line(&executor, r#"{"id": 2, "method": "tools/list"}"#).await;

        assert!(response.success);
        let schemas = response.result.as_array().unwrap();
        assert_eq!(schemas.len(), 5);
    }

    #[tokio::test]
    async fn malformed_json_gets_error_response() {
        let storage = TempDir::new().unwrap();
        let executor = executor(&storage);

        let response = handle_line(&executor, "{not json").await;
        assert!(!response.success);
        assert!(response
            .result
            .as_str()
            .unwrap()
            .starts_with("Error: Invalid request"));
    }

    #[tokio::test]
    async fn unknown_tool_gets_error_response() {
        let storage = TempDir::new().unwrap();
        let executor = executor(&storage);

        let response =
            handle_line(&executor, r#"{"id": 3, "tool": "delete_everything"}"#).await;
        assert!(!response.success);
        assert!(response.result.as_str().unwrap().starts_with("Error:"));
    }

    #[tokio::test]
    async fn failed_tool_call_is_still_a_response() {
        let storage = TempDir::new().unwrap();
        let executor = executor(&storage);

        let line = r#"{"id": 4, "tool": "read_file", "arguments": {"file_name": "missing"}}"#;
        let response = handle_line(&executor, line).await;

        assert!(!response.success);
        assert!(response.result.as_str().unwrap().starts_with("Error:"));
    }
}
