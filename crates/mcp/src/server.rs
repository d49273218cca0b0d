//! MCP server
//!
//! Reads newline-delimited JSON-RPC messages, handles them one at a time and
//! writes one response line per request. Notifications get no reply.

use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::dispatch::Dispatcher;
use crate::protocol::*;

pub struct McpServer {
    dispatcher: Dispatcher,
}

impl McpServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Serve over the process's stdin and stdout
    pub async fn run_stdio(&self) -> std::io::Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve until `reader` reaches end of input
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(
            project_root = %self.dispatcher.config().project_root.display(),
            "MCP server listening on stdio"
        );

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let Some(response) = self.handle_message(line).await else {
                continue;
            };

            let mut out = serde_json::to_string(&response)?;
            out.push('\n');
            writer.write_all(out.as_bytes()).await?;
            writer.flush().await?;
        }

        info!("Input closed, MCP server stopping");
        Ok(())
    }

    /// Handle one raw message; `None` when no reply is due
    pub async fn handle_message(&self, line: &str) -> Option<JsonRpcResponse> {
        let message: Value = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Unparsable message");
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };

        let id = message.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Malformed request");
                return Some(JsonRpcResponse::error(
                    id,
                    INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                ));
            }
        };

        debug!(method = %request.method, id = ?request.id, "Received message");

        if request.is_notification() {
            debug!(method = %request.method, "Notification, no reply");
            return None;
        }

        Some(self.handle_request(id, request).await)
    }

    async fn handle_request(&self, id: Value, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => {
                let params: InitializeParams =
                    serde_json::from_value(request.params).unwrap_or_default();
                info!(protocol_version = ?params.protocol_version, "Client initializing");
                reply(id, &InitializeResult::new(params.protocol_version))
            }

            "ping" => JsonRpcResponse::success(id, json!({})),

            "tools/list" => reply(
                id,
                &ToolsListResult {
                    tools: self.dispatcher.list_tools(),
                },
            ),

            "tools/call" => {
                let params: ToolCallParams = match serde_json::from_value(request.params) {
                    Ok(params) => params,
                    Err(e) => {
                        return JsonRpcResponse::error(
                            id,
                            INVALID_PARAMS,
                            format!("Invalid params: {}", e),
                        )
                    }
                };

                let response = self.dispatcher.call(&params.name, params.arguments).await;
                reply(id, &response)
            }

            other => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            ),
        }
    }
}

fn reply<T: Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, format!("Serialization error: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{project, Outcome, RecordingRunner};
    use std::sync::Arc;

    fn server() -> (tempfile::TempDir, McpServer) {
        let (tmp, config) = project();
        let runner = Arc::new(RecordingRunner::with_outcome(Outcome::Success {
            stdout: "2 passed".into(),
            stderr: String::new(),
        }));
        (tmp, McpServer::new(Dispatcher::new(config, runner)))
    }

    #[tokio::test]
    async fn test_ping() {
        let (_tmp, server) = server();
        let resp = server
            .handle_message(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#)
            .await
            .unwrap();
        assert_eq!(resp.id, json!(1));
        assert_eq!(resp.result, Some(json!({})));
    }

    #[tokio::test]
    async fn test_notification_gets_no_reply() {
        let (_tmp, server) = server();
        let resp = server
            .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(resp.is_none());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let (_tmp, server) = server();
        let resp = server
            .handle_message(r#"{"jsonrpc":"2.0","id":"a","method":"resources/list"}"#)
            .await
            .unwrap();
        let error = resp.error.unwrap();
        assert_eq!(error.code, METHOD_NOT_FOUND);
        assert!(error.message.contains("resources/list"));
    }

    #[tokio::test]
    async fn test_tools_call_without_name_is_invalid_params() {
        let (_tmp, server) = server();
        let resp = server
            .handle_message(r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{}}"#)
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_tools_call_runs_tool() {
        let (_tmp, server) = server();
        let resp = server
            .handle_message(
                r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"run_playwright_test","arguments":{"testType":"smoke"}}}"#,
            )
            .await
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], false);
        assert_eq!(result["content"][0]["type"], "text");
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .starts_with("Test execution completed!"));
    }

    #[tokio::test]
    async fn test_null_id_gets_reply() {
        let (_tmp, server) = server();
        let resp = server
            .handle_message(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#)
            .await
            .unwrap();
        assert_eq!(resp.id, Value::Null);
        assert_eq!(resp.result, Some(json!({})));
    }

    #[tokio::test]
    async fn test_malformed_request_keeps_id() {
        let (_tmp, server) = server();
        let resp = server
            .handle_message(r#"{"jsonrpc":"2.0","id":9,"method":5}"#)
            .await
            .unwrap();
        assert_eq!(resp.id, json!(9));
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);

        let resp = server.handle_message("[1, 2").await.unwrap();
        assert_eq!(resp.id, Value::Null);
        assert_eq!(resp.error.unwrap().code, PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_tools_call_rejects_non_object_arguments() {
        let (_tmp, server) = server();
        let resp = server
            .handle_message(
                r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"get_test_results","arguments":"playwright"}}"#,
            )
            .await
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(
            result["content"][0]["text"],
            "Error executing get_test_results: Invalid arguments: arguments must be an object, got a string"
        );
    }

    #[tokio::test]
    async fn test_tools_call_null_arguments() {
        let (_tmp, server) = server();
        let resp = server
            .handle_message(
                r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"get_test_results","arguments":null}}"#,
            )
            .await
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], true);
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .starts_with("Error reading test results: "));
    }
}
