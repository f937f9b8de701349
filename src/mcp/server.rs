use crate::app::App;
use crate::constants::server::{NAME, PROTOCOL_VERSION, VERSION};
use crate::errors::{ErrorCode, McpError, StartupError};
use crate::mcp::protocol::{JsonRpcRequest, JsonRpcResponse};
use crate::services::logger::Logger;
use crate::services::tool_executor::{ToolCall, ToolExecutor};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

pub struct McpServer {
    logger: Logger,
    executor: Arc<ToolExecutor>,
}

impl McpServer {
    pub fn new(logger: Logger, executor: Arc<ToolExecutor>) -> Self {
        Self {
            logger: logger.child("server"),
            executor,
        }
    }

    fn handle_initialize(&self) -> Value {
        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {"tools": {"list": true, "call": true}},
            "serverInfo": {"name": NAME, "version": VERSION},
        })
    }

    fn handle_tools_list(&self) -> Value {
        self.executor
            .catalog()
            .render_tools_list(self.executor.safety())
    }

    async fn handle_tools_call(&self, name: &str, arguments: Option<Value>) -> Value {
        self.executor
            .handle(ToolCall::new(name, arguments))
            .await
            .into_call_result()
    }

    /// Answers one transport line. `None` means nothing is written back.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let request = match JsonRpcRequest::parse(line) {
            Ok(request) => request,
            Err(err) => return Some(JsonRpcResponse::from_error(Value::Null, err)),
        };

        match request.method.as_str() {
            method if method.starts_with("notifications/") => request
                .id
                .map(|id| JsonRpcResponse::from_error(id, McpError::method_not_found(method))),
            "initialize" => request
                .id
                .map(|id| JsonRpcResponse::success(id, self.handle_initialize())),
            "tools/list" => request
                .id
                .map(|id| JsonRpcResponse::success(id, self.handle_tools_list())),
            "tools/call" => {
                let id = request.id?;
                let mut params = request.params.as_object().cloned().unwrap_or_default();
                let name = params
                    .get("name")
                    .and_then(|v| v.as_str())
                    .map(str::trim)
                    .unwrap_or("")
                    .to_string();
                if name.is_empty() {
                    return Some(JsonRpcResponse::failure(
                        id,
                        ErrorCode::InvalidParams,
                        "Missing tool name",
                    ));
                }
                let result = self
                    .handle_tools_call(&name, params.remove("arguments"))
                    .await;
                Some(JsonRpcResponse::success(id, result))
            }
            method => request
                .id
                .map(|id| JsonRpcResponse::from_error(id, McpError::method_not_found(method))),
        }
    }

    /// Serves requests in order until the reader hits EOF.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<(), StartupError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut writer = BufWriter::new(writer);

        while let Some(line) = lines.next_line().await? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(response) = self.handle_line(trimmed).await {
                let payload = serde_json::to_string(&response).map_err(|err| {
                    StartupError::Internal(format!("failed to encode response: {}", err))
                })?;
                writer.write_all(payload.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }

        self.logger.info("stdin closed, shutting down", None);
        Ok(())
    }

    pub async fn run_stdio(&self) -> Result<(), StartupError> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();
        tokio::select! {
            result = self.serve(reader, writer) => result,
            _ = shutdown_signal(&self.logger) => Ok(()),
        }
    }
}

async fn shutdown_signal(logger: &Logger) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            logger.warn(
                "failed to install Ctrl+C handler",
                Some(&serde_json::json!({ "error": err.to_string() })),
            );
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                logger.warn(
                    "failed to install SIGTERM handler",
                    Some(&serde_json::json!({ "error": err.to_string() })),
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    logger.info("shutdown signal received", None);
}

pub async fn run_stdio() -> Result<(), StartupError> {
    let app = App::initialize()?;
    let server = McpServer::new(app.logger.clone(), app.tool_executor.clone());
    server.run_stdio().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::catalog::ToolCatalog;
    use crate::services::config::SafetyMode;
    use std::collections::HashMap;

    fn server(safety: SafetyMode) -> McpServer {
        let logger = Logger::new("test");
        let catalog = Arc::new(ToolCatalog::builtin().expect("catalog"));
        let executor = ToolExecutor::new(logger.clone(), safety, catalog, HashMap::new());
        McpServer::new(logger, Arc::new(executor))
    }

    async fn answer(server: &McpServer, line: &str) -> Value {
        let response = server.handle_line(line).await.expect("response");
        serde_json::to_value(response).expect("json")
    }

    #[tokio::test]
    async fn initialize_reports_server_info() {
        let server = server(SafetyMode::Restricted);
        let response = answer(
            &server,
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        )
        .await;
        assert_eq!(response["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(response["result"]["serverInfo"]["name"], NAME);
        assert_eq!(response["result"]["capabilities"]["tools"]["call"], true);
    }

    #[tokio::test]
    async fn tools_list_follows_safety_mode() {
        let restricted = answer(
            &server(SafetyMode::Restricted),
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
        )
        .await;
        let names: Vec<&str> = restricted["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|tool| tool["name"].as_str())
            .collect();
        assert!(names.contains(&"list_instances"));
        assert!(!names.contains(&"terminate_instance"));
        assert!(restricted["result"]["tools"][0].get("inputSchema").is_some());
        assert!(restricted["result"]["tools"][0].get("family").is_none());
    }

    #[tokio::test]
    async fn transport_errors_use_json_rpc_codes() {
        let server = server(SafetyMode::Restricted);

        let parse = answer(&server, "{oops").await;
        assert_eq!(parse["error"]["code"], -32700);
        assert!(parse["id"].is_null());

        let invalid = answer(&server, r#"{"jsonrpc":"2.0","id":3}"#).await;
        assert_eq!(invalid["error"]["code"], -32600);

        let unknown = answer(&server, r#"{"jsonrpc":"2.0","id":4,"method":"resources/list"}"#).await;
        assert_eq!(unknown["error"]["code"], -32601);

        let nameless = answer(
            &server,
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"arguments":{}}}"#,
        )
        .await;
        assert_eq!(nameless["error"]["code"], -32602);
        assert_eq!(nameless["error"]["message"], "Missing tool name");
    }

    #[tokio::test]
    async fn notifications_get_no_response() {
        let server = server(SafetyMode::Restricted);
        assert!(server
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await
            .is_none());
        assert!(server
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/cancelled","params":{}}"#)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn notifications_with_an_id_are_answered_alike() {
        let server = server(SafetyMode::Restricted);
        for method in ["notifications/initialized", "notifications/cancelled"] {
            let line = format!(r#"{{"jsonrpc":"2.0","id":9,"method":"{}"}}"#, method);
            let response = answer(&server, &line).await;
            assert_eq!(response["error"]["code"], -32601, "{method}");
            assert!(response.get("result").is_none(), "{method}");
        }
    }

    fn call_body(response: &Value) -> Value {
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        serde_json::from_str(text).unwrap()
    }

    #[tokio::test]
    async fn unknown_tool_wins_over_malformed_arguments() {
        let server = server(SafetyMode::Unrestricted);
        let response = answer(
            &server,
            r#"{"jsonrpc":"2.0","id":10,"method":"tools/call","params":{"name":"no_such_tool","arguments":[1]}}"#,
        )
        .await;
        assert_eq!(call_body(&response)["error"], "UNKNOWN_TOOL");
    }

    #[tokio::test]
    async fn read_only_denial_wins_over_malformed_arguments() {
        let server = server(SafetyMode::Restricted);
        let response = answer(
            &server,
            r#"{"jsonrpc":"2.0","id":11,"method":"tools/call","params":{"name":"terminate_instance","arguments":"x"}}"#,
        )
        .await;
        assert!(response["result"].get("isError").is_none());
        assert_eq!(call_body(&response)["error"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn tool_failures_stay_in_band() {
        let server = server(SafetyMode::Restricted);
        let response = answer(
            &server,
            r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"name":"list_instancez"}}"#,
        )
        .await;
        assert!(response.get("error").is_none());
        assert_eq!(response["result"]["isError"], true);
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        let body: Value = serde_json::from_str(text).unwrap();
        assert_eq!(body["error"], "UNKNOWN_TOOL");
        assert_eq!(body["tool"], "list_instancez");

        let response = answer(
            &server,
            r#"{"jsonrpc":"2.0","id":7,"method":"tools/call","params":{"name":"list_vcns","arguments":[1]}}"#,
        )
        .await;
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        let body: Value = serde_json::from_str(text).unwrap();
        assert_eq!(body["error"], "INVALID_PARAMS");
    }

    #[tokio::test]
    async fn serve_answers_each_line_until_eof() {
        let server = server(SafetyMode::Restricted);
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n",
        );
        let mut output = Vec::new();
        server
            .serve(BufReader::new(input.as_bytes()), &mut output)
            .await
            .expect("serve");
        let text = String::from_utf8(output).unwrap();
        let ids: Vec<Value> = text
            .lines()
            .map(|line| serde_json::from_str::<Value>(line).unwrap()["id"].clone())
            .collect();
        assert_eq!(ids, vec![Value::from(1), Value::from(2)]);
    }
}
