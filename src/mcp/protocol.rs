use crate::errors::{ErrorCode, McpError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl JsonRpcRequest {
    /// Parses one transport line. Malformed JSON and well-formed JSON that is
    /// not a 2.0 request are reported separately.
    pub fn parse(line: &str) -> Result<Self, McpError> {
        let value: Value = serde_json::from_str(line).map_err(|_| McpError::parse_error())?;
        let request: JsonRpcRequest =
            serde_json::from_value(value).map_err(|_| McpError::invalid_request())?;
        if request.jsonrpc != JSONRPC_VERSION {
            return Err(McpError::invalid_request());
        }
        Ok(request)
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code: code.as_i32(),
                message: message.into(),
            }),
        }
    }

    pub fn from_error(id: Value, err: McpError) -> Self {
        Self::failure(id, err.code, err.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_rpc_request_allows_missing_id_for_notifications() {
        let raw = r#"{"jsonrpc":"2.0","method":"notifications/initialized","params":{}}"#;
        let parsed = JsonRpcRequest::parse(raw).expect("must parse");
        assert!(parsed.is_notification());
        assert_eq!(parsed.method, "notifications/initialized");
    }

    #[test]
    fn json_rpc_request_parses_id_when_present() {
        let raw = r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;
        let parsed = JsonRpcRequest::parse(raw).expect("must parse");
        assert_eq!(parsed.id, Some(Value::from(1)));
        assert!(parsed.params.is_null());
    }

    #[test]
    fn malformed_lines_map_to_distinct_codes() {
        let err = JsonRpcRequest::parse("{not json").unwrap_err();
        assert_eq!(err.code, ErrorCode::ParseError);

        let err = JsonRpcRequest::parse(r#"{"jsonrpc":"2.0","id":1}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);

        let err = JsonRpcRequest::parse(r#"{"jsonrpc":"1.0","id":1,"method":"x"}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[test]
    fn failure_omits_result() {
        let response = JsonRpcResponse::from_error(Value::Null, McpError::parse_error());
        let raw = serde_json::to_value(&response).unwrap();
        assert_eq!(raw["error"]["code"], -32700);
        assert!(raw.get("result").is_none());
        assert!(raw["id"].is_null());
    }
}
