use crate::constants::env::READ_ONLY;
use crate::errors::{ToolError, ToolErrorKind};
use crate::services::config::SafetyMode;
use serde_json::Value;

/// The outcome of one tool call. Exactly one branch is ever produced.
#[derive(Debug, Clone)]
pub enum ResultEnvelope {
    Ok { payload: Value },
    Err { tool: String, error: ToolError },
}

impl ResultEnvelope {
    pub fn ok(payload: Value) -> Self {
        ResultEnvelope::Ok { payload }
    }

    pub fn err(tool: impl Into<String>, error: ToolError) -> Self {
        ResultEnvelope::Err {
            tool: tool.into(),
            error,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ResultEnvelope::Ok { .. })
    }

    pub fn error_kind(&self) -> Option<ToolErrorKind> {
        match self {
            ResultEnvelope::Ok { .. } => None,
            ResultEnvelope::Err { error, .. } => Some(error.kind),
        }
    }

    /// JSON body carried in the text content block.
    pub fn body(&self) -> Value {
        match self {
            ResultEnvelope::Ok { payload } => payload.clone(),
            ResultEnvelope::Err { tool, error } => {
                let mut body = serde_json::json!({
                    "error": error.code,
                    "message": error.message,
                    "tool": tool,
                });
                if let Some(map) = body.as_object_mut() {
                    if error.kind == ToolErrorKind::PermissionDenied {
                        map.insert(
                            "mode".to_string(),
                            Value::String(SafetyMode::Restricted.label().to_string()),
                        );
                    }
                    if let Some(hint) = &error.hint {
                        map.insert("hint".to_string(), Value::String(hint.clone()));
                    }
                    if let Some(details) = &error.details {
                        map.insert("details".to_string(), details.clone());
                    }
                }
                body
            }
        }
    }

    /// `tools/call` result: one text block; `isError` only for failed calls.
    pub fn into_call_result(self) -> Value {
        let body = self.body();
        let text = serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string());
        let mut result = serde_json::json!({
            "content": [{ "type": "text", "text": text }],
        });
        let is_error = self
            .error_kind()
            .map(ToolErrorKind::is_transport_error)
            .unwrap_or(false);
        if is_error {
            if let Some(map) = result.as_object_mut() {
                map.insert("isError".to_string(), Value::Bool(true));
            }
        }
        result
    }
}

/// The denial returned for destructive tools while restricted.
pub fn read_only_denial(tool: &str) -> ToolError {
    ToolError::permission_denied(format!(
        "Tool '{}' is destructive and the server is running in read-only mode. Set {}=false to enable it.",
        tool, READ_ONLY
    ))
}
