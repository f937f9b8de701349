use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;

/// Per-call failure classes. Each maps to a stable wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    UnknownTool,
    PermissionDenied,
    InvalidParams,
    Provider,
    Internal,
}

impl ToolErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ToolErrorKind::UnknownTool => "UNKNOWN_TOOL",
            ToolErrorKind::PermissionDenied => "PERMISSION_DENIED",
            ToolErrorKind::InvalidParams => "INVALID_PARAMS",
            ToolErrorKind::Provider => "PROVIDER_ERROR",
            ToolErrorKind::Internal => "INTERNAL",
        }
    }

    /// Policy denials are in-band answers, everything else is a failed call.
    pub fn is_transport_error(self) -> bool {
        !matches!(self, ToolErrorKind::PermissionDenied)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: kind.code().to_string(),
            message: message.into(),
            hint: None,
            details: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn unknown_tool(name: &str) -> Self {
        Self::new(ToolErrorKind::UnknownTool, format!("Unknown tool: {}", name))
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::PermissionDenied, message)
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidParams, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Provider, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Internal, message)
    }

    /// A provider response that lacks an identifier the contract guarantees.
    pub fn missing_identifier(resource: &str, field: &str) -> Self {
        Self::provider(format!(
            "{} response is missing required identifier '{}'",
            resource, field
        ))
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ToolError {}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        ToolError::internal(err.to_string())
    }
}
