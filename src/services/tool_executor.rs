use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::errors::{ToolError, ToolErrorKind};
use crate::mcp::catalog::ToolCatalog;
use crate::mcp::envelope::{read_only_denial, ResultEnvelope};
use crate::services::config::SafetyMode;
use crate::services::logger::Logger;
use crate::utils::suggest::suggest;

/// One adapter serves every tool of its family.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn family(&self) -> &'static str;
    fn tools(&self) -> &'static [&'static str];
    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ToolError>;
}

/// `arguments` is the raw `params.arguments` value; its shape is checked
/// after lookup and the safety gate.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub name: String,
    pub arguments: Option<Value>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: Option<Value>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Absent or null arguments mean "no arguments"; anything but an object
    /// is rejected.
    fn argument_object(&self) -> Result<Value, ToolError> {
        match &self.arguments {
            None | Some(Value::Null) => Ok(Value::Object(Map::new())),
            Some(Value::Object(map)) => Ok(Value::Object(map.clone())),
            Some(_) => Err(ToolError::invalid_params("arguments must be an object")),
        }
    }
}

#[derive(Clone)]
pub struct ToolExecutor {
    logger: Logger,
    safety: SafetyMode,
    catalog: Arc<ToolCatalog>,
    handlers: Arc<HashMap<String, Arc<dyn ToolHandler>>>,
}

impl ToolExecutor {
    /// `handlers` is keyed by family.
    pub fn new(
        logger: Logger,
        safety: SafetyMode,
        catalog: Arc<ToolCatalog>,
        handlers: HashMap<String, Arc<dyn ToolHandler>>,
    ) -> Self {
        Self {
            logger: logger.child("executor"),
            safety,
            catalog,
            handlers: Arc::new(handlers),
        }
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    pub fn safety(&self) -> SafetyMode {
        self.safety
    }

    pub async fn handle(&self, call: ToolCall) -> ResultEnvelope {
        let started = Instant::now();
        let family = self
            .catalog
            .lookup(&call.name)
            .map(|tool| tool.family.clone());
        let envelope = match self.dispatch(&call).await {
            Ok(payload) => ResultEnvelope::ok(payload),
            Err(err) => {
                if err.kind == ToolErrorKind::Internal {
                    self.logger.error(
                        "tool call failed internally",
                        Some(&serde_json::json!({ "tool": call.name, "error": err.message })),
                    );
                }
                ResultEnvelope::err(&call.name, err)
            }
        };
        let code = match &envelope {
            ResultEnvelope::Ok { .. } => None,
            ResultEnvelope::Err { error, .. } => Some(error.code.clone()),
        };
        self.logger.debug(
            "tool call finished",
            Some(&serde_json::json!({
                "tool": call.name,
                "family": family,
                "ok": envelope.is_ok(),
                "error": code,
                "duration_ms": started.elapsed().as_millis() as u64,
            })),
        );
        envelope
    }

    async fn dispatch(&self, call: &ToolCall) -> Result<Value, ToolError> {
        let Some(descriptor) = self.catalog.lookup(&call.name) else {
            return Err(self.unknown_tool(&call.name));
        };
        if descriptor.destructive && self.safety.is_restricted() {
            self.logger.info(
                "Refused destructive tool in read-only mode",
                Some(&serde_json::json!({ "tool": call.name })),
            );
            return Err(read_only_denial(&call.name));
        }
        let args = call.argument_object()?;
        self.catalog.validate_args(&call.name, &args)?;
        let handler = self.handlers.get(&descriptor.family).ok_or_else(|| {
            ToolError::internal(format!(
                "No adapter is wired for family {}",
                descriptor.family
            ))
        })?;
        handler.handle(&call.name, args).await
    }

    fn unknown_tool(&self, name: &str) -> ToolError {
        let visible = self.catalog.list_capabilities(self.safety);
        let suggestions = suggest(name, visible.iter().map(|tool| tool.name.as_str()), 3);
        let mut err = ToolError::unknown_tool(name);
        if !suggestions.is_empty() {
            err = err
                .with_hint(format!("Did you mean: {}?", suggestions.join(", ")))
                .with_details(serde_json::json!({ "did_you_mean": suggestions }));
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn arguments_must_be_an_object() {
        let empty = ToolCall::new("list_vcns", None).argument_object().unwrap();
        assert_eq!(empty, json!({}));
        assert_eq!(
            ToolCall::new("list_vcns", Some(Value::Null)).argument_object().unwrap(),
            json!({})
        );
        let err = ToolCall::new("list_vcns", Some(json!(["x"])))
            .argument_object()
            .unwrap_err();
        assert_eq!(err.code, "INVALID_PARAMS");
    }
}
