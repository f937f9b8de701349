use crate::errors::ToolError;
use crate::managers::records::{project_all, BlockVolume};
use crate::managers::{to_payload, CompartmentScope};
use crate::services::logger::Logger;
use crate::services::oci::BlockstorageApi;
use crate::services::tool_executor::ToolHandler;
use crate::utils::tool_errors::unroutable_tool_error;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub const STORAGE_FAMILY: &str = "storage";
pub const STORAGE_TOOLS: &[&str] = &["list_volumes"];

#[derive(Clone)]
pub struct StorageManager {
    logger: Logger,
    scope: CompartmentScope,
    blockstorage: Arc<dyn BlockstorageApi>,
}

impl StorageManager {
    pub fn new(
        logger: Logger,
        scope: CompartmentScope,
        blockstorage: Arc<dyn BlockstorageApi>,
    ) -> Self {
        Self {
            logger: logger.child(STORAGE_FAMILY),
            scope,
            blockstorage,
        }
    }

    pub async fn handle_action(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        match tool {
            "list_volumes" => {
                let compartment = self.scope.resolve(&args)?;
                let volumes = self.blockstorage.list_volumes(&compartment).await?;
                to_payload(&project_all::<_, BlockVolume>(volumes)?)
            }
            _ => Err(unroutable_tool_error(STORAGE_FAMILY, tool, STORAGE_TOOLS)),
        }
    }
}

#[async_trait]
impl ToolHandler for StorageManager {
    fn family(&self) -> &'static str {
        STORAGE_FAMILY
    }

    fn tools(&self) -> &'static [&'static str] {
        STORAGE_TOOLS
    }

    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        self.logger.debug("handle_action", Some(&Value::String(tool.to_string())));
        self.handle_action(tool, args).await
    }
}
