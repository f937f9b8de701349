use crate::errors::ToolError;
use crate::managers::records::{project_all, Subnet, Vcn};
use crate::managers::{to_payload, CompartmentScope};
use crate::services::logger::Logger;
use crate::services::oci::VirtualNetworkApi;
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use crate::utils::tool_errors::unroutable_tool_error;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub const NETWORK_FAMILY: &str = "network";
pub const NETWORK_TOOLS: &[&str] = &["list_vcns", "list_subnets"];

#[derive(Clone)]
pub struct NetworkManager {
    logger: Logger,
    validation: Validation,
    scope: CompartmentScope,
    network: Arc<dyn VirtualNetworkApi>,
}

impl NetworkManager {
    pub fn new(
        logger: Logger,
        scope: CompartmentScope,
        network: Arc<dyn VirtualNetworkApi>,
    ) -> Self {
        Self {
            logger: logger.child(NETWORK_FAMILY),
            validation: Validation::new(),
            scope,
            network,
        }
    }

    pub async fn handle_action(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        match tool {
            "list_vcns" => {
                let compartment = self.scope.resolve(&args)?;
                let vcns = self.network.list_vcns(&compartment).await?;
                to_payload(&project_all::<_, Vcn>(vcns)?)
            }
            "list_subnets" => {
                let compartment = self.scope.resolve(&args)?;
                let vcn_id = self
                    .validation
                    .ensure_optional_string(args.get("vcnId"), "vcnId")?;
                let subnets = self
                    .network
                    .list_subnets(&compartment, vcn_id.as_deref())
                    .await?;
                to_payload(&project_all::<_, Subnet>(subnets)?)
            }
            _ => Err(unroutable_tool_error(NETWORK_FAMILY, tool, NETWORK_TOOLS)),
        }
    }
}

#[async_trait]
impl ToolHandler for NetworkManager {
    fn family(&self) -> &'static str {
        NETWORK_FAMILY
    }

    fn tools(&self) -> &'static [&'static str] {
        NETWORK_TOOLS
    }

    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        self.logger.debug("handle_action", Some(&Value::String(tool.to_string())));
        self.handle_action(tool, args).await
    }
}
