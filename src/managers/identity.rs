use crate::errors::ToolError;
use crate::managers::records::{project_all, AvailabilityDomain, Compartment};
use crate::managers::{to_payload, CompartmentScope};
use crate::services::logger::Logger;
use crate::services::oci::IdentityApi;
use crate::services::tool_executor::ToolHandler;
use crate::utils::tool_errors::unroutable_tool_error;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub const IDENTITY_FAMILY: &str = "identity";
pub const IDENTITY_TOOLS: &[&str] = &["list_compartments", "list_availability_domains"];

#[derive(Clone)]
pub struct IdentityManager {
    logger: Logger,
    scope: CompartmentScope,
    identity: Arc<dyn IdentityApi>,
}

impl IdentityManager {
    pub fn new(logger: Logger, scope: CompartmentScope, identity: Arc<dyn IdentityApi>) -> Self {
        Self {
            logger: logger.child(IDENTITY_FAMILY),
            scope,
            identity,
        }
    }

    pub async fn handle_action(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        match tool {
            // Compartments always hang off the tenancy root.
            "list_compartments" => {
                let tenancy = self.scope.tenancy()?;
                let compartments = self.identity.list_compartments(&tenancy).await?;
                to_payload(&project_all::<_, Compartment>(compartments)?)
            }
            "list_availability_domains" => {
                let compartment = self.scope.resolve(&args)?;
                let domains = self
                    .identity
                    .list_availability_domains(&compartment)
                    .await?;
                to_payload(&project_all::<_, AvailabilityDomain>(domains)?)
            }
            _ => Err(unroutable_tool_error(IDENTITY_FAMILY, tool, IDENTITY_TOOLS)),
        }
    }
}

#[async_trait]
impl ToolHandler for IdentityManager {
    fn family(&self) -> &'static str {
        IDENTITY_FAMILY
    }

    fn tools(&self) -> &'static [&'static str] {
        IDENTITY_TOOLS
    }

    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        self.logger.debug("handle_action", Some(&Value::String(tool.to_string())));
        self.handle_action(tool, args).await
    }
}
