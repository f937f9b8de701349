use crate::errors::ToolError;
use crate::managers::records::{project_all, ComputeInstance, Image, InstanceShape};
use crate::managers::{initiated, to_payload, CompartmentScope};
use crate::services::logger::Logger;
use crate::services::oci::models::{
    CreateVnicDetails, InstanceSourceDetails, LaunchInstanceDetails, ShapeConfig,
};
use crate::services::oci::ComputeApi;
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use crate::utils::tool_errors::unroutable_tool_error;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub const COMPUTE_FAMILY: &str = "compute";
pub const COMPUTE_TOOLS: &[&str] = &[
    "list_instances",
    "get_instance",
    "launch_instance",
    "terminate_instance",
    "list_shapes",
    "list_images",
];

#[derive(Clone)]
pub struct ComputeManager {
    logger: Logger,
    validation: Validation,
    scope: CompartmentScope,
    compute: Arc<dyn ComputeApi>,
}

impl ComputeManager {
    pub fn new(logger: Logger, scope: CompartmentScope, compute: Arc<dyn ComputeApi>) -> Self {
        Self {
            logger: logger.child(COMPUTE_FAMILY),
            validation: Validation::new(),
            scope,
            compute,
        }
    }

    pub async fn handle_action(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        match tool {
            "list_instances" => self.list_instances(&args).await,
            "get_instance" => self.get_instance(&args).await,
            "launch_instance" => self.launch_instance(&args).await,
            "terminate_instance" => self.terminate_instance(&args).await,
            "list_shapes" => self.list_shapes(&args).await,
            "list_images" => self.list_images(&args).await,
            _ => Err(unroutable_tool_error(COMPUTE_FAMILY, tool, COMPUTE_TOOLS)),
        }
    }

    async fn list_instances(&self, args: &Value) -> Result<Value, ToolError> {
        let compartment = self.scope.resolve(args)?;
        let instances = self.compute.list_instances(&compartment).await?;
        to_payload(&project_all::<_, ComputeInstance>(instances)?)
    }

    async fn get_instance(&self, args: &Value) -> Result<Value, ToolError> {
        let instance_id = self
            .validation
            .ensure_string(args.get("instanceId"), "instanceId")?;
        let instance = self.compute.get_instance(&instance_id).await?;
        to_payload(&ComputeInstance::try_from(instance)?)
    }

    async fn launch_instance(&self, args: &Value) -> Result<Value, ToolError> {
        let compartment_id = self.scope.resolve(args)?;
        let ocpus = self
            .validation
            .ensure_optional_number(args.get("ocpus"), "ocpus")?;
        let memory_in_gbs = self
            .validation
            .ensure_optional_number(args.get("memoryInGBs"), "memoryInGBs")?;
        let details = LaunchInstanceDetails {
            availability_domain: self
                .validation
                .ensure_string(args.get("availabilityDomain"), "availabilityDomain")?,
            compartment_id,
            shape: self.validation.ensure_string(args.get("shape"), "shape")?,
            display_name: self
                .validation
                .ensure_string(args.get("displayName"), "displayName")?,
            source_details: InstanceSourceDetails {
                source_type: "image".to_string(),
                image_id: self.validation.ensure_string(args.get("imageId"), "imageId")?,
            },
            create_vnic_details: CreateVnicDetails {
                subnet_id: self
                    .validation
                    .ensure_string(args.get("subnetId"), "subnetId")?,
            },
            shape_config: (ocpus.is_some() || memory_in_gbs.is_some()).then_some(ShapeConfig {
                ocpus,
                memory_in_gbs,
            }),
        };
        let instance = self.compute.launch_instance(&details).await?;
        let record = ComputeInstance::try_from(instance)?;
        self.logger.info(
            "Instance launch accepted",
            Some(&serde_json::json!({ "instanceId": record.id, "shape": record.shape })),
        );
        to_payload(&record)
    }

    async fn terminate_instance(&self, args: &Value) -> Result<Value, ToolError> {
        let instance_id = self
            .validation
            .ensure_string(args.get("instanceId"), "instanceId")?;
        let accepted = self.compute.terminate_instance(&instance_id).await?;
        self.logger.info(
            "Instance termination accepted",
            Some(&serde_json::json!({ "instanceId": instance_id })),
        );
        Ok(initiated("Instance", &instance_id, "termination", accepted))
    }

    async fn list_shapes(&self, args: &Value) -> Result<Value, ToolError> {
        let compartment = self.scope.resolve(args)?;
        let shapes = self.compute.list_shapes(&compartment).await?;
        to_payload(&project_all::<_, InstanceShape>(shapes)?)
    }

    async fn list_images(&self, args: &Value) -> Result<Value, ToolError> {
        let compartment = self.scope.resolve(args)?;
        let images = self.compute.list_images(&compartment).await?;
        to_payload(&project_all::<_, Image>(images)?)
    }
}

#[async_trait]
impl ToolHandler for ComputeManager {
    fn family(&self) -> &'static str {
        COMPUTE_FAMILY
    }

    fn tools(&self) -> &'static [&'static str] {
        COMPUTE_TOOLS
    }

    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        self.logger.debug("handle_action", Some(&Value::String(tool.to_string())));
        self.handle_action(tool, args).await
    }
}
