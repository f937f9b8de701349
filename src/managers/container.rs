use crate::errors::ToolError;
use crate::managers::records::{project_all, Cluster, NodePool, WorkRequest};
use crate::managers::{initiated, to_payload, CompartmentScope};
use crate::services::logger::Logger;
use crate::services::oci::models::{
    Accepted, CreateClusterDetails, CreateClusterEndpointConfig, CreateNodeConfigDetails,
    CreateNodePoolDetails, CreatePlacementConfig, NodeSourceDetails, UpdateClusterDetails,
};
use crate::services::oci::{ByteStream, ContainerEngineApi};
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use crate::utils::tool_errors::unroutable_tool_error;
use async_trait::async_trait;
use futures::StreamExt;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub const CONTAINER_FAMILY: &str = "container";
pub const CONTAINER_TOOLS: &[&str] = &[
    "list_clusters",
    "get_cluster",
    "create_cluster",
    "update_cluster",
    "delete_cluster",
    "list_node_pools",
    "get_node_pool",
    "create_node_pool",
    "delete_node_pool",
    "get_kubeconfig",
    "get_work_request",
];

const KUBECONFIG_MESSAGE: &str =
    "Kubeconfig retrieved successfully. Save this to ~/.kube/config to use with kubectl.";

/// What a create or update came back with: the resource itself, or the work
/// request that will produce it.
#[derive(Debug, Clone, PartialEq)]
pub enum ProvisioningOutcome<T> {
    Immediate(T),
    Pending { work_request_id: String },
}

impl<T> ProvisioningOutcome<T> {
    pub fn from_accepted<M>(kind: &str, accepted: Accepted<M>) -> Result<Self, ToolError>
    where
        T: TryFrom<M, Error = ToolError>,
    {
        if let Some(resource) = accepted.resource {
            return T::try_from(resource).map(ProvisioningOutcome::Immediate);
        }
        accepted
            .work_request_id
            .map(|work_request_id| ProvisioningOutcome::Pending { work_request_id })
            .ok_or_else(|| {
                ToolError::provider(format!(
                    "{} response carried neither the resource nor a work request id",
                    kind
                ))
            })
    }
}

impl<T: Serialize> ProvisioningOutcome<T> {
    /// `done` names the finished state ("created", "updated").
    pub fn render(&self, kind: &str, done: &str) -> Result<Value, ToolError> {
        match self {
            ProvisioningOutcome::Immediate(resource) => Ok(serde_json::json!({
                "status": done,
                "resource": to_payload(resource)?,
            })),
            ProvisioningOutcome::Pending { work_request_id } => Ok(serde_json::json!({
                "status": "pending",
                "workRequestId": work_request_id,
                "message": format!(
                    "{} request accepted; poll get_work_request with workRequestId {} for progress",
                    kind, work_request_id
                ),
            })),
        }
    }
}

/// Reads a streamed body to the end. Partial content is never returned.
pub async fn drain_to_string(mut stream: ByteStream) -> Result<String, ToolError> {
    let mut buffer = Vec::new();
    while let Some(chunk) = stream.next().await {
        buffer.extend_from_slice(&chunk?);
    }
    String::from_utf8(buffer)
        .map_err(|err| ToolError::provider(format!("Kubeconfig is not valid UTF-8: {}", err)))
}

#[derive(Clone)]
pub struct ContainerManager {
    logger: Logger,
    validation: Validation,
    scope: CompartmentScope,
    container_engine: Arc<dyn ContainerEngineApi>,
}

impl ContainerManager {
    pub fn new(
        logger: Logger,
        scope: CompartmentScope,
        container_engine: Arc<dyn ContainerEngineApi>,
    ) -> Self {
        Self {
            logger: logger.child(CONTAINER_FAMILY),
            validation: Validation::new(),
            scope,
            container_engine,
        }
    }

    pub async fn handle_action(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        match tool {
            "list_clusters" => {
                let compartment = self.scope.resolve(&args)?;
                let clusters = self.container_engine.list_clusters(&compartment).await?;
                to_payload(&project_all::<_, Cluster>(clusters)?)
            }
            "get_cluster" => {
                let cluster_id = self.cluster_id(&args)?;
                let cluster = self.container_engine.get_cluster(&cluster_id).await?;
                to_payload(&Cluster::try_from(cluster)?)
            }
            "create_cluster" => self.create_cluster(&args).await,
            "update_cluster" => self.update_cluster(&args).await,
            "delete_cluster" => {
                let cluster_id = self.cluster_id(&args)?;
                let accepted = self.container_engine.delete_cluster(&cluster_id).await?;
                Ok(initiated("Cluster", &cluster_id, "deletion", accepted))
            }
            "list_node_pools" => {
                let compartment = self.scope.resolve(&args)?;
                let cluster_id = self
                    .validation
                    .ensure_optional_string(args.get("clusterId"), "clusterId")?;
                let pools = self
                    .container_engine
                    .list_node_pools(&compartment, cluster_id.as_deref())
                    .await?;
                to_payload(&project_all::<_, NodePool>(pools)?)
            }
            "get_node_pool" => {
                let node_pool_id = self.node_pool_id(&args)?;
                let pool = self.container_engine.get_node_pool(&node_pool_id).await?;
                to_payload(&NodePool::try_from(pool)?)
            }
            "create_node_pool" => self.create_node_pool(&args).await,
            "delete_node_pool" => {
                let node_pool_id = self.node_pool_id(&args)?;
                let accepted = self
                    .container_engine
                    .delete_node_pool(&node_pool_id)
                    .await?;
                Ok(initiated("Node pool", &node_pool_id, "deletion", accepted))
            }
            "get_kubeconfig" => {
                let cluster_id = self.cluster_id(&args)?;
                let stream = self.container_engine.create_kubeconfig(&cluster_id).await?;
                let kubeconfig = drain_to_string(stream).await?;
                Ok(serde_json::json!({
                    "kubeconfig": kubeconfig,
                    "message": KUBECONFIG_MESSAGE,
                }))
            }
            "get_work_request" => {
                let work_request_id = self
                    .validation
                    .ensure_string(args.get("workRequestId"), "workRequestId")?;
                let work_request = self
                    .container_engine
                    .get_work_request(&work_request_id)
                    .await?;
                to_payload(&WorkRequest::try_from(work_request)?)
            }
            _ => Err(unroutable_tool_error(CONTAINER_FAMILY, tool, CONTAINER_TOOLS)),
        }
    }

    fn cluster_id(&self, args: &Value) -> Result<String, ToolError> {
        self.validation
            .ensure_string(args.get("clusterId"), "clusterId")
    }

    fn node_pool_id(&self, args: &Value) -> Result<String, ToolError> {
        self.validation
            .ensure_string(args.get("nodePoolId"), "nodePoolId")
    }

    async fn create_cluster(&self, args: &Value) -> Result<Value, ToolError> {
        let details = CreateClusterDetails {
            name: self.validation.ensure_string(args.get("name"), "name")?,
            compartment_id: self.scope.resolve(args)?,
            vcn_id: self.validation.ensure_string(args.get("vcnId"), "vcnId")?,
            kubernetes_version: self
                .validation
                .ensure_string(args.get("kubernetesVersion"), "kubernetesVersion")?,
            endpoint_config: CreateClusterEndpointConfig {
                subnet_id: self
                    .validation
                    .ensure_string(args.get("subnetId"), "subnetId")?,
                is_public_ip_enabled: self.validation.ensure_bool(
                    args.get("isPublicIpEnabled"),
                    "isPublicIpEnabled",
                    false,
                )?,
            },
        };
        let accepted = self.container_engine.create_cluster(&details).await?;
        let outcome = ProvisioningOutcome::<Cluster>::from_accepted("CreateCluster", accepted)?;
        self.log_outcome("Cluster creation accepted", &outcome);
        outcome.render("Cluster creation", "created")
    }

    async fn update_cluster(&self, args: &Value) -> Result<Value, ToolError> {
        let cluster_id = self.cluster_id(args)?;
        let details = UpdateClusterDetails {
            name: self
                .validation
                .ensure_optional_string(args.get("name"), "name")?,
            kubernetes_version: self
                .validation
                .ensure_optional_string(args.get("kubernetesVersion"), "kubernetesVersion")?,
        };
        if details.is_empty() {
            return Err(ToolError::invalid_params(
                "update_cluster needs at least one of name or kubernetesVersion",
            ));
        }
        let accepted = self
            .container_engine
            .update_cluster(&cluster_id, &details)
            .await?;
        let outcome = ProvisioningOutcome::<Cluster>::from_accepted("UpdateCluster", accepted)?;
        self.log_outcome("Cluster update accepted", &outcome);
        outcome.render("Cluster update", "updated")
    }

    async fn create_node_pool(&self, args: &Value) -> Result<Value, ToolError> {
        let image_id = self
            .validation
            .ensure_optional_string(args.get("imageId"), "imageId")?;
        let details = CreateNodePoolDetails {
            name: self.validation.ensure_string(args.get("name"), "name")?,
            cluster_id: self.cluster_id(args)?,
            compartment_id: self.scope.resolve(args)?,
            kubernetes_version: self
                .validation
                .ensure_string(args.get("kubernetesVersion"), "kubernetesVersion")?,
            node_shape: self
                .validation
                .ensure_string(args.get("nodeShape"), "nodeShape")?,
            node_config_details: CreateNodeConfigDetails {
                size: self
                    .validation
                    .ensure_positive_integer(args.get("size"), "size")?,
                placement_configs: vec![CreatePlacementConfig {
                    availability_domain: self
                        .validation
                        .ensure_string(args.get("availabilityDomain"), "availabilityDomain")?,
                    subnet_id: self
                        .validation
                        .ensure_string(args.get("subnetId"), "subnetId")?,
                }],
            },
            node_source_details: image_id.map(|image_id| NodeSourceDetails {
                source_type: "IMAGE".to_string(),
                image_id,
            }),
        };
        let accepted = self.container_engine.create_node_pool(&details).await?;
        let outcome = ProvisioningOutcome::<NodePool>::from_accepted("CreateNodePool", accepted)?;
        self.log_outcome("Node pool creation accepted", &outcome);
        outcome.render("Node pool creation", "created")
    }

    fn log_outcome<T>(&self, message: &str, outcome: &ProvisioningOutcome<T>) {
        let meta = match outcome {
            ProvisioningOutcome::Immediate(_) => serde_json::json!({ "status": "immediate" }),
            ProvisioningOutcome::Pending { work_request_id } => {
                serde_json::json!({ "status": "pending", "workRequestId": work_request_id })
            }
        };
        self.logger.info(message, Some(&meta));
    }
}

#[async_trait]
impl ToolHandler for ContainerManager {
    fn family(&self) -> &'static str {
        CONTAINER_FAMILY
    }

    fn tools(&self) -> &'static [&'static str] {
        CONTAINER_TOOLS
    }

    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        self.logger.debug("handle_action", Some(&Value::String(tool.to_string())));
        self.handle_action(tool, args).await
    }
}
