#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use oci_mcp::app::{App, ProviderClients};
use oci_mcp::errors::ToolError;
use oci_mcp::managers::CompartmentScope;
use oci_mcp::services::config::{Environment, SafetyMode};
use oci_mcp::services::logger::Logger;
use oci_mcp::services::oci::models::{
    Accepted, AvailabilityDomain, Cluster, Compartment, CreateClusterDetails,
    CreateNodePoolDetails, Image, Instance, LaunchInstanceDetails, NodePool, Shape, Subnet,
    UpdateClusterDetails, Vcn, Volume, WorkRequest,
};
use oci_mcp::services::oci::{
    BlockstorageApi, ByteStream, ComputeApi, ContainerEngineApi, IdentityApi, VirtualNetworkApi,
};
use oci_mcp::services::tool_executor::ToolCall;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const DEFAULT_COMPARTMENT: &str = "ocid1.compartment.oc1..default";
pub const TENANCY: &str = "ocid1.tenancy.oc1..root";

/// In-memory stand-in for every OCI service. Each provider call bumps
/// `calls` and is recorded as `"<operation> <argument>"`.
#[derive(Default)]
pub struct StubCloud {
    pub calls: AtomicUsize,
    pub log: Mutex<Vec<String>>,
    pub failure: Option<ToolError>,
    pub instances: Vec<Instance>,
    pub shapes: Vec<Shape>,
    pub images: Vec<Image>,
    pub vcns: Vec<Vcn>,
    pub subnets: Vec<Subnet>,
    pub volumes: Vec<Volume>,
    pub compartments: Vec<Compartment>,
    pub availability_domains: Vec<AvailabilityDomain>,
    pub clusters: Vec<Cluster>,
    pub node_pools: Vec<NodePool>,
    pub cluster_accepted: Option<Accepted<Cluster>>,
    pub node_pool_accepted: Option<Accepted<NodePool>>,
    pub deletion_work_request: Option<String>,
    pub kubeconfig_chunks: Vec<&'static str>,
    pub work_request: Option<WorkRequest>,
    pub launched: Mutex<Option<LaunchInstanceDetails>>,
    pub created_node_pool: Mutex<Option<CreateNodePoolDetails>>,
    pub updated_cluster: Mutex<Option<UpdateClusterDetails>>,
}

impl StubCloud {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn recorded(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn record(&self, operation: &str, argument: &str) -> Result<(), ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log
            .lock()
            .unwrap()
            .push(format!("{} {}", operation, argument));
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn first<T: Clone>(items: &[T], what: &str) -> Result<T, ToolError> {
        items
            .first()
            .cloned()
            .ok_or_else(|| ToolError::provider(format!("stub has no {}", what)))
    }

    fn deletion(&self) -> Accepted<()> {
        Accepted {
            resource: None,
            work_request_id: self.deletion_work_request.clone(),
        }
    }
}

#[async_trait]
impl ComputeApi for StubCloud {
    async fn list_instances(&self, compartment_id: &str) -> Result<Vec<Instance>, ToolError> {
        self.record("list_instances", compartment_id)?;
        Ok(self.instances.clone())
    }

    async fn get_instance(&self, instance_id: &str) -> Result<Instance, ToolError> {
        self.record("get_instance", instance_id)?;
        Self::first(&self.instances, "instance")
    }

    async fn launch_instance(
        &self,
        details: &LaunchInstanceDetails,
    ) -> Result<Instance, ToolError> {
        self.record("launch_instance", &details.display_name)?;
        *self.launched.lock().unwrap() = Some(details.clone());
        Self::first(&self.instances, "instance")
    }

    async fn terminate_instance(&self, instance_id: &str) -> Result<Accepted<()>, ToolError> {
        self.record("terminate_instance", instance_id)?;
        Ok(self.deletion())
    }

    async fn list_shapes(&self, compartment_id: &str) -> Result<Vec<Shape>, ToolError> {
        self.record("list_shapes", compartment_id)?;
        Ok(self.shapes.clone())
    }

    async fn list_images(&self, compartment_id: &str) -> Result<Vec<Image>, ToolError> {
        self.record("list_images", compartment_id)?;
        Ok(self.images.clone())
    }
}

#[async_trait]
impl VirtualNetworkApi for StubCloud {
    async fn list_vcns(&self, compartment_id: &str) -> Result<Vec<Vcn>, ToolError> {
        self.record("list_vcns", compartment_id)?;
        Ok(self.vcns.clone())
    }

    async fn list_subnets(
        &self,
        compartment_id: &str,
        vcn_id: Option<&str>,
    ) -> Result<Vec<Subnet>, ToolError> {
        self.record(
            "list_subnets",
            &format!("{} {}", compartment_id, vcn_id.unwrap_or("-")),
        )?;
        Ok(self.subnets.clone())
    }
}

#[async_trait]
impl BlockstorageApi for StubCloud {
    async fn list_volumes(&self, compartment_id: &str) -> Result<Vec<Volume>, ToolError> {
        self.record("list_volumes", compartment_id)?;
        Ok(self.volumes.clone())
    }
}

#[async_trait]
impl IdentityApi for StubCloud {
    async fn list_compartments(&self, tenancy_id: &str) -> Result<Vec<Compartment>, ToolError> {
        self.record("list_compartments", tenancy_id)?;
        Ok(self.compartments.clone())
    }

    async fn list_availability_domains(
        &self,
        compartment_id: &str,
    ) -> Result<Vec<AvailabilityDomain>, ToolError> {
        self.record("list_availability_domains", compartment_id)?;
        Ok(self.availability_domains.clone())
    }
}

#[async_trait]
impl ContainerEngineApi for StubCloud {
    async fn list_clusters(&self, compartment_id: &str) -> Result<Vec<Cluster>, ToolError> {
        self.record("list_clusters", compartment_id)?;
        Ok(self.clusters.clone())
    }

    async fn get_cluster(&self, cluster_id: &str) -> Result<Cluster, ToolError> {
        self.record("get_cluster", cluster_id)?;
        Self::first(&self.clusters, "cluster")
    }

    async fn create_cluster(
        &self,
        details: &CreateClusterDetails,
    ) -> Result<Accepted<Cluster>, ToolError> {
        self.record("create_cluster", &details.name)?;
        self.cluster_accepted
            .clone()
            .ok_or_else(|| ToolError::provider("stub has no cluster response"))
    }

    async fn update_cluster(
        &self,
        cluster_id: &str,
        details: &UpdateClusterDetails,
    ) -> Result<Accepted<Cluster>, ToolError> {
        self.record("update_cluster", cluster_id)?;
        *self.updated_cluster.lock().unwrap() = Some(details.clone());
        self.cluster_accepted
            .clone()
            .ok_or_else(|| ToolError::provider("stub has no cluster response"))
    }

    async fn delete_cluster(&self, cluster_id: &str) -> Result<Accepted<()>, ToolError> {
        self.record("delete_cluster", cluster_id)?;
        Ok(self.deletion())
    }

    async fn list_node_pools(
        &self,
        compartment_id: &str,
        cluster_id: Option<&str>,
    ) -> Result<Vec<NodePool>, ToolError> {
        self.record(
            "list_node_pools",
            &format!("{} {}", compartment_id, cluster_id.unwrap_or("-")),
        )?;
        Ok(self.node_pools.clone())
    }

    async fn get_node_pool(&self, node_pool_id: &str) -> Result<NodePool, ToolError> {
        self.record("get_node_pool", node_pool_id)?;
        Self::first(&self.node_pools, "node pool")
    }

    async fn create_node_pool(
        &self,
        details: &CreateNodePoolDetails,
    ) -> Result<Accepted<NodePool>, ToolError> {
        self.record("create_node_pool", &details.name)?;
        *self.created_node_pool.lock().unwrap() = Some(details.clone());
        self.node_pool_accepted
            .clone()
            .ok_or_else(|| ToolError::provider("stub has no node pool response"))
    }

    async fn delete_node_pool(&self, node_pool_id: &str) -> Result<Accepted<()>, ToolError> {
        self.record("delete_node_pool", node_pool_id)?;
        Ok(self.deletion())
    }

    async fn create_kubeconfig(&self, cluster_id: &str) -> Result<ByteStream, ToolError> {
        self.record("create_kubeconfig", cluster_id)?;
        let chunks: Vec<Result<Bytes, ToolError>> = self
            .kubeconfig_chunks
            .iter()
            .map(|chunk| Ok(Bytes::from_static(chunk.as_bytes())))
            .collect();
        Ok(Box::pin(stream::iter(chunks)))
    }

    async fn get_work_request(&self, work_request_id: &str) -> Result<WorkRequest, ToolError> {
        self.record("get_work_request", work_request_id)?;
        self.work_request
            .clone()
            .ok_or_else(|| ToolError::provider("stub has no work request"))
    }
}

pub fn app(safety: SafetyMode, cloud: Arc<StubCloud>) -> App {
    let clients = ProviderClients {
        compute: cloud.clone(),
        network: cloud.clone(),
        blockstorage: cloud.clone(),
        identity: cloud.clone(),
        container_engine: cloud,
    };
    App::assemble(
        Logger::new("test"),
        safety,
        CompartmentScope::new(Some(DEFAULT_COMPARTMENT), Some(TENANCY)),
        clients,
    )
    .expect("app assembles")
}

/// Runs a tool call and returns (`tools/call` result, decoded text body).
pub async fn call(app: &App, tool: &str, arguments: Value) -> (Value, Value) {
    let call = ToolCall::new(tool, Some(arguments));
    let result = app.tool_executor.handle(call).await.into_call_result();
    let text = result["content"][0]["text"]
        .as_str()
        .expect("text content")
        .to_string();
    let body = serde_json::from_str(&text).expect("json text");
    (result, body)
}

pub fn full_instance() -> Instance {
    Instance {
        id: Some("ocid1.instance.oc1..web".to_string()),
        display_name: Some("web-1".to_string()),
        lifecycle_state: Some("RUNNING".to_string()),
        availability_domain: Some("Uocm:US-ASHBURN-AD-1".to_string()),
        shape: Some("VM.Standard.E4.Flex".to_string()),
        compartment_id: Some(DEFAULT_COMPARTMENT.to_string()),
        time_created: Some("2024-03-01T10:00:00.000Z".to_string()),
    }
}

/// Scratch `$HOME` with an `.oci` directory, removed on drop.
pub struct ScratchHome {
    pub root: PathBuf,
}

impl ScratchHome {
    pub fn new() -> Self {
        let root = std::env::temp_dir().join(format!("oci-mcp-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(root.join(".oci")).expect("scratch dir");
        Self { root }
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root.join(relative);
        std::fs::write(&path, content).expect("write scratch file");
        path
    }

    pub fn env(&self, extra: &[(&str, &str)]) -> Environment {
        let home = self.root.to_string_lossy().to_string();
        let mut pairs = vec![("HOME".to_string(), home)];
        pairs.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        Environment::from_pairs(pairs)
    }
}

impl Drop for ScratchHome {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}
