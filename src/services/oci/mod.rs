//! OCI service clients.
//!
//! Adapters depend on the traits below; `OciHttpClient` implements all of
//! them against the public REST endpoints. Tests substitute in-memory stubs.

pub mod client;
pub mod models;
pub mod signer;

pub use client::OciHttpClient;

use crate::errors::ToolError;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use models::{
    Accepted, AvailabilityDomain, Cluster, Compartment, CreateClusterDetails,
    CreateNodePoolDetails, Image, Instance, LaunchInstanceDetails, NodePool, Shape, Subnet,
    UpdateClusterDetails, Vcn, Volume, WorkRequest,
};

/// Body of a streamed download, consumed chunk by chunk.
pub type ByteStream = BoxStream<'static, Result<Bytes, ToolError>>;

#[async_trait]
pub trait ComputeApi: Send + Sync {
    async fn list_instances(&self, compartment_id: &str) -> Result<Vec<Instance>, ToolError>;
    async fn get_instance(&self, instance_id: &str) -> Result<Instance, ToolError>;
    async fn launch_instance(&self, details: &LaunchInstanceDetails)
        -> Result<Instance, ToolError>;
    async fn terminate_instance(&self, instance_id: &str) -> Result<Accepted<()>, ToolError>;
    async fn list_shapes(&self, compartment_id: &str) -> Result<Vec<Shape>, ToolError>;
    async fn list_images(&self, compartment_id: &str) -> Result<Vec<Image>, ToolError>;
}

#[async_trait]
pub trait VirtualNetworkApi: Send + Sync {
    async fn list_vcns(&self, compartment_id: &str) -> Result<Vec<Vcn>, ToolError>;
    async fn list_subnets(
        &self,
        compartment_id: &str,
        vcn_id: Option<&str>,
    ) -> Result<Vec<Subnet>, ToolError>;
}

#[async_trait]
pub trait BlockstorageApi: Send + Sync {
    async fn list_volumes(&self, compartment_id: &str) -> Result<Vec<Volume>, ToolError>;
}

#[async_trait]
pub trait IdentityApi: Send + Sync {
    async fn list_compartments(&self, tenancy_id: &str) -> Result<Vec<Compartment>, ToolError>;
    async fn list_availability_domains(
        &self,
        compartment_id: &str,
    ) -> Result<Vec<AvailabilityDomain>, ToolError>;
}

#[async_trait]
pub trait ContainerEngineApi: Send + Sync {
    async fn list_clusters(&self, compartment_id: &str) -> Result<Vec<Cluster>, ToolError>;
    async fn get_cluster(&self, cluster_id: &str) -> Result<Cluster, ToolError>;
    async fn create_cluster(
        &self,
        details: &CreateClusterDetails,
    ) -> Result<Accepted<Cluster>, ToolError>;
    async fn update_cluster(
        &self,
        cluster_id: &str,
        details: &UpdateClusterDetails,
    ) -> Result<Accepted<Cluster>, ToolError>;
    async fn delete_cluster(&self, cluster_id: &str) -> Result<Accepted<()>, ToolError>;
    async fn list_node_pools(
        &self,
        compartment_id: &str,
        cluster_id: Option<&str>,
    ) -> Result<Vec<NodePool>, ToolError>;
    async fn get_node_pool(&self, node_pool_id: &str) -> Result<NodePool, ToolError>;
    async fn create_node_pool(
        &self,
        details: &CreateNodePoolDetails,
    ) -> Result<Accepted<NodePool>, ToolError>;
    async fn delete_node_pool(&self, node_pool_id: &str) -> Result<Accepted<()>, ToolError>;
    async fn create_kubeconfig(&self, cluster_id: &str) -> Result<ByteStream, ToolError>;
    async fn get_work_request(&self, work_request_id: &str) -> Result<WorkRequest, ToolError>;
}
