//! Wire shapes of the OCI REST APIs this server calls.
//!
//! Every response field is optional: the adapters decide which absences are
//! tolerated and which are contract violations.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub lifecycle_state: Option<String>,
    pub availability_domain: Option<String>,
    pub shape: Option<String>,
    pub compartment_id: Option<String>,
    pub time_created: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub shape: Option<String>,
    pub processor_description: Option<String>,
    pub ocpus: Option<f64>,
    pub memory_in_g_bs: Option<f64>,
    pub gpus: Option<i64>,
    pub max_vnic_attachments: Option<i64>,
    pub networking_bandwidth_in_gbps: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub operating_system: Option<String>,
    pub operating_system_version: Option<String>,
    pub lifecycle_state: Option<String>,
    pub compartment_id: Option<String>,
    pub time_created: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vcn {
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub cidr_block: Option<String>,
    pub lifecycle_state: Option<String>,
    pub compartment_id: Option<String>,
    pub time_created: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subnet {
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub cidr_block: Option<String>,
    pub availability_domain: Option<String>,
    pub vcn_id: Option<String>,
    pub lifecycle_state: Option<String>,
    pub compartment_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub size_in_g_bs: Option<i64>,
    pub lifecycle_state: Option<String>,
    pub availability_domain: Option<String>,
    pub compartment_id: Option<String>,
    pub time_created: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Compartment {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub lifecycle_state: Option<String>,
    pub time_created: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityDomain {
    pub id: Option<String>,
    pub name: Option<String>,
    pub compartment_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterEndpointConfig {
    pub subnet_id: Option<String>,
    pub is_public_ip_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterMetadata {
    pub time_created: Option<String>,
    pub time_updated: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub id: Option<String>,
    pub name: Option<String>,
    pub kubernetes_version: Option<String>,
    pub lifecycle_state: Option<String>,
    pub compartment_id: Option<String>,
    pub vcn_id: Option<String>,
    pub endpoint_config: Option<ClusterEndpointConfig>,
    /// Current API versions report timestamps under `metadata`.
    pub metadata: Option<ClusterMetadata>,
    pub time_created: Option<String>,
    pub time_updated: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacementConfig {
    pub availability_domain: Option<String>,
    pub subnet_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfigDetails {
    pub size: Option<i64>,
    pub placement_configs: Option<Vec<PlacementConfig>>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodePool {
    pub id: Option<String>,
    pub name: Option<String>,
    pub kubernetes_version: Option<String>,
    pub lifecycle_state: Option<String>,
    pub cluster_id: Option<String>,
    pub compartment_id: Option<String>,
    pub node_shape: Option<String>,
    pub node_config_details: Option<NodeConfigDetails>,
    pub time_created: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkRequestResource {
    pub entity_type: Option<String>,
    pub action_type: Option<String>,
    pub identifier: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkRequest {
    pub id: Option<String>,
    pub operation_type: Option<String>,
    pub status: Option<String>,
    pub compartment_id: Option<String>,
    pub percent_complete: Option<f64>,
    pub resources: Option<Vec<WorkRequestResource>>,
    pub time_accepted: Option<String>,
    pub time_started: Option<String>,
    pub time_finished: Option<String>,
}

/// Provider error body (`{"code": ..., "message": ...}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
}

/// A 200/202 answer: the resource when the service echoes it, the work
/// request tracking it when the operation is asynchronous.
#[derive(Debug, Clone, PartialEq)]
pub struct Accepted<T> {
    pub resource: Option<T>,
    pub work_request_id: Option<String>,
}

impl<T> Accepted<T> {
    pub fn resource(resource: T) -> Self {
        Self {
            resource: Some(resource),
            work_request_id: None,
        }
    }

    pub fn work_request(id: impl Into<String>) -> Self {
        Self {
            resource: None,
            work_request_id: Some(id.into()),
        }
    }
}

// Request bodies.

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSourceDetails {
    pub source_type: String,
    pub image_id: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateVnicDetails {
    pub subnet_id: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShapeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocpus: Option<f64>,
    #[serde(rename = "memoryInGBs", skip_serializing_if = "Option::is_none")]
    pub memory_in_gbs: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LaunchInstanceDetails {
    pub availability_domain: String,
    pub compartment_id: String,
    pub shape: String,
    pub display_name: String,
    pub source_details: InstanceSourceDetails,
    pub create_vnic_details: CreateVnicDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_config: Option<ShapeConfig>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateClusterEndpointConfig {
    pub subnet_id: String,
    pub is_public_ip_enabled: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateClusterDetails {
    pub name: String,
    pub compartment_id: String,
    pub vcn_id: String,
    pub kubernetes_version: String,
    pub endpoint_config: CreateClusterEndpointConfig,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClusterDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubernetes_version: Option<String>,
}

impl UpdateClusterDetails {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.kubernetes_version.is_none()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlacementConfig {
    pub availability_domain: String,
    pub subnet_id: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateNodeConfigDetails {
    pub size: i64,
    pub placement_configs: Vec<CreatePlacementConfig>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeSourceDetails {
    pub source_type: String,
    pub image_id: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateNodePoolDetails {
    pub name: String,
    pub cluster_id: String,
    pub compartment_id: String,
    pub kubernetes_version: String,
    pub node_shape: String,
    pub node_config_details: CreateNodeConfigDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_source_details: Option<NodeSourceDetails>,
}
