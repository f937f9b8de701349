//! Records returned to clients, projected from provider wire models.
//!
//! Projection never lets a hole reach the client: optional fields take the
//! values in [`defaults`], while a missing identifier fails the call.

use crate::errors::ToolError;
use crate::services::oci::models;
use serde::Serialize;

pub mod defaults {
    use crate::errors::ToolError;

    /// Display strings and timestamps.
    pub fn text(value: Option<String>) -> String {
        value.unwrap_or_default()
    }

    /// Counts and capacities.
    pub fn count(value: Option<i64>) -> i64 {
        value.unwrap_or(0)
    }

    pub fn amount(value: Option<f64>) -> f64 {
        value.unwrap_or(0.0)
    }

    pub fn flag(value: Option<bool>) -> bool {
        value.unwrap_or(false)
    }

    pub fn list<T>(value: Option<Vec<T>>) -> Vec<T> {
        value.unwrap_or_default()
    }

    pub fn identifier(
        resource: &str,
        field: &str,
        value: Option<String>,
    ) -> Result<String, ToolError> {
        value
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ToolError::missing_identifier(resource, field))
    }
}

/// Projects every item, failing on the first contract violation.
pub fn project_all<M, R>(items: Vec<M>) -> Result<Vec<R>, ToolError>
where
    R: TryFrom<M, Error = ToolError>,
{
    items.into_iter().map(R::try_from).collect()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComputeInstance {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: String,
    pub availability_domain: String,
    pub shape: String,
    pub compartment_id: String,
    pub time_created: String,
}

impl TryFrom<models::Instance> for ComputeInstance {
    type Error = ToolError;

    fn try_from(raw: models::Instance) -> Result<Self, Self::Error> {
        Ok(Self {
            id: defaults::identifier("Instance", "id", raw.id)?,
            display_name: defaults::text(raw.display_name),
            lifecycle_state: defaults::text(raw.lifecycle_state),
            availability_domain: defaults::text(raw.availability_domain),
            shape: defaults::text(raw.shape),
            compartment_id: defaults::text(raw.compartment_id),
            time_created: defaults::text(raw.time_created),
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstanceShape {
    pub shape: String,
    pub processor_description: String,
    pub ocpus: f64,
    #[serde(rename = "memoryInGBs")]
    pub memory_in_gbs: f64,
    pub gpus: i64,
    pub max_vnic_attachments: i64,
    pub networking_bandwidth_in_gbps: f64,
}

impl TryFrom<models::Shape> for InstanceShape {
    type Error = ToolError;

    fn try_from(raw: models::Shape) -> Result<Self, Self::Error> {
        Ok(Self {
            shape: defaults::identifier("Shape", "shape", raw.shape)?,
            processor_description: defaults::text(raw.processor_description),
            ocpus: defaults::amount(raw.ocpus),
            memory_in_gbs: defaults::amount(raw.memory_in_g_bs),
            gpus: defaults::count(raw.gpus),
            max_vnic_attachments: defaults::count(raw.max_vnic_attachments),
            networking_bandwidth_in_gbps: defaults::amount(raw.networking_bandwidth_in_gbps),
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: String,
    pub display_name: String,
    pub operating_system: String,
    pub operating_system_version: String,
    pub lifecycle_state: String,
    pub compartment_id: String,
    pub time_created: String,
}

impl TryFrom<models::Image> for Image {
    type Error = ToolError;

    fn try_from(raw: models::Image) -> Result<Self, Self::Error> {
        Ok(Self {
            id: defaults::identifier("Image", "id", raw.id)?,
            display_name: defaults::text(raw.display_name),
            operating_system: defaults::text(raw.operating_system),
            operating_system_version: defaults::text(raw.operating_system_version),
            lifecycle_state: defaults::text(raw.lifecycle_state),
            compartment_id: defaults::text(raw.compartment_id),
            time_created: defaults::text(raw.time_created),
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vcn {
    pub id: String,
    pub display_name: String,
    pub cidr_block: String,
    pub lifecycle_state: String,
    pub compartment_id: String,
    pub time_created: String,
}

impl TryFrom<models::Vcn> for Vcn {
    type Error = ToolError;

    fn try_from(raw: models::Vcn) -> Result<Self, Self::Error> {
        Ok(Self {
            id: defaults::identifier("Vcn", "id", raw.id)?,
            display_name: defaults::text(raw.display_name),
            cidr_block: defaults::text(raw.cidr_block),
            lifecycle_state: defaults::text(raw.lifecycle_state),
            compartment_id: defaults::text(raw.compartment_id),
            time_created: defaults::text(raw.time_created),
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subnet {
    pub id: String,
    pub display_name: String,
    pub cidr_block: String,
    /// Empty for regional subnets.
    pub availability_domain: String,
    pub vcn_id: String,
    pub lifecycle_state: String,
    pub compartment_id: String,
}

impl TryFrom<models::Subnet> for Subnet {
    type Error = ToolError;

    fn try_from(raw: models::Subnet) -> Result<Self, Self::Error> {
        Ok(Self {
            id: defaults::identifier("Subnet", "id", raw.id)?,
            display_name: defaults::text(raw.display_name),
            cidr_block: defaults::text(raw.cidr_block),
            availability_domain: defaults::text(raw.availability_domain),
            vcn_id: defaults::text(raw.vcn_id),
            lifecycle_state: defaults::text(raw.lifecycle_state),
            compartment_id: defaults::text(raw.compartment_id),
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlockVolume {
    pub id: String,
    pub display_name: String,
    #[serde(rename = "sizeInGBs")]
    pub size_in_gbs: i64,
    pub lifecycle_state: String,
    pub availability_domain: String,
    pub compartment_id: String,
    pub time_created: String,
}

impl TryFrom<models::Volume> for BlockVolume {
    type Error = ToolError;

    fn try_from(raw: models::Volume) -> Result<Self, Self::Error> {
        Ok(Self {
            id: defaults::identifier("Volume", "id", raw.id)?,
            display_name: defaults::text(raw.display_name),
            size_in_gbs: defaults::count(raw.size_in_g_bs),
            lifecycle_state: defaults::text(raw.lifecycle_state),
            availability_domain: defaults::text(raw.availability_domain),
            compartment_id: defaults::text(raw.compartment_id),
            time_created: defaults::text(raw.time_created),
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Compartment {
    pub id: String,
    pub name: String,
    pub description: String,
    pub lifecycle_state: String,
    pub time_created: String,
}

impl TryFrom<models::Compartment> for Compartment {
    type Error = ToolError;

    fn try_from(raw: models::Compartment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: defaults::identifier("Compartment", "id", raw.id)?,
            name: defaults::text(raw.name),
            description: defaults::text(raw.description),
            lifecycle_state: defaults::text(raw.lifecycle_state),
            time_created: defaults::text(raw.time_created),
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityDomain {
    pub name: String,
    pub id: String,
    pub compartment_id: String,
}

impl TryFrom<models::AvailabilityDomain> for AvailabilityDomain {
    type Error = ToolError;

    fn try_from(raw: models::AvailabilityDomain) -> Result<Self, Self::Error> {
        Ok(Self {
            name: defaults::identifier("AvailabilityDomain", "name", raw.name)?,
            id: defaults::text(raw.id),
            compartment_id: defaults::text(raw.compartment_id),
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterEndpointConfig {
    pub subnet_id: String,
    pub is_public_ip_enabled: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub id: String,
    pub name: String,
    pub kubernetes_version: String,
    pub lifecycle_state: String,
    pub compartment_id: String,
    pub vcn_id: String,
    pub endpoint_config: ClusterEndpointConfig,
    pub time_created: String,
    pub time_updated: String,
}

impl TryFrom<models::Cluster> for Cluster {
    type Error = ToolError;

    fn try_from(raw: models::Cluster) -> Result<Self, Self::Error> {
        let endpoint = raw.endpoint_config.unwrap_or_default();
        let metadata = raw.metadata.unwrap_or_default();
        Ok(Self {
            id: defaults::identifier("Cluster", "id", raw.id)?,
            name: defaults::text(raw.name),
            kubernetes_version: defaults::text(raw.kubernetes_version),
            lifecycle_state: defaults::text(raw.lifecycle_state),
            compartment_id: defaults::text(raw.compartment_id),
            vcn_id: defaults::text(raw.vcn_id),
            endpoint_config: ClusterEndpointConfig {
                subnet_id: defaults::text(endpoint.subnet_id),
                is_public_ip_enabled: defaults::flag(endpoint.is_public_ip_enabled),
            },
            time_created: defaults::text(metadata.time_created.or(raw.time_created)),
            time_updated: defaults::text(metadata.time_updated.or(raw.time_updated)),
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacementConfig {
    pub availability_domain: String,
    pub subnet_id: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfigDetails {
    pub size: i64,
    pub placement_configs: Vec<PlacementConfig>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodePool {
    pub id: String,
    pub name: String,
    pub kubernetes_version: String,
    pub lifecycle_state: String,
    pub cluster_id: String,
    pub compartment_id: String,
    pub node_shape: String,
    pub node_config_details: NodeConfigDetails,
    pub time_created: String,
}

impl TryFrom<models::NodePool> for NodePool {
    type Error = ToolError;

    fn try_from(raw: models::NodePool) -> Result<Self, Self::Error> {
        let config = raw.node_config_details.unwrap_or_default();
        Ok(Self {
            id: defaults::identifier("NodePool", "id", raw.id)?,
            name: defaults::text(raw.name),
            kubernetes_version: defaults::text(raw.kubernetes_version),
            lifecycle_state: defaults::text(raw.lifecycle_state),
            cluster_id: defaults::text(raw.cluster_id),
            compartment_id: defaults::text(raw.compartment_id),
            node_shape: defaults::text(raw.node_shape),
            node_config_details: NodeConfigDetails {
                size: defaults::count(config.size),
                placement_configs: defaults::list(config.placement_configs)
                    .into_iter()
                    .map(|placement| PlacementConfig {
                        availability_domain: defaults::text(placement.availability_domain),
                        subnet_id: defaults::text(placement.subnet_id),
                    })
                    .collect(),
            },
            time_created: defaults::text(raw.time_created),
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkRequestResource {
    pub entity_type: String,
    pub action_type: String,
    pub identifier: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkRequest {
    pub id: String,
    pub operation_type: String,
    pub status: String,
    pub compartment_id: String,
    pub percent_complete: f64,
    pub resources: Vec<WorkRequestResource>,
    pub time_accepted: String,
    pub time_started: String,
    pub time_finished: String,
}

impl TryFrom<models::WorkRequest> for WorkRequest {
    type Error = ToolError;

    fn try_from(raw: models::WorkRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            id: defaults::identifier("WorkRequest", "id", raw.id)?,
            operation_type: defaults::text(raw.operation_type),
            status: defaults::text(raw.status),
            compartment_id: defaults::text(raw.compartment_id),
            percent_complete: defaults::amount(raw.percent_complete),
            resources: defaults::list(raw.resources)
                .into_iter()
                .map(|resource| WorkRequestResource {
                    entity_type: defaults::text(resource.entity_type),
                    action_type: defaults::text(resource.action_type),
                    identifier: defaults::text(resource.identifier),
                })
                .collect(),
            time_accepted: defaults::text(raw.time_accepted),
            time_started: defaults::text(raw.time_started),
            time_finished: defaults::text(raw.time_finished),
        })
    }
}
