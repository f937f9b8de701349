use super::models::{
    Accepted, AvailabilityDomain, Cluster, Compartment, CreateClusterDetails,
    CreateNodePoolDetails, Image, Instance, LaunchInstanceDetails, NodePool, ServiceErrorBody,
    Shape, Subnet, UpdateClusterDetails, Vcn, Volume, WorkRequest,
};
use super::{
    BlockstorageApi, ByteStream, ComputeApi, ContainerEngineApi, IdentityApi, VirtualNetworkApi,
};
use crate::constants::api::{
    CONTAINER_ENGINE_VERSION, CORE_VERSION, IDENTITY_VERSION, REALM_DOMAIN,
};
use crate::constants::network::{TIMEOUT_CONNECTION_MS, TIMEOUT_PROVIDER_REQUEST_MS, USER_AGENT};
use crate::errors::{StartupError, ToolError};
use crate::services::auth::AuthHandle;
use crate::services::logger::Logger;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const COMPUTE: &str = "Compute";
const VIRTUAL_NETWORK: &str = "VirtualNetwork";
const BLOCKSTORAGE: &str = "Blockstorage";
const IDENTITY: &str = "Identity";
const CONTAINER_ENGINE: &str = "ContainerEngine";

const HEADER_REQUEST_ID: &str = "opc-request-id";
const HEADER_WORK_REQUEST_ID: &str = "opc-work-request-id";
const HEADER_NEXT_PAGE: &str = "opc-next-page";

/// Page tokens already followed. A token seen twice ends the listing.
#[derive(Debug, Default)]
struct PageCursor {
    seen: HashSet<String>,
}

impl PageCursor {
    fn advance(&mut self, next: Option<String>) -> Option<String> {
        next.filter(|token| self.seen.insert(token.clone()))
    }
}

/// List endpoints answer with a bare array; newer ones wrap it in `items`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Wrapped { items: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListBody<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            ListBody::Wrapped { items } => items,
            ListBody::Bare(items) => items,
        }
    }
}

struct Call {
    service: &'static str,
    operation: &'static str,
    method: Method,
    url: Url,
    body: Option<Vec<u8>>,
}

impl Call {
    fn get(service: &'static str, operation: &'static str, url: Url) -> Self {
        Self {
            service,
            operation,
            method: Method::GET,
            url,
            body: None,
        }
    }

    fn delete(service: &'static str, operation: &'static str, url: Url) -> Self {
        Self {
            method: Method::DELETE,
            ..Self::get(service, operation, url)
        }
    }

    fn with_json<B: Serialize>(
        service: &'static str,
        operation: &'static str,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<Self, ToolError> {
        let body = serde_json::to_vec(body).map_err(|err| {
            ToolError::internal(format!("Failed to encode {} request: {}", operation, err))
        })?;
        Ok(Self {
            service,
            operation,
            method,
            url,
            body: Some(body),
        })
    }
}

pub(crate) fn map_reqwest_error(
    service: &'static str,
    operation: &'static str,
    err: reqwest::Error,
) -> ToolError {
    if err.is_timeout() {
        return ToolError::provider(format!("{} {} timed out", service, operation));
    }
    ToolError::provider(format!("{} {} request failed: {}", service, operation, err))
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

pub fn service_base(service: &str, region: &str, version: &str) -> Result<Url, String> {
    Url::parse(&format!(
        "https://{}.{}.{}/{}",
        service, region, REALM_DOMAIN, version
    ))
    .map_err(|err| format!("invalid {} endpoint for region {}: {}", service, region, err))
}

/// Appends path segments (percent-encoded) and query pairs to a service base.
pub fn endpoint(base: &Url, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, ToolError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ToolError::internal(format!("endpoint {} cannot carry a path", base)))?
        .extend(segments);
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

/// Signed REST client for the OCI services this server talks to.
pub struct OciHttpClient {
    logger: Logger,
    http: Client,
    auth: Arc<AuthHandle>,
    core: Url,
    identity: Url,
    container_engine: Url,
}

impl OciHttpClient {
    pub fn new(logger: Logger, auth: Arc<AuthHandle>) -> Result<Self, StartupError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_millis(TIMEOUT_CONNECTION_MS))
            .timeout(Duration::from_millis(TIMEOUT_PROVIDER_REQUEST_MS))
            .build()
            .map_err(|err| StartupError::Internal(format!("Failed to build HTTP client: {}", err)))?;
        let region = auth.region().to_string();
        let base = |service: &str, version: &str| {
            service_base(service, &region, version).map_err(StartupError::configuration)
        };
        Ok(Self {
            logger: logger.child("oci"),
            http,
            core: base("iaas", CORE_VERSION)?,
            identity: base("identity", IDENTITY_VERSION)?,
            container_engine: base("containerengine", CONTAINER_ENGINE_VERSION)?,
            auth,
        })
    }

    async fn send(&self, call: Call) -> Result<Response, ToolError> {
        let mut headers = self
            .auth
            .signer()
            .sign(&call.method, &call.url, call.body.as_deref())
            .map_err(|err| {
                ToolError::provider(format!("Failed to sign {} request: {}", call.operation, err))
            })?;
        if let Ok(value) = uuid::Uuid::new_v4()
            .simple()
            .to_string()
            .parse::<HeaderValue>()
        {
            headers.insert(HEADER_REQUEST_ID, value);
        }

        self.logger.debug(
            "OCI request",
            Some(&serde_json::json!({
                "service": call.service,
                "operation": call.operation,
                "method": call.method.as_str(),
                "path": call.url.path(),
            })),
        );

        let mut request = self
            .http
            .request(call.method.clone(), call.url.clone())
            .headers(headers);
        if let Some(body) = call.body {
            request = request.body(body);
        }
        let response = request
            .send()
            .await
            .map_err(|err| map_reqwest_error(call.service, call.operation, err))?;
        if response.status().is_success() {
            return Ok(response);
        }
        Err(Self::service_error(call.service, call.operation, response).await)
    }

    async fn service_error(
        service: &'static str,
        operation: &'static str,
        response: Response,
    ) -> ToolError {
        let status = response.status();
        let request_id = header_string(response.headers(), HEADER_REQUEST_ID);
        let text = response.text().await.unwrap_or_default();
        let body: ServiceErrorBody = serde_json::from_str(&text).unwrap_or_default();
        let code = body
            .code
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Error").to_string());
        let message = body.message.unwrap_or_else(|| {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                "no error details returned".to_string()
            } else {
                trimmed.to_string()
            }
        });
        ToolError::provider(format!(
            "{} {} failed ({}): {}: {}",
            service,
            operation,
            status.as_u16(),
            code,
            message
        ))
        .with_details(serde_json::json!({
            "status": status.as_u16(),
            "code": code,
            "opcRequestId": request_id,
        }))
    }

    async fn read_json<T: DeserializeOwned>(
        service: &'static str,
        operation: &'static str,
        response: Response,
    ) -> Result<T, ToolError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|err| map_reqwest_error(service, operation, err))?;
        serde_json::from_slice(&bytes).map_err(|err| {
            ToolError::provider(format!(
                "{} {} returned an unreadable body: {}",
                service, operation, err
            ))
        })
    }

    async fn json<T: DeserializeOwned>(&self, call: Call) -> Result<T, ToolError> {
        let (service, operation) = (call.service, call.operation);
        let response = self.send(call).await?;
        Self::read_json(service, operation, response).await
    }

    /// Follows `opc-next-page` until the listing is exhausted.
    async fn list<T: DeserializeOwned>(
        &self,
        service: &'static str,
        operation: &'static str,
        url: Url,
    ) -> Result<Vec<T>, ToolError> {
        let mut items = Vec::new();
        let mut cursor = PageCursor::default();
        let mut page: Option<String> = None;
        loop {
            let mut page_url = url.clone();
            if let Some(token) = &page {
                page_url.query_pairs_mut().append_pair("page", token);
            }
            let response = self.send(Call::get(service, operation, page_url)).await?;
            let next = header_string(response.headers(), HEADER_NEXT_PAGE);
            let body: ListBody<T> = Self::read_json(service, operation, response).await?;
            items.extend(body.into_items());
            match cursor.advance(next) {
                Some(token) => page = Some(token),
                None => return Ok(items),
            }
        }
    }

    async fn accepted<T: DeserializeOwned>(&self, call: Call) -> Result<Accepted<T>, ToolError> {
        let (service, operation) = (call.service, call.operation);
        let response = self.send(call).await?;
        let work_request_id = header_string(response.headers(), HEADER_WORK_REQUEST_ID);
        let bytes = response
            .bytes()
            .await
            .map_err(|err| map_reqwest_error(service, operation, err))?;
        let resource = if bytes.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            Some(serde_json::from_slice(&bytes).map_err(|err| {
                ToolError::provider(format!(
                    "{} {} returned an unreadable body: {}",
                    service, operation, err
                ))
            })?)
        };
        Ok(Accepted {
            resource,
            work_request_id,
        })
    }

    async fn accepted_empty(&self, call: Call) -> Result<Accepted<()>, ToolError> {
        let response = self.send(call).await?;
        Ok(Accepted {
            resource: None,
            work_request_id: header_string(response.headers(), HEADER_WORK_REQUEST_ID),
        })
    }
}

#[async_trait]
impl ComputeApi for OciHttpClient {
    async fn list_instances(&self, compartment_id: &str) -> Result<Vec<Instance>, ToolError> {
        let url = endpoint(&self.core, &["instances"], &[("compartmentId", compartment_id)])?;
        self.list(COMPUTE, "ListInstances", url).await
    }

    async fn get_instance(&self, instance_id: &str) -> Result<Instance, ToolError> {
        let url = endpoint(&self.core, &["instances", instance_id], &[])?;
        self.json(Call::get(COMPUTE, "GetInstance", url)).await
    }

    async fn launch_instance(
        &self,
        details: &LaunchInstanceDetails,
    ) -> Result<Instance, ToolError> {
        let url = endpoint(&self.core, &["instances"], &[])?;
        self.json(Call::with_json(COMPUTE, "LaunchInstance", Method::POST, url, details)?)
            .await
    }

    async fn terminate_instance(&self, instance_id: &str) -> Result<Accepted<()>, ToolError> {
        let url = endpoint(&self.core, &["instances", instance_id], &[])?;
        self.accepted_empty(Call::delete(COMPUTE, "TerminateInstance", url))
            .await
    }

    async fn list_shapes(&self, compartment_id: &str) -> Result<Vec<Shape>, ToolError> {
        let url = endpoint(&self.core, &["shapes"], &[("compartmentId", compartment_id)])?;
        self.list(COMPUTE, "ListShapes", url).await
    }

    async fn list_images(&self, compartment_id: &str) -> Result<Vec<Image>, ToolError> {
        let url = endpoint(&self.core, &["images"], &[("compartmentId", compartment_id)])?;
        self.list(COMPUTE, "ListImages", url).await
    }
}

#[async_trait]
impl VirtualNetworkApi for OciHttpClient {
    async fn list_vcns(&self, compartment_id: &str) -> Result<Vec<Vcn>, ToolError> {
        let url = endpoint(&self.core, &["vcns"], &[("compartmentId", compartment_id)])?;
        self.list(VIRTUAL_NETWORK, "ListVcns", url).await
    }

    async fn list_subnets(
        &self,
        compartment_id: &str,
        vcn_id: Option<&str>,
    ) -> Result<Vec<Subnet>, ToolError> {
        let mut query = vec![("compartmentId", compartment_id)];
        if let Some(vcn_id) = vcn_id {
            query.push(("vcnId", vcn_id));
        }
        let url = endpoint(&self.core, &["subnets"], &query)?;
        self.list(VIRTUAL_NETWORK, "ListSubnets", url).await
    }
}

#[async_trait]
impl BlockstorageApi for OciHttpClient {
    async fn list_volumes(&self, compartment_id: &str) -> Result<Vec<Volume>, ToolError> {
        let url = endpoint(&self.core, &["volumes"], &[("compartmentId", compartment_id)])?;
        self.list(BLOCKSTORAGE, "ListVolumes", url).await
    }
}

#[async_trait]
impl IdentityApi for OciHttpClient {
    async fn list_compartments(&self, tenancy_id: &str) -> Result<Vec<Compartment>, ToolError> {
        let url = endpoint(
            &self.identity,
            &["compartments"],
            &[("compartmentId", tenancy_id)],
        )?;
        self.list(IDENTITY, "ListCompartments", url).await
    }

    async fn list_availability_domains(
        &self,
        compartment_id: &str,
    ) -> Result<Vec<AvailabilityDomain>, ToolError> {
        let url = endpoint(
            &self.identity,
            &["availabilityDomains"],
            &[("compartmentId", compartment_id)],
        )?;
        self.list(IDENTITY, "ListAvailabilityDomains", url).await
    }
}

#[async_trait]
impl ContainerEngineApi for OciHttpClient {
    async fn list_clusters(&self, compartment_id: &str) -> Result<Vec<Cluster>, ToolError> {
        let url = endpoint(
            &self.container_engine,
            &["clusters"],
            &[("compartmentId", compartment_id)],
        )?;
        self.list(CONTAINER_ENGINE, "ListClusters", url).await
    }

    async fn get_cluster(&self, cluster_id: &str) -> Result<Cluster, ToolError> {
        let url = endpoint(&self.container_engine, &["clusters", cluster_id], &[])?;
        self.json(Call::get(CONTAINER_ENGINE, "GetCluster", url)).await
    }

    async fn create_cluster(
        &self,
        details: &CreateClusterDetails,
    ) -> Result<Accepted<Cluster>, ToolError> {
        let url = endpoint(&self.container_engine, &["clusters"], &[])?;
        self.accepted(Call::with_json(
            CONTAINER_ENGINE,
            "CreateCluster",
            Method::POST,
            url,
            details,
        )?)
        .await
    }

    async fn update_cluster(
        &self,
        cluster_id: &str,
        details: &UpdateClusterDetails,
    ) -> Result<Accepted<Cluster>, ToolError> {
        let url = endpoint(&self.container_engine, &["clusters", cluster_id], &[])?;
        self.accepted(Call::with_json(
            CONTAINER_ENGINE,
            "UpdateCluster",
            Method::PUT,
            url,
            details,
        )?)
        .await
    }

    async fn delete_cluster(&self, cluster_id: &str) -> Result<Accepted<()>, ToolError> {
        let url = endpoint(&self.container_engine, &["clusters", cluster_id], &[])?;
        self.accepted_empty(Call::delete(CONTAINER_ENGINE, "DeleteCluster", url))
            .await
    }

    async fn list_node_pools(
        &self,
        compartment_id: &str,
        cluster_id: Option<&str>,
    ) -> Result<Vec<NodePool>, ToolError> {
        let mut query = vec![("compartmentId", compartment_id)];
        if let Some(cluster_id) = cluster_id {
            query.push(("clusterId", cluster_id));
        }
        let url = endpoint(&self.container_engine, &["nodePools"], &query)?;
        self.list(CONTAINER_ENGINE, "ListNodePools", url).await
    }

    async fn get_node_pool(&self, node_pool_id: &str) -> Result<NodePool, ToolError> {
        let url = endpoint(&self.container_engine, &["nodePools", node_pool_id], &[])?;
        self.json(Call::get(CONTAINER_ENGINE, "GetNodePool", url)).await
    }

    async fn create_node_pool(
        &self,
        details: &CreateNodePoolDetails,
    ) -> Result<Accepted<NodePool>, ToolError> {
        let url = endpoint(&self.container_engine, &["nodePools"], &[])?;
        self.accepted(Call::with_json(
            CONTAINER_ENGINE,
            "CreateNodePool",
            Method::POST,
            url,
            details,
        )?)
        .await
    }

    async fn delete_node_pool(&self, node_pool_id: &str) -> Result<Accepted<()>, ToolError> {
        let url = endpoint(&self.container_engine, &["nodePools", node_pool_id], &[])?;
        self.accepted_empty(Call::delete(CONTAINER_ENGINE, "DeleteNodePool", url))
            .await
    }

    async fn create_kubeconfig(&self, cluster_id: &str) -> Result<ByteStream, ToolError> {
        let url = endpoint(
            &self.container_engine,
            &["clusters", cluster_id, "kubeconfig", "content"],
            &[],
        )?;
        let call = Call::with_json(
            CONTAINER_ENGINE,
            "CreateKubeconfig",
            Method::POST,
            url,
            &serde_json::json!({ "tokenVersion": "2.0.0" }),
        )?;
        let response = self.send(call).await?;
        Ok(response
            .bytes_stream()
            .map(|chunk| {
                chunk.map_err(|err| map_reqwest_error(CONTAINER_ENGINE, "CreateKubeconfig", err))
            })
            .boxed())
    }

    async fn get_work_request(&self, work_request_id: &str) -> Result<WorkRequest, ToolError> {
        let url = endpoint(
            &self.container_engine,
            &["workRequests", work_request_id],
            &[],
        )?;
        self.json(Call::get(CONTAINER_ENGINE, "GetWorkRequest", url))
            .await
    }
}
