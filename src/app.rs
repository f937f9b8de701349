use crate::errors::StartupError;
use crate::managers::compute::ComputeManager;
use crate::managers::container::ContainerManager;
use crate::managers::identity::IdentityManager;
use crate::managers::network::NetworkManager;
use crate::managers::storage::StorageManager;
use crate::managers::CompartmentScope;
use crate::mcp::catalog::ToolCatalog;
use crate::services::auth::AuthProviderSelector;
use crate::services::config::{Environment, SafetyMode, ServerConfig};
use crate::services::credentials::CredentialResolver;
use crate::services::logger::Logger;
use crate::services::oci::{
    BlockstorageApi, ComputeApi, ContainerEngineApi, IdentityApi, OciHttpClient,
    VirtualNetworkApi,
};
use crate::services::tool_executor::{ToolExecutor, ToolHandler};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// One client per OCI service the adapters talk to.
#[derive(Clone)]
pub struct ProviderClients {
    pub compute: Arc<dyn ComputeApi>,
    pub network: Arc<dyn VirtualNetworkApi>,
    pub blockstorage: Arc<dyn BlockstorageApi>,
    pub identity: Arc<dyn IdentityApi>,
    pub container_engine: Arc<dyn ContainerEngineApi>,
}

impl ProviderClients {
    pub fn from_http(client: Arc<OciHttpClient>) -> Self {
        Self {
            compute: client.clone(),
            network: client.clone(),
            blockstorage: client.clone(),
            identity: client.clone(),
            container_engine: client,
        }
    }
}

pub struct App {
    pub logger: Logger,
    pub config: Option<ServerConfig>,
    pub tool_executor: Arc<ToolExecutor>,
}

impl App {
    /// Every catalog family needs an adapter that serves exactly the
    /// catalog's tools for that family.
    pub fn validate_tool_wiring(
        catalog: &ToolCatalog,
        handlers: &HashMap<String, Arc<dyn ToolHandler>>,
    ) -> Result<(), StartupError> {
        let mut problems = Vec::new();
        for family in catalog.families() {
            let expected: BTreeSet<&str> = catalog.tools_in_family(family).collect();
            match handlers.get(family) {
                None => problems.push(format!("family {} has no adapter", family)),
                Some(handler) => {
                    let served: BTreeSet<&str> = handler.tools().iter().copied().collect();
                    if served != expected {
                        let missing: Vec<&str> = expected.difference(&served).copied().collect();
                        let extra: Vec<&str> = served.difference(&expected).copied().collect();
                        problems.push(format!(
                            "family {} is miswired (missing: [{}], extra: [{}])",
                            family,
                            missing.join(", "),
                            extra.join(", ")
                        ));
                    }
                }
            }
        }
        for family in handlers.keys() {
            if !catalog.families().contains(family.as_str()) {
                problems.push(format!("adapter {} serves no catalog family", family));
            }
        }
        if problems.is_empty() {
            return Ok(());
        }
        problems.sort();
        Err(StartupError::Internal(format!(
            "Tool wiring is incomplete: {}",
            problems.join("; ")
        )))
    }

    pub fn initialize() -> Result<Self, StartupError> {
        Self::from_environment(Environment::capture())
    }

    pub fn from_environment(environment: Environment) -> Result<Self, StartupError> {
        let logger = Logger::from_environment("oci-mcp", &environment);

        let credentials = CredentialResolver::new(logger.clone()).resolve(&environment)?;
        let config = ServerConfig::new(environment, credentials);

        let auth = Arc::new(
            AuthProviderSelector::new(logger.clone())
                .select(&config.environment, &config.credentials)?,
        );
        let scope = CompartmentScope::from_config(&config, auth.tenancy());
        let client = Arc::new(OciHttpClient::new(logger.clone(), auth)?);

        let mut app = Self::assemble(
            logger,
            config.safety,
            scope,
            ProviderClients::from_http(client),
        )?;
        app.config = Some(config);
        Ok(app)
    }

    /// Wires adapters and the catalog around already-built provider clients.
    pub fn assemble(
        logger: Logger,
        safety: SafetyMode,
        scope: CompartmentScope,
        clients: ProviderClients,
    ) -> Result<Self, StartupError> {
        let compute = Arc::new(ComputeManager::new(
            logger.clone(),
            scope.clone(),
            clients.compute,
        ));
        let network = Arc::new(NetworkManager::new(
            logger.clone(),
            scope.clone(),
            clients.network,
        ));
        let storage = Arc::new(StorageManager::new(
            logger.clone(),
            scope.clone(),
            clients.blockstorage,
        ));
        let identity = Arc::new(IdentityManager::new(
            logger.clone(),
            scope.clone(),
            clients.identity,
        ));
        let container = Arc::new(ContainerManager::new(
            logger.clone(),
            scope,
            clients.container_engine,
        ));

        let adapters: Vec<Arc<dyn ToolHandler>> =
            vec![compute, network, storage, identity, container];
        let handlers: HashMap<String, Arc<dyn ToolHandler>> = adapters
            .into_iter()
            .map(|handler| (handler.family().to_string(), handler))
            .collect();

        let catalog = ToolCatalog::builtin()?;
        Self::validate_tool_wiring(&catalog, &handlers)?;

        logger.info(
            "Tool catalog ready",
            Some(&serde_json::json!({
                "mode": safety.label(),
                "visible_tools": catalog.list_capabilities(safety).len(),
            })),
        );

        let tool_executor = Arc::new(ToolExecutor::new(
            logger.clone(),
            safety,
            Arc::new(catalog),
            handlers,
        ));

        Ok(Self {
            logger,
            config: None,
            tool_executor,
        })
    }
}
