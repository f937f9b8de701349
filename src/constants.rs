pub mod env {
    pub const TENANCY: &[&str] = &["OCI_TENANCY", "OCI_CLI_TENANCY"];
    pub const USER: &[&str] = &["OCI_USER", "OCI_CLI_USER"];
    pub const FINGERPRINT: &[&str] = &["OCI_FINGERPRINT", "OCI_CLI_FINGERPRINT"];
    pub const PRIVATE_KEY: &[&str] = &["OCI_PRIVATE_KEY", "OCI_CLI_KEY_CONTENT"];
    pub const REGION: &[&str] = &["OCI_REGION", "OCI_CLI_REGION"];
    pub const COMPARTMENT_ID: &[&str] = &["OCI_COMPARTMENT_ID", "OCI_CLI_COMPARTMENT_ID"];
    /// Region lookup order for the session fallback.
    pub const SESSION_REGION: &[&str] = &["OCI_CLI_REGION", "OCI_REGION"];
    pub const READ_ONLY: &str = "OCI_MCP_READ_ONLY";
    pub const CONFIG_FILE: &str = "OCI_CONFIG_FILE";
    pub const CONFIG_PROFILE: &str = "OCI_CLI_PROFILE";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    pub const HOME: &str = "HOME";
}

pub mod credentials {
    pub const DEFAULT_REGION: &str = "us-ashburn-1";
    pub const DEFAULT_CONFIG_PATH: &str = "~/.oci/config";
    pub const DEFAULT_PROFILE: &str = "DEFAULT";
    pub const SESSION_SENTINEL: &str = "session";
}

pub mod network {
    pub const TIMEOUT_PROVIDER_REQUEST_MS: u64 = 60_000;
    pub const TIMEOUT_CONNECTION_MS: u64 = 10_000;
    pub const USER_AGENT: &str = concat!("oci-mcp/", env!("CARGO_PKG_VERSION"));
}

pub mod api {
    pub const CORE_VERSION: &str = "20160918";
    pub const IDENTITY_VERSION: &str = "20160918";
    pub const CONTAINER_ENGINE_VERSION: &str = "20180222";
    pub const REALM_DOMAIN: &str = "oraclecloud.com";
}

pub mod server {
    pub const PROTOCOL_VERSION: &str = "2025-06-18";
    pub const NAME: &str = "oci-mcp-server";
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
