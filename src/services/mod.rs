pub mod auth;
pub mod config;
pub mod credentials;
pub mod logger;
pub mod oci;
pub mod oci_config_file;
pub mod tool_executor;
pub mod validation;
