use crate::constants::credentials::{
    DEFAULT_CONFIG_PATH, DEFAULT_REGION, SESSION_SENTINEL,
};
use crate::constants::env as env_names;
use crate::errors::StartupError;
use crate::services::config::Environment;
use crate::services::logger::Logger;
use crate::services::oci_config_file::{ConfigFileError, OciConfigFile};
use crate::utils::user_paths::expand_home_path;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::PathBuf;

static REGION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z]{2,}(?:-[a-z]+)+-[0-9]+$").expect("region pattern")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Environment,
    ConfigFile(PathBuf),
    /// Placeholder values; a session-capable auth provider does the signing.
    Session,
}

#[derive(Clone, PartialEq, Eq)]
pub struct CredentialSet {
    pub tenancy: String,
    pub user: String,
    pub fingerprint: String,
    pub private_key: String,
    pub region: String,
    pub compartment_id: Option<String>,
    pub source: CredentialSource,
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSet")
            .field("tenancy", &self.tenancy)
            .field("user", &self.user)
            .field("fingerprint", &self.fingerprint)
            .field("private_key", &"<redacted>")
            .field("region", &self.region)
            .field("compartment_id", &self.compartment_id)
            .field("source", &self.source)
            .finish()
    }
}

impl CredentialSet {
    pub fn session(region: impl Into<String>) -> Self {
        Self {
            tenancy: SESSION_SENTINEL.to_string(),
            user: SESSION_SENTINEL.to_string(),
            fingerprint: SESSION_SENTINEL.to_string(),
            private_key: SESSION_SENTINEL.to_string(),
            region: region.into(),
            compartment_id: None,
            source: CredentialSource::Session,
        }
    }

    /// All five signing fields carry real values.
    pub fn is_complete(&self) -> bool {
        self.source != CredentialSource::Session
            && [
                &self.tenancy,
                &self.user,
                &self.fingerprint,
                &self.private_key,
                &self.region,
            ]
            .iter()
            .all(|v| !v.trim().is_empty())
    }

    /// Explicit compartment, else the tenancy root.
    pub fn default_compartment(&self) -> &str {
        self.compartment_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or(&self.tenancy)
    }

    pub fn validate(self) -> Result<Self, StartupError> {
        for (label, value) in [
            ("tenancy", &self.tenancy),
            ("user", &self.user),
            ("fingerprint", &self.fingerprint),
            ("private key", &self.private_key),
            ("region", &self.region),
        ] {
            if value.trim().is_empty() {
                return Err(StartupError::configuration(format!(
                    "Invalid OCI configuration: {} must be a non-empty string",
                    label
                )));
            }
        }
        if let Some(compartment) = &self.compartment_id {
            if compartment.trim().is_empty() {
                return Err(StartupError::configuration(
                    "Invalid OCI configuration: compartment id must be non-empty when set",
                ));
            }
        }
        if !REGION_PATTERN.is_match(&self.region) {
            return Err(StartupError::configuration(
                "Invalid OCI configuration: region is not a valid region identifier",
            ));
        }
        Ok(self)
    }
}

/// Location of the CLI profile file, honoring `OCI_CONFIG_FILE`.
pub fn config_file_path(env: &Environment) -> PathBuf {
    let raw = env
        .first_non_empty(&[env_names::CONFIG_FILE])
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    expand_home_path(raw, env.home())
}

fn config_error(err: ConfigFileError) -> StartupError {
    StartupError::configuration(format!("Failed to load OCI config: {}", err))
}

/// Resolves one credential set: environment, then profile file, then session
/// placeholders.
pub struct CredentialResolver {
    logger: Logger,
}

impl CredentialResolver {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger: logger.child("credentials"),
        }
    }

    pub fn resolve(&self, env: &Environment) -> Result<CredentialSet, StartupError> {
        match Self::from_environment(env) {
            Some(Ok(set)) => {
                self.logger.info("Using credentials from environment", None);
                return Ok(set);
            }
            Some(Err(err)) => self.logger.warn(
                "Ignoring invalid credentials from environment",
                Some(&serde_json::json!({ "reason": err.to_string() })),
            ),
            None => {}
        }
        match Self::from_config_file(env) {
            Ok(set) => {
                self.logger.info(
                    "Using credentials from config file",
                    Some(&serde_json::json!({ "path": config_file_path(env) })),
                );
                Ok(set)
            }
            Err(err) => {
                self.logger.warn(
                    "No usable credential source; falling back to session placeholders",
                    Some(&serde_json::json!({ "reason": err.to_string() })),
                );
                Ok(Self::session_fallback(env))
            }
        }
    }

    /// `None` unless every required variable is present.
    pub fn from_environment(env: &Environment) -> Option<Result<CredentialSet, StartupError>> {
        let tenancy = env.first_non_empty(env_names::TENANCY)?;
        let user = env.first_non_empty(env_names::USER)?;
        let fingerprint = env.first_non_empty(env_names::FINGERPRINT)?;
        let private_key = env.first_non_empty(env_names::PRIVATE_KEY)?;
        let region = env.first_non_empty(env_names::REGION)?;
        let set = CredentialSet {
            tenancy,
            user,
            fingerprint,
            private_key,
            region,
            compartment_id: env.first_non_empty(env_names::COMPARTMENT_ID),
            source: CredentialSource::Environment,
        };
        Some(set.validate())
    }

    pub fn from_config_file(env: &Environment) -> Result<CredentialSet, StartupError> {
        let path = config_file_path(env);
        let file = OciConfigFile::load(&path).map_err(config_error)?;
        let profile = file.default_profile().map_err(config_error)?;
        let private_key = profile
            .read_referenced_file("key_file", env.home())
            .map_err(config_error)?
            .unwrap_or_default();
        CredentialSet {
            tenancy: profile.get("tenancy").unwrap_or_default().to_string(),
            user: profile.get("user").unwrap_or_default().to_string(),
            fingerprint: profile.get("fingerprint").unwrap_or_default().to_string(),
            private_key,
            region: profile.get("region").unwrap_or_default().to_string(),
            compartment_id: profile.get("compartment_id").map(str::to_string),
            source: CredentialSource::ConfigFile(path),
        }
        .validate()
    }

    pub fn session_fallback(env: &Environment) -> CredentialSet {
        let region = env
            .first_non_empty(env_names::SESSION_REGION)
            .filter(|r| REGION_PATTERN.is_match(r))
            .unwrap_or_else(|| DEFAULT_REGION.to_string());
        CredentialSet::session(region)
    }
}
