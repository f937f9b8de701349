use crate::constants::credentials::DEFAULT_PROFILE;
use crate::constants::env as env_names;
use crate::errors::StartupError;
use crate::services::config::Environment;
use crate::services::credentials::{config_file_path, CredentialSet};
use crate::services::logger::Logger;
use crate::services::oci::signer::RequestSigner;
use crate::services::oci_config_file::OciConfigFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthKind {
    ConfigFileApiKey,
    ConfigFileSession,
    DirectCredentials,
}

impl AuthKind {
    pub fn label(self) -> &'static str {
        match self {
            AuthKind::ConfigFileApiKey => "config_file_api_key",
            AuthKind::ConfigFileSession => "config_file_session",
            AuthKind::DirectCredentials => "direct_credentials",
        }
    }
}

/// The single signing identity of the process. Built once, shared read-only.
#[derive(Debug, Clone)]
pub struct AuthHandle {
    kind: AuthKind,
    signer: RequestSigner,
    region: String,
    tenancy: Option<String>,
}

impl AuthHandle {
    pub fn new(
        kind: AuthKind,
        signer: RequestSigner,
        region: impl Into<String>,
        tenancy: Option<String>,
    ) -> Self {
        Self {
            kind,
            signer,
            region: region.into(),
            tenancy,
        }
    }

    pub fn kind(&self) -> AuthKind {
        self.kind
    }

    pub fn signer(&self) -> &RequestSigner {
        &self.signer
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Tenancy known to the signing identity, if the auth source names one.
    pub fn tenancy(&self) -> Option<&str> {
        self.tenancy.as_deref()
    }
}

type AuthAttempt<'a> = (&'static str, Box<dyn FnOnce() -> Result<AuthHandle, String> + 'a>);

/// Runs attempts in order; the first success wins, otherwise every failure is
/// returned in order.
fn first_success(attempts: Vec<AuthAttempt<'_>>) -> Result<AuthHandle, Vec<(&'static str, String)>> {
    let mut failures = Vec::new();
    for (name, attempt) in attempts {
        match attempt() {
            Ok(handle) => return Ok(handle),
            Err(err) => failures.push((name, err)),
        }
    }
    Err(failures)
}

pub struct AuthProviderSelector {
    logger: Logger,
}

impl AuthProviderSelector {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger: logger.child("auth"),
        }
    }

    pub fn select(
        &self,
        env: &Environment,
        credentials: &CredentialSet,
    ) -> Result<AuthHandle, StartupError> {
        let attempts: Vec<AuthAttempt<'_>> = vec![
            (
                "config_file",
                Box::new(|| Self::from_config_file(env, credentials)),
            ),
            (
                "direct_credentials",
                Box::new(|| Self::from_credentials(credentials)),
            ),
        ];
        match first_success(attempts) {
            Ok(handle) => {
                self.logger.info(
                    "Authentication provider ready",
                    Some(&serde_json::json!({
                        "provider": handle.kind().label(),
                        "region": handle.region(),
                    })),
                );
                Ok(handle)
            }
            Err(failures) => {
                let root_cause = failures
                    .iter()
                    .find(|(name, _)| *name == "config_file")
                    .map(|(_, err)| err.clone())
                    .unwrap_or_default();
                let others = failures
                    .iter()
                    .filter(|(name, _)| *name != "config_file")
                    .map(|(name, err)| format!("{}: {}", name, err))
                    .collect::<Vec<_>>()
                    .join("; ");
                Err(StartupError::authentication(format!(
                    "Failed to initialize OCI authentication. Config file error: {}. {}. \
                     Ensure ~/.oci/config exists or set the OCI_* environment variables.",
                    root_cause, others
                )))
            }
        }
    }

    pub fn from_config_file(
        env: &Environment,
        credentials: &CredentialSet,
    ) -> Result<AuthHandle, String> {
        let path = config_file_path(env);
        let file = OciConfigFile::load(&path).map_err(|err| err.to_string())?;
        let profile_name = env
            .first_non_empty(&[env_names::CONFIG_PROFILE])
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string());
        let profile = file.profile(&profile_name).map_err(|err| err.to_string())?;
        let private_key = profile
            .read_referenced_file("key_file", env.home())
            .map_err(|err| err.to_string())?
            .ok_or_else(|| format!("profile '{}' is missing 'key_file'", profile.name))?;
        let region = profile
            .get("region")
            .map(str::to_string)
            .unwrap_or_else(|| credentials.region.clone());
        let tenancy = profile.get("tenancy").map(str::to_string);

        if let Some(token) = profile
            .read_referenced_file("security_token_file", env.home())
            .map_err(|err| err.to_string())?
        {
            let signer = RequestSigner::session_token(&token, &private_key)?;
            signer.check_key()?;
            return Ok(AuthHandle::new(
                AuthKind::ConfigFileSession,
                signer,
                region,
                tenancy,
            ));
        }

        let tenancy_id = profile.require("tenancy").map_err(|err| err.to_string())?;
        let user = profile.require("user").map_err(|err| err.to_string())?;
        let fingerprint = profile
            .require("fingerprint")
            .map_err(|err| err.to_string())?;
        let signer = RequestSigner::api_key(tenancy_id, user, fingerprint, &private_key);
        signer.check_key()?;
        Ok(AuthHandle::new(
            AuthKind::ConfigFileApiKey,
            signer,
            region,
            tenancy,
        ))
    }

    /// A complete set is accepted as-is; its key is parsed on the first
    /// signed request.
    pub fn from_credentials(credentials: &CredentialSet) -> Result<AuthHandle, String> {
        if !credentials.is_complete() {
            return Err("credential set is incomplete".to_string());
        }
        let signer = RequestSigner::api_key(
            &credentials.tenancy,
            &credentials.user,
            &credentials.fingerprint,
            &credentials.private_key,
        );
        Ok(AuthHandle::new(
            AuthKind::DirectCredentials,
            signer,
            credentials.region.clone(),
            Some(credentials.tenancy.clone()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::credentials::CredentialResolver;

    fn env_without_file() -> Environment {
        Environment::from_pairs([
            ("OCI_TENANCY", "t1"),
            ("OCI_USER", "u1"),
            ("OCI_FINGERPRINT", "f1"),
            ("OCI_PRIVATE_KEY", "k1"),
            ("OCI_REGION", "us-ashburn-1"),
            ("OCI_CONFIG_FILE", "/nonexistent/oci/config"),
        ])
    }

    #[test]
    fn first_success_stops_at_first_ok() {
        let calls = std::cell::Cell::new(0);
        let result = first_success(vec![
            ("a", Box::new(|| Err("nope".to_string()))),
            (
                "b",
                Box::new(|| {
                    calls.set(calls.get() + 1);
                    Err("still nope".to_string())
                }),
            ),
        ]);
        let failures = result.unwrap_err();
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0], ("a", "nope".to_string()));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn session_credentials_never_build_direct_provider() {
        let err = AuthProviderSelector::from_credentials(&CredentialSet::session("us-ashburn-1"))
            .unwrap_err();
        assert!(err.contains("incomplete"));
    }

    #[test]
    fn complete_environment_without_file_builds_direct_provider() {
        let env = env_without_file();
        let credentials = CredentialResolver::from_environment(&env)
            .expect("complete")
            .expect("valid");
        let handle = AuthProviderSelector::new(Logger::from_environment("test", &env))
            .select(&env, &credentials)
            .expect("direct credentials");
        assert_eq!(handle.kind(), AuthKind::DirectCredentials);
        assert_eq!(handle.tenancy(), Some("t1"));
        assert!(handle.signer().check_key().is_err());
    }

    #[test]
    fn failure_carries_config_file_root_cause() {
        let env = Environment::from_pairs([("OCI_CONFIG_FILE", "/nonexistent/oci/config")]);
        let err = AuthProviderSelector::new(Logger::from_environment("test", &env))
            .select(&env, &CredentialSet::session("us-ashburn-1"))
            .unwrap_err();
        let StartupError::Authentication(message) = err else {
            panic!("expected authentication error");
        };
        assert!(message.contains("Config file error: config file not found"));
        assert!(message.contains("direct_credentials: credential set is incomplete"));
    }
}
