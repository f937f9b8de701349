use crate::constants::env as env_names;
use crate::services::credentials::CredentialSet;
use crate::utils::feature_flags::is_enabled_flag;
use std::collections::HashMap;

/// Immutable snapshot of the process environment, taken once at startup.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// First non-blank value among `keys`, trimmed.
    pub fn first_non_empty(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|key| self.get(key))
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(str::to_string)
    }

    pub fn home(&self) -> Option<&str> {
        self.get(env_names::HOME)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyMode {
    /// Destructive tools are hidden and refused.
    Restricted,
    Unrestricted,
}

impl SafetyMode {
    pub fn from_env(env: &Environment) -> Self {
        if is_enabled_flag(env.get(env_names::READ_ONLY)) {
            SafetyMode::Restricted
        } else {
            SafetyMode::Unrestricted
        }
    }

    pub fn is_restricted(self) -> bool {
        matches!(self, SafetyMode::Restricted)
    }

    pub fn label(self) -> &'static str {
        match self {
            SafetyMode::Restricted => "read-only",
            SafetyMode::Unrestricted => "full",
        }
    }
}

/// Everything the server needs from its surroundings, resolved once.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub safety: SafetyMode,
    pub credentials: CredentialSet,
    pub environment: Environment,
}

impl ServerConfig {
    pub fn new(environment: Environment, credentials: CredentialSet) -> Self {
        Self {
            safety: SafetyMode::from_env(&environment),
            credentials,
            environment,
        }
    }

    pub fn default_compartment(&self) -> &str {
        self.credentials.default_compartment()
    }
}
