//! Resource adapters, one per tool family.

pub mod compute;
pub mod container;
pub mod identity;
pub mod network;
pub mod records;
pub mod storage;

use crate::constants::credentials::SESSION_SENTINEL;
use crate::errors::ToolError;
use crate::services::config::ServerConfig;
use crate::services::oci::models::Accepted;
use crate::services::validation::Validation;
use serde::Serialize;
use serde_json::Value;

pub(crate) fn to_payload<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value)
        .map_err(|err| ToolError::internal(format!("Failed to render result: {}", err)))
}

/// Result of a delete or terminate: the provider only acknowledges it.
pub(crate) fn initiated(kind: &str, id: &str, action: &str, accepted: Accepted<()>) -> Value {
    let mut payload = serde_json::json!({
        "message": format!("{} {} {} initiated", kind, id, action),
    });
    if let (Some(map), Some(work_request_id)) = (payload.as_object_mut(), accepted.work_request_id)
    {
        map.insert("workRequestId".to_string(), Value::String(work_request_id));
    }
    payload
}

/// Where calls land when they do not name a compartment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompartmentScope {
    default_compartment: Option<String>,
    tenancy: Option<String>,
}

fn usable(id: Option<&str>) -> Option<String> {
    id.map(str::trim)
        .filter(|id| !id.is_empty() && *id != SESSION_SENTINEL)
        .map(str::to_string)
}

impl CompartmentScope {
    pub fn new(default_compartment: Option<&str>, tenancy: Option<&str>) -> Self {
        let tenancy = usable(tenancy);
        Self {
            default_compartment: usable(default_compartment).or_else(|| tenancy.clone()),
            tenancy,
        }
    }

    /// Explicit compartment, else the tenancy root. Session placeholders
    /// defer to the tenancy the signing identity reports.
    pub fn from_config(config: &ServerConfig, auth_tenancy: Option<&str>) -> Self {
        let credentials = &config.credentials;
        let tenancy = usable(Some(&credentials.tenancy)).or_else(|| usable(auth_tenancy));
        Self::new(credentials.compartment_id.as_deref(), tenancy.as_deref())
    }

    pub fn resolve(&self, args: &Value) -> Result<String, ToolError> {
        if let Some(explicit) =
            Validation::new().ensure_optional_string(args.get("compartmentId"), "compartmentId")?
        {
            return Ok(explicit);
        }
        self.default_compartment.clone().ok_or_else(|| {
            ToolError::invalid_params(
                "compartmentId is required: no default compartment is configured",
            )
            .with_hint("Pass compartmentId or set OCI_COMPARTMENT_ID.")
        })
    }

    pub fn tenancy(&self) -> Result<String, ToolError> {
        self.tenancy.clone().ok_or_else(|| {
            ToolError::invalid_params("tenancy is unknown for the active credentials")
                .with_hint("Set OCI_TENANCY or add tenancy= to the config profile.")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn explicit_argument_wins() {
        let scope = CompartmentScope::new(Some("c-default"), Some("t"));
        assert_eq!(scope.resolve(&json!({"compartmentId": "c-arg"})).unwrap(), "c-arg");
        assert_eq!(scope.resolve(&json!({})).unwrap(), "c-default");
    }

    #[test]
    fn falls_back_to_tenancy() {
        let scope = CompartmentScope::new(None, Some("ocid1.tenancy.oc1..t"));
        assert_eq!(scope.resolve(&json!({})).unwrap(), "ocid1.tenancy.oc1..t");
    }

    #[test]
    fn session_sentinel_is_never_a_scope() {
        let scope = CompartmentScope::new(None, Some(SESSION_SENTINEL));
        let err = scope.resolve(&json!({})).unwrap_err();
        assert_eq!(err.code, "INVALID_PARAMS");
        assert!(scope.tenancy().is_err());
    }

    #[test]
    fn blank_argument_is_invalid() {
        let scope = CompartmentScope::new(Some("c"), None);
        assert!(scope.resolve(&json!({"compartmentId": " "})).is_err());
    }
}
