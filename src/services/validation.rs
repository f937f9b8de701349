use crate::errors::ToolError;
use serde_json::Value;

/// Argument extraction for adapters. Schema validation has already run; these
/// checks cover what JSON Schema cannot express (blank strings, ranges).
#[derive(Clone, Default)]
pub struct Validation;

impl Validation {
    pub fn new() -> Self {
        Self
    }

    pub fn ensure_string(&self, value: Option<&Value>, label: &str) -> Result<String, ToolError> {
        let text = value.and_then(Value::as_str).ok_or_else(|| {
            ToolError::invalid_params(format!("{} must be a non-empty string", label))
        })?;
        let normalized = text.trim();
        if normalized.is_empty() {
            return Err(ToolError::invalid_params(format!(
                "{} must be a non-empty string",
                label
            )));
        }
        Ok(normalized.to_string())
    }

    pub fn ensure_optional_string(
        &self,
        value: Option<&Value>,
        label: &str,
    ) -> Result<Option<String>, ToolError> {
        match value {
            None => Ok(None),
            Some(val) if val.is_null() => Ok(None),
            Some(val) => self.ensure_string(Some(val), label).map(Some),
        }
    }

    pub fn ensure_positive_integer(
        &self,
        value: Option<&Value>,
        label: &str,
    ) -> Result<i64, ToolError> {
        let numeric = value
            .and_then(Value::as_i64)
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                ToolError::invalid_params(format!("{} must be a positive integer", label))
            })?;
        Ok(numeric)
    }

    pub fn ensure_optional_number(
        &self,
        value: Option<&Value>,
        label: &str,
    ) -> Result<Option<f64>, ToolError> {
        match value {
            None => Ok(None),
            Some(val) if val.is_null() => Ok(None),
            Some(val) => val
                .as_f64()
                .filter(|n| *n > 0.0)
                .map(Some)
                .ok_or_else(|| {
                    ToolError::invalid_params(format!("{} must be a positive number", label))
                }),
        }
    }

    pub fn ensure_bool(
        &self,
        value: Option<&Value>,
        label: &str,
        fallback: bool,
    ) -> Result<bool, ToolError> {
        match value {
            None => Ok(fallback),
            Some(val) if val.is_null() => Ok(fallback),
            Some(val) => val
                .as_bool()
                .ok_or_else(|| ToolError::invalid_params(format!("{} must be a boolean", label))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_strings_are_rejected() {
        let validation = Validation::new();
        let err = validation
            .ensure_string(Some(&json!("   ")), "instanceId")
            .unwrap_err();
        assert_eq!(err.code, "INVALID_PARAMS");
        assert!(err.message.contains("instanceId"));
        assert_eq!(
            validation
                .ensure_string(Some(&json!(" ocid1.instance ")), "instanceId")
                .unwrap(),
            "ocid1.instance"
        );
    }

    #[test]
    fn optional_values_accept_null() {
        let validation = Validation::new();
        assert_eq!(
            validation
                .ensure_optional_string(Some(&Value::Null), "vcnId")
                .unwrap(),
            None
        );
        assert_eq!(validation.ensure_optional_number(None, "ocpus").unwrap(), None);
        assert!(validation.ensure_bool(None, "isPublicIpEnabled", true).unwrap());
    }

    #[test]
    fn sizes_must_be_positive() {
        let validation = Validation::new();
        assert!(validation
            .ensure_positive_integer(Some(&json!(0)), "size")
            .is_err());
        assert_eq!(
            validation
                .ensure_positive_integer(Some(&json!(3)), "size")
                .unwrap(),
            3
        );
    }
}
