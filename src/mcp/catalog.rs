use crate::errors::{StartupError, ToolError};
use crate::services::config::SafetyMode;
use crate::utils::suggest::suggest;
use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

const BUILTIN_CATALOG: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tool_catalog.json"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
    pub family: String,
    /// Deletes, terminates, launches, creates or updates a live resource.
    #[serde(default)]
    pub destructive: bool,
}

/// The static tool catalog with one compiled argument validator per tool.
pub struct ToolCatalog {
    tools: Vec<CapabilityDescriptor>,
    validators: HashMap<String, JSONSchema>,
}

impl ToolCatalog {
    pub fn builtin() -> Result<Self, StartupError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(raw: &str) -> Result<Self, StartupError> {
        let tools: Vec<CapabilityDescriptor> = serde_json::from_str(raw)
            .map_err(|err| StartupError::Internal(format!("tool catalog is not valid JSON: {}", err)))?;
        let mut validators = HashMap::new();
        for tool in tools.iter() {
            let schema = JSONSchema::compile(&tool.input_schema).map_err(|err| {
                StartupError::Internal(format!(
                    "tool catalog schema for {} does not compile: {}",
                    tool.name, err
                ))
            })?;
            if validators.insert(tool.name.clone(), schema).is_some() {
                return Err(StartupError::Internal(format!(
                    "tool catalog lists {} twice",
                    tool.name
                )));
            }
        }
        Ok(Self { tools, validators })
    }

    /// Catalog order. Restricted mode drops every destructive descriptor.
    pub fn list_capabilities(&self, mode: SafetyMode) -> Vec<&CapabilityDescriptor> {
        self.tools
            .iter()
            .filter(|tool| !(mode.is_restricted() && tool.destructive))
            .collect()
    }

    /// Searches every family regardless of mode.
    pub fn lookup(&self, name: &str) -> Option<&CapabilityDescriptor> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|tool| tool.name.as_str())
    }

    pub fn families(&self) -> BTreeSet<&str> {
        self.tools.iter().map(|tool| tool.family.as_str()).collect()
    }

    pub fn tools_in_family<'a>(&'a self, family: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.tools
            .iter()
            .filter(move |tool| tool.family == family)
            .map(|tool| tool.name.as_str())
    }

    /// `tools/list` entries: name, description and schema only.
    pub fn render_tools_list(&self, mode: SafetyMode) -> Value {
        let tools: Vec<Value> = self
            .list_capabilities(mode)
            .into_iter()
            .map(|tool| {
                serde_json::json!({
                    "name": tool.name,
                    "description": tool.description,
                    "inputSchema": tool.input_schema,
                })
            })
            .collect();
        serde_json::json!({ "tools": tools })
    }

    pub fn validate_args(&self, tool_name: &str, args: &Value) -> Result<(), ToolError> {
        let (Some(tool), Some(schema)) = (self.lookup(tool_name), self.validators.get(tool_name))
        else {
            return Ok(());
        };
        if let Err(errors) = schema.validate(args) {
            let (message, did_you_mean) =
                format_schema_errors(tool_name, args, errors, &tool.input_schema);
            let mut err = ToolError::invalid_params(message);
            if !did_you_mean.is_empty() {
                err = err.with_hint(format!("Did you mean: {}", did_you_mean.join(" | ")));
            }
            return Err(err);
        }
        Ok(())
    }
}

fn format_schema_errors(
    tool_name: &str,
    args: &Value,
    errors: jsonschema::ErrorIterator,
    schema: &Value,
) -> (String, Vec<String>) {
    let mut rendered = Vec::new();
    let mut did_you_means = Vec::new();

    for err in errors.take(10) {
        let instance_path = if err.instance_path.to_string().is_empty() {
            "(root)".to_string()
        } else {
            err.instance_path.to_string()
        };
        match &err.kind {
            jsonschema::error::ValidationErrorKind::AdditionalProperties { unexpected } => {
                if unexpected.is_empty() {
                    rendered.push(format!("{}: unknown field", instance_path));
                }
                for unknown in unexpected {
                    rendered.push(format!("{}: unknown field '{}'", instance_path, unknown));
                    if let Some(parent) = schema_parent_at(schema, &err.schema_path.to_string()) {
                        let props: Vec<String> = parent
                            .get("properties")
                            .and_then(|v| v.as_object())
                            .map(|map| map.keys().cloned().collect())
                            .unwrap_or_default();
                        let suggestions = suggest(unknown, props.iter().map(String::as_str), 3);
                        if !suggestions.is_empty() {
                            did_you_means.push(format!(
                                "field '{}': {}",
                                unknown,
                                suggestions.join(", ")
                            ));
                        }
                    }
                }
            }
            jsonschema::error::ValidationErrorKind::Required { property } => {
                let prop = property
                    .as_str()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| property.to_string());
                rendered.push(format!(
                    "{}: missing required field '{}'",
                    instance_path, prop
                ));
            }
            jsonschema::error::ValidationErrorKind::Type { kind } => {
                let received = schema_node_at(args, &err.instance_path.to_string());
                rendered.push(format!(
                    "{}: expected {}, got {}",
                    instance_path,
                    format_type_kind(kind),
                    json_type_name(&received)
                ));
            }
            _ => {
                rendered.push(format!("{}: {}", instance_path, err));
            }
        }
    }

    let mut lines = vec![format!("Invalid arguments for {}", tool_name)];
    lines.extend(rendered.iter().map(|line| format!("- {}", line)));
    (lines.join("\n"), did_you_means)
}

fn format_type_kind(kind: &jsonschema::error::TypeKind) -> String {
    match kind {
        jsonschema::error::TypeKind::Single(primitive) => primitive.to_string(),
        jsonschema::error::TypeKind::Multiple(types) => {
            let list: Vec<String> = (*types).into_iter().map(|t| t.to_string()).collect();
            if list.is_empty() {
                "unknown".to_string()
            } else {
                list.join(" | ")
            }
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn schema_parent_at(schema: &Value, schema_path: &str) -> Option<Value> {
    let mut current = schema;
    for segment in schema_path.split('/') {
        if segment.is_empty() || segment == "additionalProperties" {
            continue;
        }
        if let Some(obj) = current.as_object() {
            current = obj.get(segment)?;
        } else if let Some(arr) = current.as_array() {
            let idx = segment.parse::<usize>().ok()?;
            current = arr.get(idx)?;
        }
    }
    Some(current.clone())
}

fn schema_node_at(root: &Value, instance_path: &str) -> Value {
    let mut current = root;
    for segment in instance_path.trim_start_matches('/').split('/') {
        if segment.is_empty() {
            continue;
        }
        if let Some(obj) = current.as_object() {
            current = obj.get(segment).unwrap_or(&Value::Null);
        } else if let Some(arr) = current.as_array() {
            let idx = segment.parse::<usize>().unwrap_or(0);
            current = arr.get(idx).unwrap_or(&Value::Null);
        }
    }
    current.clone()
}
