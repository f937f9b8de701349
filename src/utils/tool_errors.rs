use crate::errors::ToolError;
use crate::utils::suggest::suggest;

/// An adapter received a tool outside its family. Only reachable through a
/// wiring mistake, so it is reported as `INTERNAL`.
pub fn unroutable_tool_error(family: &str, tool: &str, known_tools: &[&str]) -> ToolError {
    let suggestions = if tool.is_empty() {
        Vec::new()
    } else {
        suggest(tool, known_tools.iter().copied(), 3)
    };
    let mut err = ToolError::internal(format!("{} adapter cannot handle tool: {}", family, tool))
        .with_details(serde_json::json!({
            "family": family,
            "known_tools": known_tools,
            "did_you_mean": suggestions,
        }));
    if !known_tools.is_empty() {
        err = err.with_hint(format!("{} handles: {}.", family, known_tools.join(", ")));
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_family_and_known_tools() {
        let err = unroutable_tool_error("network", "list_vcn", &["list_vcns", "list_subnets"]);
        assert_eq!(err.code, "INTERNAL");
        assert!(err.message.contains("network adapter"));
        let details = err.details.expect("details");
        assert_eq!(details["did_you_mean"][0], "list_vcns");
    }
}
