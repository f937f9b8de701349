use oci_mcp::mcp::catalog::ToolCatalog;
use oci_mcp::services::config::{Environment, SafetyMode};
use std::collections::HashSet;

fn names(catalog: &ToolCatalog, mode: SafetyMode) -> Vec<String> {
    catalog
        .list_capabilities(mode)
        .into_iter()
        .map(|tool| tool.name.clone())
        .collect()
}

#[test]
fn restricted_listing_is_a_strict_subset_without_destructive_tools() {
    let catalog = ToolCatalog::builtin().expect("catalog");
    let full: HashSet<String> = names(&catalog, SafetyMode::Unrestricted).into_iter().collect();
    let restricted: HashSet<String> = names(&catalog, SafetyMode::Restricted).into_iter().collect();

    assert!(restricted.is_subset(&full));
    assert!(restricted.len() < full.len());
    for tool in catalog.list_capabilities(SafetyMode::Unrestricted) {
        assert_eq!(
            restricted.contains(&tool.name),
            !tool.destructive,
            "{} visibility must follow its destructive flag",
            tool.name
        );
    }
    assert!(!restricted.contains("terminate_instance"));
    assert!(restricted.contains("get_kubeconfig"));
}

#[test]
fn listing_is_idempotent() {
    let catalog = ToolCatalog::builtin().expect("catalog");
    for mode in [SafetyMode::Restricted, SafetyMode::Unrestricted] {
        assert_eq!(names(&catalog, mode), names(&catalog, mode));
        assert_eq!(catalog.render_tools_list(mode), catalog.render_tools_list(mode));
    }
}

#[test]
fn full_listing_covers_every_family() {
    let catalog = ToolCatalog::builtin().expect("catalog");
    let listed = names(&catalog, SafetyMode::Unrestricted);
    assert_eq!(listed.len(), 22);
    for family in ["compute", "network", "storage", "identity", "container"] {
        assert!(catalog.tools_in_family(family).next().is_some(), "{family}");
    }
}

#[test]
fn read_only_flag_selects_mode() {
    for (raw, restricted) in [
        ("true", true),
        ("1", true),
        ("false", false),
        ("yes", false),
        ("", false),
    ] {
        let env = Environment::from_pairs([("OCI_MCP_READ_ONLY", raw)]);
        assert_eq!(SafetyMode::from_env(&env).is_restricted(), restricted, "{raw:?}");
    }
    assert!(!SafetyMode::from_env(&Environment::default()).is_restricted());
}
