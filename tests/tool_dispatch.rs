mod common;

use common::{app, call, full_instance, StubCloud, DEFAULT_COMPARTMENT};
use oci_mcp::errors::ToolError;
use oci_mcp::services::config::SafetyMode;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn terminate_is_refused_in_read_only_mode_without_touching_the_provider() {
    let cloud = Arc::new(StubCloud::default());
    let app = app(SafetyMode::Restricted, cloud.clone());

    let (result, body) = call(
        &app,
        "terminate_instance",
        json!({ "instanceId": "ocid1.instance.oc1..web" }),
    )
    .await;

    assert!(result.get("isError").is_none());
    assert_eq!(body["error"], "PERMISSION_DENIED");
    assert_eq!(body["mode"], "read-only");
    assert!(body["message"].as_str().unwrap().contains("read-only"));
    assert_eq!(cloud.call_count(), 0);
}

#[tokio::test]
async fn every_destructive_tool_is_refused_before_validation() {
    let cloud = Arc::new(StubCloud::default());
    let app = app(SafetyMode::Restricted, cloud.clone());
    for tool in ["terminate_instance", "delete_cluster", "delete_node_pool"] {
        let (_, body) = call(&app, tool, json!({})).await;
        assert_eq!(body["error"], "PERMISSION_DENIED", "{tool}");
    }
    assert_eq!(cloud.call_count(), 0);
}

#[tokio::test]
async fn provisioning_stays_available_in_read_only_mode() {
    let cloud = Arc::new(StubCloud {
        instances: vec![full_instance()],
        ..Default::default()
    });
    let app = app(SafetyMode::Restricted, cloud.clone());

    let (result, body) = call(
        &app,
        "launch_instance",
        json!({
            "availabilityDomain": "Uocm:US-ASHBURN-AD-1",
            "shape": "VM.Standard.E4.Flex",
            "imageId": "ocid1.image.oc1..ol8",
            "subnetId": "ocid1.subnet.oc1..a"
        }),
    )
    .await;

    assert!(result.get("isError").is_none());
    assert_eq!(body["id"], "ocid1.instance.oc1..web");
    assert_eq!(cloud.call_count(), 1);
}

#[tokio::test]
async fn list_instances_returns_the_projected_record() {
    let cloud = Arc::new(StubCloud {
        instances: vec![full_instance()],
        ..Default::default()
    });
    let app = app(SafetyMode::Restricted, cloud.clone());

    let (result, body) = call(&app, "list_instances", json!({})).await;

    assert!(result.get("isError").is_none());
    assert_eq!(
        body,
        json!([{
            "id": "ocid1.instance.oc1..web",
            "displayName": "web-1",
            "lifecycleState": "RUNNING",
            "availabilityDomain": "Uocm:US-ASHBURN-AD-1",
            "shape": "VM.Standard.E4.Flex",
            "compartmentId": DEFAULT_COMPARTMENT,
            "timeCreated": "2024-03-01T10:00:00.000Z",
        }])
    );
    assert_eq!(
        cloud.recorded(),
        vec![format!("list_instances {}", DEFAULT_COMPARTMENT)]
    );
}

#[tokio::test]
async fn explicit_compartment_overrides_the_default() {
    let cloud = Arc::new(StubCloud::default());
    let app = app(SafetyMode::Unrestricted, cloud.clone());

    let (_, body) = call(
        &app,
        "list_vcns",
        json!({ "compartmentId": "ocid1.compartment.oc1..other" }),
    )
    .await;

    assert_eq!(body, json!([]));
    assert_eq!(
        cloud.recorded(),
        vec!["list_vcns ocid1.compartment.oc1..other".to_string()]
    );
}

#[tokio::test]
async fn unknown_tools_are_reported_with_suggestions() {
    let cloud = Arc::new(StubCloud::default());
    let app = app(SafetyMode::Unrestricted, cloud.clone());

    let (result, body) = call(&app, "list_instance", json!({})).await;

    assert_eq!(result["isError"], true);
    assert_eq!(body["error"], "UNKNOWN_TOOL");
    assert_eq!(body["tool"], "list_instance");
    assert!(body["hint"].as_str().unwrap().contains("list_instances"));
    assert_eq!(cloud.call_count(), 0);
}

#[tokio::test]
async fn hidden_tools_are_not_suggested_in_read_only_mode() {
    let app = app(SafetyMode::Restricted, Arc::new(StubCloud::default()));
    let (_, body) = call(&app, "terminate_instances", json!({})).await;
    assert_eq!(body["error"], "UNKNOWN_TOOL");
    let hint = body["hint"].as_str().unwrap_or_default();
    assert!(!hint.contains("terminate_instance"));
}

#[tokio::test]
async fn schema_violations_never_reach_the_provider() {
    let cloud = Arc::new(StubCloud::default());
    let app = app(SafetyMode::Unrestricted, cloud.clone());

    let (result, body) = call(&app, "get_instance", json!({})).await;
    assert_eq!(result["isError"], true);
    assert_eq!(body["error"], "INVALID_PARAMS");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("missing required field 'instanceId'"));

    let (_, body) = call(&app, "get_instance", json!({ "instanceId": "  " })).await;
    assert_eq!(body["error"], "INVALID_PARAMS");

    assert_eq!(cloud.call_count(), 0);
}

#[tokio::test]
async fn provider_failures_pass_through_verbatim() {
    let message = "Compute ListInstances failed (404): NotAuthorizedOrNotFound: Authorization failed";
    let cloud = Arc::new(StubCloud {
        failure: Some(ToolError::provider(message)),
        ..Default::default()
    });
    let app = app(SafetyMode::Restricted, cloud.clone());

    let (result, body) = call(&app, "list_instances", json!({})).await;

    assert_eq!(result["isError"], true);
    assert_eq!(body["error"], "PROVIDER_ERROR");
    assert_eq!(body["message"], message);
    assert_eq!(cloud.call_count(), 1);
}

#[tokio::test]
async fn calls_are_independent() {
    let cloud = Arc::new(StubCloud {
        instances: vec![full_instance()],
        ..Default::default()
    });
    let app = app(SafetyMode::Restricted, cloud.clone());

    let (_, denied) = call(&app, "terminate_instance", json!({ "instanceId": "x" })).await;
    let (_, listed) = call(&app, "list_instances", json!({})).await;

    assert_eq!(denied["error"], "PERMISSION_DENIED");
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(cloud.call_count(), 1);
}
