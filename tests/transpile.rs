//! End-to-end scenarios and invariants (§8), run against the public
//! `parse_bicep_to_arm_json` entry point rather than the internal element
//! model, the same black-box posture the teacher's `tests/test_parsing.rs`
//! takes against its own public API.

use bicep_arm_transpiler::parse_bicep_to_arm_json;
use serde_json::Value as Json;

fn transpile(source: &str) -> Json {
    parse_bicep_to_arm_json(source.as_bytes()).expect("transpile should succeed for well-formed fixtures")
}

mod scenarios {
    use super::*;

    #[test]
    fn bare_target_scope() {
        let doc = transpile("targetScope = 'subscription'");
        assert_eq!(doc["targetScope"], serde_json::json!("subscription"));
        assert_eq!(doc["parameters"], serde_json::json!({}));
        assert_eq!(doc["resources"], serde_json::json!([]));
    }

    #[test]
    fn secure_parameter() {
        let src = "@secure()\n@description('database admin password')\nparam dbPassword string = 'changeme'";
        let doc = transpile(src);
        let param = &doc["parameters"]["dbPassword"];
        assert_eq!(param["type"], serde_json::json!("securestring"));
        assert_eq!(param["metadata"], serde_json::json!({ "description": "database admin password" }));
        assert_eq!(param["defaultValue"], serde_json::json!("changeme"));
    }

    #[test]
    fn multiline_allowed_values() {
        let src = "@allowed([\n  'dev'\n  'test'\n  'prod'\n])\nparam environment string = 'dev'";
        let doc = transpile(src);
        let param = &doc["parameters"]["environment"];
        assert_eq!(param["allowedValues"], serde_json::json!(["dev", "test", "prod"]));
    }

    #[test]
    fn resource_with_nested_property() {
        let src = "resource stg 'Microsoft.Storage/storageAccounts@2023-01-01' = {\n  sku: {\n    name: 'Standard_LRS'\n  }\n  kind: 'StorageV2'\n}";
        let doc = transpile(src);
        let resource = &doc["resources"][0];
        assert_eq!(resource["type"], serde_json::json!("Microsoft.Storage/storageAccounts"));
        assert_eq!(resource["apiVersion"], serde_json::json!("2023-01-01"));
        assert_eq!(resource["sku"]["name"], serde_json::json!("Standard_LRS"));
        assert_eq!(resource["kind"], serde_json::json!("StorageV2"));
        assert!(resource.get("properties").is_none());
    }

    #[test]
    fn interpolated_variable() {
        let src = "param prefix string = 'acct'\nvar fullName = '${prefix}-suffix'";
        let doc = transpile(src);
        assert_eq!(doc["variables"]["fullName"], serde_json::json!("[format('{0}-suffix', parameters('prefix'))]"));
    }

    #[test]
    fn metadata_block() {
        let src = "metadata description = 'Deploys the shared platform resources'";
        let doc = transpile(src);
        assert_eq!(doc["metadata"]["description"], serde_json::json!("Deploys the shared platform resources"));
    }
}

mod invariants {
    use super::*;

    #[test]
    fn top_level_keys_are_always_present_even_when_empty() {
        let doc = transpile("targetScope = 'resourceGroup'");
        let obj = doc.as_object().unwrap();
        for key in ["targetScope", "definitions", "metadata", "parameters", "variables", "resources", "outputs", "_kics_lines"] {
            assert!(obj.contains_key(key), "missing top-level key {key}");
        }
    }

    #[test]
    fn secure_prefix_rule_applies_to_params_outputs_and_resources() {
        let src = "@secure()\nparam secret string = 'x'\n@secure()\noutput echoedSecret string = 'x'\nresource stg 'Microsoft.Storage/storageAccounts@2023-01-01' = {\n  sku: {\n    name: 'Standard_LRS'\n  }\n}";
        let doc = transpile(src);
        assert_eq!(doc["parameters"]["secret"]["type"], serde_json::json!("securestring"));
        assert_eq!(doc["outputs"]["echoedSecret"]["type"], serde_json::json!("securestring"));
        // The resource itself has no @secure() decorator attached, so its type is unprefixed.
        assert_eq!(doc["resources"][0]["type"], serde_json::json!("Microsoft.Storage/storageAccounts"));
    }

    #[test]
    fn interpolation_produces_a_format_expression_with_resolved_parameter() {
        let src = "param name string = 'widget'\nvar label = '${name}'";
        let doc = transpile(src);
        assert_eq!(doc["variables"]["label"], serde_json::json!("[format('{0}', parameters('name'))]"));
    }

    #[test]
    fn resources_are_preserved_in_source_order() {
        let src = "resource a 'Microsoft.Storage/storageAccounts@2023-01-01' = {\n  name: 'a'\n}\nresource b 'Microsoft.Storage/storageAccounts@2023-01-01' = {\n  name: 'b'\n}\nresource c 'Microsoft.Storage/storageAccounts@2023-01-01' = {\n  name: 'c'\n}";
        let doc = transpile(src);
        let resources = doc["resources"].as_array().unwrap();
        assert_eq!(resources.len(), 3);
        assert_eq!(resources[0]["name"], serde_json::json!("a"));
        assert_eq!(resources[1]["name"], serde_json::json!("b"));
        assert_eq!(resources[2]["name"], serde_json::json!("c"));
    }

    #[test]
    fn coercion_of_already_typed_literals_is_idempotent() {
        let src = "var retentionDays = 30\nvar isEnabled = true";
        let doc = transpile(src);
        assert_eq!(doc["variables"]["retentionDays"], serde_json::json!(30));
        assert_eq!(doc["variables"]["isEnabled"], serde_json::json!(true));
    }
}
