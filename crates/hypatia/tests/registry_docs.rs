//! End-to-end: configuration, registration and documentation.

use hypatia::prelude::*;
use hypatia::core::fixtures;
use serde_json::Value;

#[test]
fn test_config_string_drives_registration() {
    let config = ConfigLoader::new()
        .with_string(
            "[signature]\nbody_shortcut = \"non_collection\"\npath_params = \"ignore\"\n",
            "toml",
        )
        .unwrap()
        .load()
        .unwrap();

    let mut registry = ViewRegistry::with_config(&config);
    let view = registry
        .register(
            "POST",
            "/orgs/{org_id}/tags",
            Signature::new("set_tags").param(Parameter::new("tags").annotated(TypeRef::list(TypeRef::Str))),
        )
        .unwrap();

    assert!(view.diagnostics().is_empty());
    let body = view.model(SourceKind::Body).unwrap();
    assert_eq!(body.single_attr(), None);
}

#[test]
fn test_openapi_document_for_registry() {
    let mut registry = ViewRegistry::new();
    registry
        .register(
            "GET",
            "/customers/{int:customer_id}",
            Signature::new("get_customer")
                .doc("Fetch one customer.")
                .param(Parameter::new("customer_id").annotated(TypeRef::Int)),
        )
        .unwrap();
    registry
        .register(
            "GET",
            "/customers",
            Signature::new("find_customers").param(
                Parameter::new("customer")
                    .annotated(fixtures::customer_model())
                    .default_source(ParamSource::query()),
            ),
        )
        .unwrap();

    let doc = registry
        .openapi(OpenApiGenerator::new().title("Customers").version("1.0.0"))
        .unwrap();
    let json: Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();

    let get = &json["paths"]["/customers/{customer_id}"]["get"];
    assert_eq!(get["summary"], "Fetch one customer.");
    assert_eq!(get["parameters"][0]["in"], "path");
    assert_eq!(get["parameters"][0]["schema"]["type"], "integer");

    let find = &json["paths"]["/customers"]["get"]["parameters"];
    let names: Vec<_> = find
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["name", "city", "zip"]);
    assert_eq!(find[2]["schema"]["type"], "array");
}
