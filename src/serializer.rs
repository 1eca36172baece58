//! The ARM Serializer (§4.3): turns the parsed `Element` sequence into the
//! final ARM JSON tree. Grounded on `converter.go`'s `MarshalJSON`
//! implementations — secure-prefixing, resource-property flattening, and
//! "empty groups are still present" all mirror that file's behavior.

use indexmap::IndexMap;
use serde_json::{json, Map, Value as Json};

use crate::model::{DecoratorSet, Element, PropertyMap, Value};

fn value_to_json(value: &Value) -> Json {
    serde_json::to_value(value).expect("Value serialization is infallible")
}

fn property_map_to_json(map: &PropertyMap) -> Map<String, Json> {
    match serde_json::to_value(map).expect("PropertyMap serialization is infallible") {
        Json::Object(obj) => obj,
        _ => unreachable!("a PropertyMap always serializes to a JSON object"),
    }
}

/// `secure<Type>` per ARM's convention for `@secure()`-decorated parameters
/// and outputs, e.g. `string` -> `securestring`.
fn maybe_secure_type(type_name: &str, secure: bool) -> String {
    if secure {
        format!("secure{type_name}")
    } else {
        type_name.to_string()
    }
}

/// The `metadata`/decorator-derived fields shared by parameter and output
/// specs: a `metadata.description` object (explicitly `null` when there is
/// no description, matching the original) plus whichever constraint
/// decorators were set.
fn decorator_fields(decorators: &DecoratorSet) -> Vec<(&'static str, Json)> {
    let mut fields = Vec::new();

    fields.push((
        "metadata",
        match &decorators.description {
            Some(desc) => json!({ "description": desc }),
            None => Json::Null,
        },
    ));

    if let Some(allowed) = &decorators.allowed {
        fields.push(("allowedValues", Json::Array(allowed.iter().map(value_to_json).collect())));
    }
    if let Some(v) = &decorators.max_length {
        fields.push(("maxLength", json!(v)));
    }
    if let Some(v) = &decorators.min_length {
        fields.push(("minLength", json!(v)));
    }
    if let Some(v) = &decorators.max_value {
        fields.push(("maxValue", json!(v)));
    }
    if let Some(v) = &decorators.min_value {
        fields.push(("minValue", json!(v)));
    }

    fields
}

fn param_spec(type_name: &str, default_value: &Value, decorators: &DecoratorSet) -> Json {
    let mut obj = Map::new();
    obj.insert("type".to_string(), json!(maybe_secure_type(type_name, decorators.secure)));
    obj.insert("defaultValue".to_string(), value_to_json(default_value));
    for (key, value) in decorator_fields(decorators) {
        obj.insert(key.to_string(), value);
    }
    Json::Object(obj)
}

fn output_spec(type_name: &str, value: &Value, decorators: &DecoratorSet) -> Json {
    let mut obj = Map::new();
    obj.insert("type".to_string(), json!(maybe_secure_type(type_name, decorators.secure)));
    obj.insert("value".to_string(), value_to_json(value));
    for (key, value) in decorator_fields(decorators) {
        obj.insert(key.to_string(), value);
    }
    Json::Object(obj)
}

/// Resources flatten their property map directly into the object — there is
/// no nested `properties` wrapper — with `apiVersion`/`type` merged in at
/// the top level, matching `Resource.MarshalJSON` in the original.
fn resource_object(type_name: &str, api_version: &str, properties: &PropertyMap, decorators: &DecoratorSet) -> Json {
    let mut obj = property_map_to_json(properties);
    obj.insert("apiVersion".to_string(), json!(api_version));
    obj.insert("type".to_string(), json!(maybe_secure_type(type_name, decorators.secure)));
    Json::Object(obj)
}

fn variable_value(value: &Option<Value>, properties: &Option<PropertyMap>) -> Json {
    match properties {
        Some(props) => Json::Object(property_map_to_json(props)),
        None => value_to_json(value.as_ref().unwrap_or(&Value::Null)),
    }
}

/// Builds the full ARM JSON document from a parsed element sequence.
/// Infallible: every input is already a well-typed `Value`/`Element` tree,
/// so there is no failure mode here distinct from `serde_json`'s own
/// invariants (which always hold for string-keyed maps).
pub fn serialize_to_arm(elements: &[Element]) -> Json {
    let mut target_scope = String::new();
    let mut metadata: Map<String, Json> = Map::new();
    let mut parameters: Map<String, Json> = Map::new();
    let mut variables: Map<String, Json> = Map::new();
    let mut resources = Vec::new();
    let mut outputs: Map<String, Json> = Map::new();

    for element in elements {
        match element {
            Element::TargetScope { value } => target_scope = value.clone(),
            Element::Metadata { name, description } => {
                metadata.insert(name.clone(), json!(description));
            }
            Element::Param { name, type_name, default_value, decorators } => {
                parameters.insert(name.clone(), param_spec(type_name, default_value, decorators));
            }
            Element::Variable { name, value, properties, .. } => {
                variables.insert(name.clone(), variable_value(value, properties));
            }
            Element::Resource { type_name, api_version, properties, decorators } => {
                resources.push(resource_object(type_name, api_version, properties, decorators));
            }
            Element::Output { name, type_name, value, decorators } => {
                outputs.insert(name.clone(), output_spec(type_name, value, decorators));
            }
        }
    }

    let mut doc = Map::new();
    doc.insert("targetScope".to_string(), json!(target_scope));
    doc.insert("definitions".to_string(), Json::Object(Map::new()));
    doc.insert("metadata".to_string(), Json::Object(metadata));
    doc.insert("parameters".to_string(), Json::Object(parameters));
    doc.insert("variables".to_string(), Json::Object(variables));
    doc.insert("resources".to_string(), Json::Array(resources));
    doc.insert("outputs".to_string(), Json::Object(outputs));
    doc.insert("_kics_lines".to_string(), Json::Object(Map::new()));
    Json::Object(doc)
}

/// Always-empty line-number placeholder (§6), kept as its own type alias so
/// `lib.rs` doesn't need to know it's really just an `IndexMap`.
pub type LineMap = IndexMap<String, Json>;
