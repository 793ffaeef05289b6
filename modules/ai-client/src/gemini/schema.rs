use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;

/// Keys Gemini's OpenAPI-subset schema rejects.
const UNSUPPORTED_KEYS: &[&str] = &[
    "$schema",
    "$id",
    "title",
    "definitions",
    "additionalProperties",
    "format",
    "default",
];

/// Trait for types that can be requested as Gemini structured output.
///
/// Automatically implemented for any type that implements `JsonSchema + DeserializeOwned`.
pub trait ResponseSchema: JsonSchema + DeserializeOwned {
    /// Generate a `responseSchema` value for this type.
    ///
    /// Gemini requires fully inlined schemas (no `$ref`), a single `type`
    /// per node with `nullable` for optional values, and rejects the
    /// JSON-Schema bookkeeping keys schemars emits.
    fn response_schema() -> serde_json::Value {
        let schema = schema_for!(Self);
        let mut value = serde_json::to_value(schema).unwrap_or_default();

        inline_refs(&mut value);
        mark_nullable(&mut value);
        strip_unsupported(&mut value);

        value
    }
}

impl<T: JsonSchema + DeserializeOwned> ResponseSchema for T {}

fn strip_unsupported(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for key in UNSUPPORTED_KEYS {
                map.remove(*key);
            }
            // `properties` keys are field names, not schema keywords.
            for (key, v) in map.iter_mut() {
                if key == "properties" {
                    if let serde_json::Value::Object(props) = v {
                        for prop in props.values_mut() {
                            strip_unsupported(prop);
                        }
                    }
                } else {
                    strip_unsupported(v);
                }
            }
        }
        serde_json::Value::Array(arr) => {
            for item in arr.iter_mut() {
                strip_unsupported(item);
            }
        }
        _ => {}
    }
}

/// Rewrite `"type": [T, "null"]` and `anyOf: [S, {"type": "null"}]` into
/// `T` / `S` with `"nullable": true`.
fn mark_nullable(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            if let Some(serde_json::Value::Array(types)) = map.get("type").cloned() {
                let concrete: Vec<_> = types.iter().filter(|t| *t != "null").cloned().collect();
                if let [single] = concrete.as_slice() {
                    map.insert("type".to_string(), single.clone());
                    if concrete.len() < types.len() {
                        map.insert("nullable".to_string(), serde_json::Value::Bool(true));
                    }
                }
            }

            if let Some(serde_json::Value::Array(any_of)) = map.get("anyOf").cloned() {
                let concrete: Vec<_> = any_of.iter().filter(|s| !is_null_schema(s)).cloned().collect();
                if concrete.len() == 1 && any_of.len() == 2 {
                    let mut inner = concrete[0].clone();
                    if let serde_json::Value::Object(inner_map) = &mut inner {
                        inner_map.insert("nullable".to_string(), serde_json::Value::Bool(true));
                        for (key, v) in map.iter() {
                            if key != "anyOf" {
                                inner_map.entry(key.clone()).or_insert_with(|| v.clone());
                            }
                        }
                    }
                    *value = inner;
                    mark_nullable(value);
                    return;
                }
            }

            for (_, v) in map.iter_mut() {
                mark_nullable(v);
            }
        }
        serde_json::Value::Array(arr) => {
            for item in arr.iter_mut() {
                mark_nullable(item);
            }
        }
        _ => {}
    }
}

fn is_null_schema(schema: &serde_json::Value) -> bool {
    schema.get("type").is_some_and(|t| t == "null")
}

fn inline_refs(value: &mut serde_json::Value) {
    let definitions = if let serde_json::Value::Object(map) = value {
        map.get("definitions").cloned()
    } else {
        None
    };

    if let Some(defs) = definitions {
        inline_refs_recursive(value, &defs);
    }
}

fn inline_refs_recursive(value: &mut serde_json::Value, definitions: &serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            if let Some(serde_json::Value::String(ref_path)) = map.get("$ref").cloned() {
                if ref_path.starts_with("#/definitions/") {
                    let type_name = ref_path.trim_start_matches("#/definitions/");
                    if let Some(def) = definitions.get(type_name) {
                        *value = def.clone();
                        inline_refs_recursive(value, definitions);
                        return;
                    }
                }
            }

            if let Some(serde_json::Value::Array(all_of)) = map.get("allOf").cloned() {
                if let [single] = all_of.as_slice() {
                    *value = single.clone();
                    inline_refs_recursive(value, definitions);
                    return;
                }
            }

            for (_, v) in map.iter_mut() {
                inline_refs_recursive(v, definitions);
            }
        }
        serde_json::Value::Array(arr) => {
            for item in arr.iter_mut() {
                inline_refs_recursive(item, definitions);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde::Deserialize;

    #[derive(Deserialize, JsonSchema)]
    #[allow(dead_code)]
    enum Level {
        High,
        Low,
    }

    #[derive(Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct Section {
        header: String,
        level: Level,
    }

    #[derive(Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct Report {
        title: String,
        word_count: u32,
        sections: Vec<Section>,
    }

    #[test]
    fn nested_types_are_inlined() {
        let schema = Report::response_schema();
        let obj = schema.as_object().unwrap();

        assert!(!obj.contains_key("definitions"));
        assert!(!obj.contains_key("$schema"));

        let section = &schema["properties"]["sections"]["items"];
        assert_eq!(section["type"], "object");
        assert!(section.get("$ref").is_none());
        assert_eq!(section["properties"]["level"]["enum"][0], "High");
    }

    #[test]
    fn bookkeeping_keys_removed_but_field_named_title_kept() {
        let schema = Report::response_schema();
        let text = serde_json::to_string(&schema).unwrap();

        assert!(!text.contains("additionalProperties"));
        assert!(!text.contains("\"format\""));
        assert!(schema["properties"].get("title").is_some());
    }

    #[derive(Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct Draft {
        note: Option<String>,
        #[serde(default)]
        count: Option<u32>,
        section: Option<Section>,
    }

    #[test]
    fn optional_fields_become_nullable_single_types() {
        let schema = Draft::response_schema();
        let props = &schema["properties"];

        assert_eq!(props["note"]["type"], "string");
        assert_eq!(props["note"]["nullable"], true);
        assert_eq!(props["count"]["type"], "integer");
        assert_eq!(props["count"]["nullable"], true);
        assert_eq!(props["section"]["type"], "object");
        assert_eq!(props["section"]["nullable"], true);
        assert!(props["section"].get("anyOf").is_none());

        let text = serde_json::to_string(&schema).unwrap();
        assert!(!text.contains("\"null\""));
    }

    #[test]
    fn vec_root_inlines_items() {
        let schema = Vec::<Section>::response_schema();
        assert_eq!(schema["type"], "array");
        assert_eq!(schema["items"]["type"], "object");
    }
}
