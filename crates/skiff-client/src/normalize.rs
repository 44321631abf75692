//! Recursive payload normalization.
//!
//! Rewrites every mapping key in an arbitrary JSON tree through the alias
//! table, leaving values and unrecognized keys untouched. Normalization
//! never fails and is idempotent: canonical keys are fixed points of the
//! alias table, so re-normalizing a canonical payload is a no-op.

use crate::alias::canonical_key;
use crate::error::{ClientError, Result};
use serde_json::{Map, Value};

/// Normalizes a payload tree to canonical property names.
///
/// Objects have each key rewritten through the alias table and each value
/// normalized recursively. Array elements that are objects or arrays are
/// normalized recursively; scalar elements pass through unchanged, as do
/// bare scalars.
///
/// When two alternate spellings of the same canonical key occur in one
/// object, the collision resolves last-write-wins in lexicographic order of
/// the *source* keys (`serde_json::Map` iterates its keys in sorted order),
/// so the outcome is deterministic across runs.
#[must_use]
pub fn normalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, val) in map {
                out.insert(canonical_key(&key).to_string(), normalize(val));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| match item {
                    Value::Object(_) | Value::Array(_) => normalize(item),
                    scalar => scalar,
                })
                .collect(),
        ),
        scalar => scalar,
    }
}

/// Normalizes a payload and requires the result to be a JSON object.
///
/// `Null` is accepted as shorthand for an empty payload. Anything else that
/// is not an object is a caller error, surfaced before any network call.
pub fn normalize_object(value: Value, operation: &str) -> Result<Map<String, Value>> {
    match normalize(value) {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(ClientError::validation(format!(
            "{operation} payload must be an object, got {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_top_level_keys_rewritten() {
        let normalized = normalize(json!({
            "cmd": ["node", "app.js"],
            "imagePath": "/images/app.img",
            "unknown_field": 1,
        }));
        assert_eq!(
            normalized,
            json!({
                "command": ["node", "app.js"],
                "image_path": "/images/app.img",
                "unknown_field": 1,
            })
        );
    }

    #[test]
    fn test_recursive_through_map_seq_map() {
        // A mapping nested inside a sequence nested inside a mapping has all
        // three levels canonicalized.
        let normalized = normalize(json!({
            "net": {
                "addr": "10.0.0.2",
                "routes": [{ "gw": "10.0.0.1" }, "literal"],
            }
        }));
        assert_eq!(
            normalized,
            json!({
                "network_config": {
                    "address": "10.0.0.2",
                    "routes": [{ "gateway": "10.0.0.1" }, "literal"],
                }
            })
        );
    }

    #[test]
    fn test_scalars_pass_through() {
        assert_eq!(normalize(json!("cmd")), json!("cmd"));
        assert_eq!(normalize(json!(42)), json!(42));
        assert_eq!(normalize(json!(null)), json!(null));
        // String values are never rewritten, only keys.
        assert_eq!(
            normalize(json!({ "command": "cmd" })),
            json!({ "command": "cmd" })
        );
    }

    #[test]
    fn test_idempotence() {
        let payload = json!({
            "cmd": "echo hi",
            "envVars": { "mem": "not-a-key-here" },
            "mounts": [{ "vol": "data", "mountPath": "/data" }],
        });
        let once = normalize(payload);
        let twice = normalize(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_collision_is_deterministic_last_write_wins() {
        // "async" < "asyncMode" lexicographically, so the camelCase spelling
        // is written last and wins.
        let normalized = normalize(json!({ "async": true, "asyncMode": false }));
        assert_eq!(normalized, json!({ "async_mode": false }));

        // Alias vs. canonical: "cmd" < "command", canonical wins.
        let normalized = normalize(json!({ "cmd": ["a"], "command": ["b"] }));
        assert_eq!(normalized, json!({ "command": ["b"] }));
    }

    #[test]
    fn test_alias_equivalence_across_table() {
        // Every accepted spelling of a field yields the same canonical
        // payload as the canonical spelling itself.
        for (alias, canonical) in crate::alias::ALIAS_TABLE {
            let mut via_alias = Map::new();
            via_alias.insert((*alias).to_string(), json!(1));
            let mut via_canonical = Map::new();
            via_canonical.insert((*canonical).to_string(), json!(1));

            assert_eq!(
                normalize(Value::Object(via_alias)),
                normalize(Value::Object(via_canonical)),
                "alias '{alias}' does not canonicalize to '{canonical}'"
            );
        }
    }

    #[test]
    fn test_normalize_object_rejects_non_objects() {
        let err = normalize_object(json!(["not", "an", "object"]), "container create")
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("container create"));
    }

    #[test]
    fn test_normalize_object_accepts_null() {
        let map = normalize_object(Value::Null, "container list").unwrap();
        assert!(map.is_empty());
    }
}
