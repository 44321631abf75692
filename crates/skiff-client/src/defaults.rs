//! Per-operation default payload tables.
//!
//! Each table is the daemon contract's implied default payload for one
//! operation kind, expressed in canonical field names. Defaults never
//! overwrite caller-supplied fields, and the merge is shallow: a nested
//! structure supplied by the caller is taken wholesale.
//!
//! Tables are plain data carried on the [`Client`](crate::Client) rather
//! than module-level constants, so tests can substitute alternate defaults
//! without touching shared state.

use serde_json::{Map, Value, json};

/// Default filesystem image used when a create request names no image.
pub const DEFAULT_IMAGE_PATH: &str = "/var/lib/skiff/images/base-alpine.img";

/// Default payload tables, one per operation kind.
#[derive(Debug, Clone)]
pub struct DefaultTables {
    /// Container create defaults.
    pub container_create: Map<String, Value>,
    /// Container exec defaults.
    pub container_exec: Map<String, Value>,
    /// Container stop defaults.
    pub container_stop: Map<String, Value>,
    /// Volume create defaults.
    pub volume_create: Map<String, Value>,
    /// Metrics query defaults.
    pub metrics_query: Map<String, Value>,
    /// Function create defaults.
    pub function_create: Map<String, Value>,
    /// Function invoke defaults.
    pub function_invoke: Map<String, Value>,
    /// Function deploy defaults.
    pub function_deploy: Map<String, Value>,
    /// Function pause defaults.
    pub function_pause: Map<String, Value>,
    /// Function resume defaults.
    pub function_resume: Map<String, Value>,
}

impl Default for DefaultTables {
    fn default() -> Self {
        Self {
            container_create: table(json!({
                "command": [],
                "env": {},
                "working_dir": "/",
                "memory_mb": 512,
                "cpu_limit": 1.0,
                "volumes": [],
            })),
            container_exec: table(json!({
                "env": {},
                "working_dir": "/",
                "timeout_ms": 30_000,
                "tty": false,
            })),
            container_stop: table(json!({
                "timeout_ms": 10_000,
                "force": false,
            })),
            volume_create: table(json!({
                "driver": "local",
                "size_mb": 1024,
                "labels": {},
            })),
            metrics_query: table(json!({
                "period_s": 60,
                "scope": "summary",
            })),
            function_create: table(json!({
                "runtime": "python3.11",
                "handler": "main.handler",
                "memory_mb": 256,
                "timeout_ms": 30_000,
                "env": {},
            })),
            function_invoke: table(json!({
                "payload": {},
                "async_mode": false,
            })),
            function_deploy: table(json!({
                "activate": true,
            })),
            function_pause: Map::new(),
            function_resume: Map::new(),
        }
    }
}

fn table(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Fills missing top-level keys of `supplied` from `defaults`.
///
/// Caller values always take precedence; there is no deep merge of nested
/// defaults against nested caller values.
#[must_use]
pub fn merge_defaults(
    defaults: &Map<String, Value>,
    supplied: Map<String, Value>,
) -> Map<String, Value> {
    let mut merged = supplied;
    for (key, value) in defaults {
        if !merged.contains_key(key) {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_defaults_fill_missing_keys() {
        let defaults = DefaultTables::default();
        let merged = merge_defaults(
            &defaults.container_exec,
            as_map(json!({ "command": ["ls"] })),
        );
        assert_eq!(merged["command"], json!(["ls"]));
        assert_eq!(merged["timeout_ms"], json!(30_000));
        assert_eq!(merged["working_dir"], json!("/"));
    }

    #[test]
    fn test_supplied_values_never_overwritten() {
        let defaults = DefaultTables::default();
        let merged = merge_defaults(
            &defaults.container_stop,
            as_map(json!({ "timeout_ms": 500, "force": true })),
        );
        assert_eq!(merged["timeout_ms"], json!(500));
        assert_eq!(merged["force"], json!(true));
    }

    #[test]
    fn test_merge_is_shallow() {
        // A caller-supplied nested object is taken wholesale, not deep-merged
        // against a nested default.
        let defaults = as_map(json!({ "env": { "PATH": "/bin", "HOME": "/root" } }));
        let merged = merge_defaults(&defaults, as_map(json!({ "env": { "PATH": "/usr/bin" } })));
        assert_eq!(merged["env"], json!({ "PATH": "/usr/bin" }));
    }

    #[test]
    fn test_tables_are_substitutable() {
        let mut custom = DefaultTables::default();
        custom.container_create = as_map(json!({ "memory_mb": 64 }));
        let merged = merge_defaults(&custom.container_create, Map::new());
        assert_eq!(merged["memory_mb"], json!(64));
        assert!(!merged.contains_key("working_dir"));
    }
}
