//! Property-name alias table.
//!
//! The daemon's wire format uses canonical snake_case field names. Callers
//! may supply payloads using short aliases (`cmd`, `mem`) or camelCase
//! (`imagePath`, `memoryMb`); this table maps every accepted alternate
//! spelling to its canonical form. Canonical names never appear as alias
//! keys, so a single rewrite pass is always sufficient.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Alternate spelling to canonical name, one row per accepted alias.
pub const ALIAS_TABLE: &[(&str, &str)] = &[
    ("cmd", "command"),
    ("image", "image_path"),
    ("imagePath", "image_path"),
    ("async", "async_mode"),
    ("asyncMode", "async_mode"),
    ("wd", "working_dir"),
    ("workingDir", "working_dir"),
    ("environment", "env"),
    ("envVars", "env"),
    ("mem", "memory_mb"),
    ("memoryMb", "memory_mb"),
    ("cpus", "cpu_limit"),
    ("cpuLimit", "cpu_limit"),
    ("timeout", "timeout_ms"),
    ("timeoutMs", "timeout_ms"),
    ("vol", "volume_name"),
    ("volumeName", "volume_name"),
    ("mount", "mount_path"),
    ("mountPath", "mount_path"),
    ("net", "network_config"),
    ("networkConfig", "network_config"),
    ("fn", "function_name"),
    ("functionName", "function_name"),
    ("src", "source_path"),
    ("sourcePath", "source_path"),
    ("pool", "warm_pool_size"),
    ("warmPoolSize", "warm_pool_size"),
    ("concurrency", "max_concurrency"),
    ("maxConcurrency", "max_concurrency"),
    ("scriptB64", "script_base64"),
    ("scriptBase64", "script_base64"),
    ("parts", "script_parts"),
    ("scriptParts", "script_parts"),
    ("addr", "address"),
    ("gw", "gateway"),
    ("setupComplete", "setup_complete"),
    ("restartPolicy", "restart_policy"),
    ("sizeMb", "size_mb"),
    ("hostPort", "host_port"),
    ("containerPort", "container_port"),
];

static ALIASES: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| ALIAS_TABLE.iter().copied().collect());

/// Maps a property name to its canonical form.
///
/// Unrecognized names are returned unchanged, which keeps normalization
/// forward-compatible with fields the table does not yet know about.
#[must_use]
pub fn canonical_key(key: &str) -> &str {
    ALIASES.get(key).copied().unwrap_or(key)
}

/// Returns true if a name is not an alias (it is already canonical, or
/// unknown to the table).
#[must_use]
pub fn is_canonical(key: &str) -> bool {
    !ALIASES.contains_key(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_lookup() {
        assert_eq!(canonical_key("cmd"), "command");
        assert_eq!(canonical_key("imagePath"), "image_path");
        assert_eq!(canonical_key("memoryMb"), "memory_mb");
    }

    #[test]
    fn test_canonical_passthrough() {
        assert_eq!(canonical_key("command"), "command");
        assert_eq!(canonical_key("image_path"), "image_path");
    }

    #[test]
    fn test_unknown_passthrough() {
        assert_eq!(canonical_key("some_future_field"), "some_future_field");
        assert!(is_canonical("some_future_field"));
    }

    #[test]
    fn test_no_chained_aliases() {
        // Every canonical value must be a fixed point of the table, otherwise
        // a single rewrite pass would not be idempotent.
        for (_, canonical) in ALIAS_TABLE {
            assert!(
                is_canonical(canonical),
                "canonical name '{canonical}' is itself an alias key"
            );
        }
    }

    #[test]
    fn test_no_duplicate_alias_keys() {
        let mut seen = std::collections::HashSet::new();
        for (alias, _) in ALIAS_TABLE {
            assert!(seen.insert(alias), "alias '{alias}' appears twice");
        }
    }
}
