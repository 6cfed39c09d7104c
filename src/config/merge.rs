//! Field-by-field merging of configuration tiers.
//!
//! Higher tiers override lower ones. Arrays are replaced, not concatenated.

use serde_json::Value;

/// Deep merge two JSON values, with `overlay` taking precedence over `base`.
///
/// - Objects are merged recursively: keys in overlay override keys in base
/// - Arrays, strings, numbers, booleans, nulls are replaced entirely
/// - If overlay is null, the base value is preserved (null means "not specified")
///
/// # Example
/// ```
/// use serde_json::json;
/// use jobcore::config::deep_merge;
///
/// let base = json!({
///     "home": { "root": "/srv/ci", "jobs_dir": "jobs" },
///     "tags": ["a", "b"]
/// });
/// let overlay = json!({
///     "home": { "root": "/var/ci" },
///     "tags": ["c"]
/// });
/// let result = deep_merge(base, overlay);
/// assert_eq!(result["home"]["root"], "/var/ci");
/// assert_eq!(result["home"]["jobs_dir"], "jobs");
/// assert_eq!(result["tags"], json!(["c"]));
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        // Both are objects: merge recursively
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged_value = if let Some(base_value) = base_map.remove(&key) {
                    deep_merge(base_value, overlay_value)
                } else {
                    overlay_value
                };
                base_map.insert(key, merged_value);
            }
            Value::Object(base_map)
        }
        // Overlay is null: preserve base (null means "not specified")
        (base, Value::Null) => base,
        // Any other case: overlay replaces base entirely
        (_, overlay) => overlay,
    }
}

/// Merge tiers in order, later tiers winning.
pub fn deep_merge_all(values: impl IntoIterator<Item = Value>) -> Value {
    values.into_iter().fold(Value::Null, deep_merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_nested_sections() {
        let base = json!({
            "home": {"root": ".", "jobs_dir": "jobs"},
            "logging": {"level": "info"}
        });
        let overlay = json!({"home": {"root": "/srv/ci"}});
        assert_eq!(
            deep_merge(base, overlay),
            json!({
                "home": {"root": "/srv/ci", "jobs_dir": "jobs"},
                "logging": {"level": "info"}
            })
        );
    }

    #[test]
    fn test_arrays_replaced_not_merged() {
        let base = json!({"plugins": ["core", "matrix"]});
        let overlay = json!({"plugins": ["maven"]});
        assert_eq!(deep_merge(base, overlay), json!({"plugins": ["maven"]}));
    }

    #[test]
    fn test_null_preserves_base() {
        let base = json!({"home": {"jobs_dir": "jobs"}, "logging": {"level": "warn"}});
        let overlay = json!({"home": {"jobs_dir": null}, "logging": null});
        assert_eq!(
            deep_merge(base, overlay),
            json!({"home": {"jobs_dir": "jobs"}, "logging": {"level": "warn"}})
        );
    }

    #[test]
    fn test_merge_all_later_tiers_win() {
        let tiers = vec![
            json!({"logging": {"level": "info"}, "home": {"root": "."}}),
            json!({"logging": {"level": "debug"}}),
            json!({"home": {"root": "/srv/ci"}}),
        ];
        assert_eq!(
            deep_merge_all(tiers),
            json!({"logging": {"level": "debug"}, "home": {"root": "/srv/ci"}})
        );
    }

    #[test]
    fn test_scalar_and_object_replace_each_other() {
        assert_eq!(
            deep_merge(json!({"home": "/srv"}), json!({"home": {"root": "/srv"}})),
            json!({"home": {"root": "/srv"}})
        );
        assert_eq!(
            deep_merge(json!({"home": {"root": "/srv"}}), json!({"home": "/srv"})),
            json!({"home": "/srv"})
        );
    }
}
