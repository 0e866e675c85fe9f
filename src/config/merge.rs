//! Configuration merge logic
//!
//! Two merge policies live here:
//! - [`deep_merge`]: objects merge by key, arrays and scalars are replaced.
//!   Used for option overlays and for layering existing config files.
//! - [`merge_fragment`]: step fragments accumulate, so `files` lists from
//!   successive blocks are concatenated instead of replaced.
//!
//! [`write_generated`] applies a freshly computed set of `generated` entries
//! to a caller-owned config without touching any other key.

use serde_json::{Map, Value};

/// Key under a step that holds computed configuration.
pub const GENERATED_KEY: &str = "generated";

/// Key of the file list inside a fragment.
pub const FILES_KEY: &str = "files";

/// Output configuration: step name -> step configuration.
pub type OutputConfig = Map<String, Value>;

/// Deep merge two JSON values.
///
/// Merge semantics:
/// - Objects: deep-merge by key (recursive)
/// - Arrays: REPLACE (second wins entirely)
/// - Scalars: override (second wins)
/// - Null: override (null can override any value)
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = if let Some(base_value) = base_map.remove(&key) {
                    deep_merge(base_value, overlay_value)
                } else {
                    overlay_value
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }

        (Value::Array(_), overlay @ Value::Array(_)) => overlay,

        (_, overlay) => overlay,
    }
}

/// Merge multiple config layers in order (first is base, last has highest precedence)
pub fn merge_layers(layers: Vec<Value>) -> Value {
    layers.into_iter().fold(Value::Null, deep_merge)
}

/// Merge one step fragment into the step's accumulated `generated` mapping.
///
/// `files` arrays are appended in call order; every other key follows
/// [`deep_merge`].
pub fn merge_fragment(generated: &mut Map<String, Value>, fragment: Map<String, Value>) {
    for (key, value) in fragment {
        let merged = match (key.as_str(), generated.remove(&key), value) {
            (FILES_KEY, Some(Value::Array(mut existing)), Value::Array(more)) => {
                existing.extend(more);
                Value::Array(existing)
            }
            (_, Some(existing), value) => deep_merge(existing, value),
            (_, None, value) => value,
        };
        generated.insert(key, merged);
    }
}

/// Write each step's `generated` entry into `config`.
///
/// `generated` is replaced wholesale; sibling keys under the step and
/// unrelated steps are left untouched. A step entry that is not an object is
/// replaced by one.
pub fn write_generated(config: &mut OutputConfig, generated: Map<String, Value>) {
    for (step, value) in generated {
        let entry = config
            .entry(step)
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(step_config) = entry {
            step_config.insert(GENERATED_KEY.to_string(), value);
        }
    }
}
