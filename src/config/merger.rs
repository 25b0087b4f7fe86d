//! Deep merge of layered YAML configuration.
//!
//! # Merge Rules
//!
//! - Mappings are merged recursively
//! - Sequences and scalars in the overlay replace the base
//! - A null in the overlay removes the key from the base

use serde_yaml::Value;

/// Merge `overlay` on top of `base`, returning a new value.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut result = base_map.clone();
            for (key, overlay_value) in overlay_map {
                if overlay_value.is_null() {
                    result.remove(key);
                } else if let Some(base_value) = base_map.get(key) {
                    result.insert(key.clone(), deep_merge(base_value, overlay_value));
                } else {
                    result.insert(key.clone(), overlay_value.clone());
                }
            }
            Value::Mapping(result)
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Merge layers in order; the last has the highest priority.
///
/// Empty files parse to null and are treated as "no changes".
pub fn merge_configs(configs: &[Value]) -> Value {
    configs
        .iter()
        .filter(|config| !config.is_null())
        .fold(Value::Mapping(Default::default()), |acc, config| {
            deep_merge(&acc, config)
        })
}
