//! Merge primitives for JSON configuration trees.
//!
//! Two strategies are provided:
//!
//! - [`fill_missing`]: supplies keys absent from the target, never touching
//!   values that are already present (including `null`, `false` and `0`).
//!   Used to layer stock defaults under user configuration.
//! - [`deep_merge`]: builds a new tree where the overlay wins, with objects
//!   merged recursively and arrays replaced wholesale. Nothing in verso
//!   itself layers trees this way; it is exported for hosts that combine a
//!   resolved configuration with their own overrides.

use serde_json::{Map, Value};

/// Keys that are never copied by [`fill_missing`].
const FORBIDDEN_KEYS: [&str; 3] = ["__proto__", "constructor", "prototype"];

/// Fill keys that `target` lacks from `source`, recursively.
///
/// Rules:
/// - Key absent in `target`: copied from `source`.
/// - Both values are objects: recurse.
/// - Anything else: `target` keeps its value.
///
/// Keys named `__proto__`, `constructor` or `prototype` are skipped. If
/// either side is not an object, `target` is left untouched.
///
/// Returns `target` for chaining.
pub fn fill_missing<'a>(target: &'a mut Value, source: &Value) -> &'a mut Value {
    if let (Value::Object(target_map), Value::Object(source_map)) = (&mut *target, source) {
        fill_missing_map(target_map, source_map);
    }
    target
}

fn fill_missing_map(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, source_value) in source {
        if FORBIDDEN_KEYS.contains(&key.as_str()) {
            continue;
        }
        match target.get_mut(key) {
            None => {
                target.insert(key.clone(), source_value.clone());
            }
            Some(Value::Object(target_child)) => {
                if let Value::Object(source_child) = source_value {
                    fill_missing_map(target_child, source_child);
                }
            }
            Some(_) => {}
        }
    }
}

/// Deep-merge `overlay` on top of `base`, returning a new value.
///
/// - Objects are merged key-by-key (overlay keys override base keys).
/// - Arrays and scalars in `overlay` replace the base value entirely.
/// - Keys in `base` that are not in `overlay` are preserved.
///
/// Neither input is modified.
#[must_use]
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, overlay_value) in overlay_map {
                let value = match base_map.get(key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value.clone(),
                };
                merged.insert(key.clone(), value);
            }
            Value::Object(merged)
        }
        (_, overlay) => overlay.clone(),
    }
}
