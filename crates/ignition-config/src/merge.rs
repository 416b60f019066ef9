//! Deep merge over the tagged config value model.
//!
//! Merge rules per tag:
//!
//! - mapping ⊕ mapping → recurse per key, later wins on collision
//! - sequence ⊕ anything → replace wholesale (never concatenate)
//! - scalar ⊕ anything → replace wholesale
//!
//! Both functions are pure: no I/O, and the base is the only value mutated
//! (it is consumed-and-rebuilt semantics expressed in place).

use serde_json::{Map, Value};

/// Deep-merges `overlay` into `base`, `overlay` winning on collisions.
pub fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        // Sequences and scalars replace; an object overlaying a non-object
        // replaces as well.
        (slot, overlay) => *slot = overlay,
    }
}

/// Deep-merges an ordered sequence of layers, later layers winning.
///
/// Zero layers yield an empty mapping.
pub fn merge_all<I>(layers: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    let mut resolved = Value::Object(Map::new());
    for layer in layers {
        merge(&mut resolved, layer);
    }
    resolved
}
