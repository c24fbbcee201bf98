//! Structural deep merge of configuration documents.

use serde_yaml::{Mapping, Value};

/// Deep-merges `incoming` over `base`, returning a new mapping.
///
/// Nested mappings are merged recursively; every other value (sequences,
/// scalars and null included) in `incoming` replaces the one in `base`.
/// Keys present only in `base` are kept. Neither input is modified.
pub fn deep_merge(base: &Mapping, incoming: &Mapping) -> Mapping {
    let mut merged = base.clone();
    merge_into(&mut merged, incoming.clone());
    merged
}

fn merge_into(base: &mut Mapping, overlay: Mapping) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Mapping(base_map)), Value::Mapping(overlay_map)) => {
                merge_into(base_map, overlay_map);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
