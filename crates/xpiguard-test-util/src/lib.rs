//! Shared test utilities for the xpiguard workspace.
//!
//! This crate exists because `xtask` needs `normalize_nondeterministic` at
//! runtime (not behind `#[cfg(test)]`), so a `#[cfg(test)]` module inside
//! `xpiguard-types` would not suffice.

use serde_json::Value;

const TIMESTAMP_KEYS: &[&str] = &["started_at", "finished_at"];

/// Normalize non-deterministic JSON fields of a report for golden comparison.
///
/// Only the root envelope is touched: `tool.version` becomes `"__VERSION__"` and the two
/// timestamps become `"__TIMESTAMP__"`. The root counts as an envelope when it has
/// `schema`, `tool`, `started_at`, `finished_at`, `verdict` and `findings`. Finding `data`
/// payloads are left alone even when they reuse those key names.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    let Some(obj) = value.as_object_mut() else {
        return value;
    };
    let is_envelope = ["schema", "tool", "verdict", "findings"]
        .iter()
        .chain(TIMESTAMP_KEYS)
        .all(|k| obj.contains_key(*k));
    if !is_envelope {
        return value;
    }

    if let Some(tool) = obj.get_mut("tool")
        && let Some(tool_obj) = tool.as_object_mut()
        && tool_obj.contains_key("version")
    {
        tool_obj.insert(
            "version".to_string(),
            Value::String("__VERSION__".to_string()),
        );
    }
    for key in TIMESTAMP_KEYS {
        obj.insert(key.to_string(), Value::String("__TIMESTAMP__".to_string()));
    }
    value
}
