//! Structured-data compactor.
//!
//! Keeps the shape of a JSON document while bounding its size: long
//! strings are cut, long arrays keep a prefix plus a count, and deep
//! containers collapse to a placeholder string. Object key order is
//! preserved (`serde_json` with `preserve_order`).

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::Result;

/// Size bounds applied by [`compact_json`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct JsonLimits {
    /// Containers nested deeper than this collapse to `"{…}"` / `"[…]"`.
    /// The root container sits at depth 1.
    pub max_depth: usize,
    pub max_array_items: usize,
    /// Measured in chars, not bytes.
    pub max_string_len: usize,
}

impl Default for JsonLimits {
    fn default() -> Self {
        Self {
            max_depth: 6,
            max_array_items: 8,
            max_string_len: 120,
        }
    }
}

const ELLIPSIS: char = '…';

/// Compact a JSON document and pretty-print it.
///
/// Fails with [`crate::CondenseError::Json`] when `text` is not JSON.
pub fn compact_json(text: &str, limits: &JsonLimits) -> Result<String> {
    let value: Value = serde_json::from_str(text)?;
    let compacted = compact_value(value, 0, limits);
    Ok(serde_json::to_string_pretty(&compacted)?)
}

fn compact_value(value: Value, depth: usize, limits: &JsonLimits) -> Value {
    match value {
        Value::String(s) => Value::String(truncate(s, limits.max_string_len)),
        Value::Array(_) if depth >= limits.max_depth => Value::String(format!("[{ELLIPSIS}]")),
        Value::Object(_) if depth >= limits.max_depth => Value::String(format!("{{{ELLIPSIS}}}")),
        Value::Array(items) => {
            let total = items.len();
            let mut kept: Vec<Value> = items
                .into_iter()
                .take(limits.max_array_items)
                .map(|item| compact_value(item, depth + 1, limits))
                .collect();
            if total > kept.len() {
                kept.push(Value::String(format!("{ELLIPSIS} (+{} more)", total - kept.len())));
            }
            Value::Array(kept)
        }
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, item)| (key, compact_value(item, depth + 1, limits)))
                .collect::<Map<String, Value>>(),
        ),
        scalar => scalar,
    }
}

fn truncate(s: String, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let mut short = s[..cut].to_string();
            short.push(ELLIPSIS);
            short
        }
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CondenseError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn compact(text: &str, limits: JsonLimits) -> Value {
        let out = compact_json(text, &limits).unwrap();
        serde_json::from_str(&out).unwrap()
    }

    #[test]
    fn test_long_arrays_keep_prefix_and_count() {
        let limits = JsonLimits { max_array_items: 2, ..Default::default() };
        let value = compact(r#"{"tags": [1, 2, 3, 4, 5]}"#, limits);
        assert_eq!(value, json!({"tags": [1, 2, "… (+3 more)"]}));
    }

    #[test]
    fn test_deep_containers_collapse() {
        let limits = JsonLimits { max_depth: 2, ..Default::default() };
        let value = compact(r#"{"a": {"b": {"c": 1}, "d": [1]}, "e": [[1]]}"#, limits);
        assert_eq!(value, json!({"a": {"b": "{…}", "d": "[…]"}, "e": ["[…]"]}));
    }

    #[test]
    fn test_long_strings_truncated_by_chars() {
        let limits = JsonLimits { max_string_len: 3, ..Default::default() };
        let value = compact(r#"["abcdef", "ab", "ééééé"]"#, limits);
        assert_eq!(value, json!(["abc…", "ab", "ééé…"]));
    }

    #[test]
    fn test_key_order_preserved() {
        let out = compact_json(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#, &JsonLimits::default()).unwrap();
        assert_eq!(out, "{\n  \"zeta\": 1,\n  \"alpha\": 2,\n  \"mid\": 3\n}");
    }

    #[test]
    fn test_package_resolved_shape() {
        let text = r#"{
  "pins": [
    {"identity": "swift-log", "location": "https://github.com/apple/swift-log", "state": {"revision": "abc", "version": "1.5.3"}}
  ],
  "version": 2
}"#;
        let value = compact(text, JsonLimits::default());
        assert_eq!(value["pins"][0]["state"]["version"], json!("1.5.3"));
        assert_eq!(value["version"], json!(2));
    }

    #[test]
    fn test_not_json_is_error() {
        let err = compact_json("not: [json", &JsonLimits::default()).unwrap_err();
        assert!(matches!(err, CondenseError::Json(_)));
    }
}
