//! Lenient deserialization helpers.
//!
//! Workflow payloads are produced by many frontends and are frequently
//! inconsistent. These helpers absorb shape mismatches at the field level so
//! that one bad field or element never rejects the surrounding document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes a field into `Some(T)`, degrading to `None` when the value
/// does not match the expected shape.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Deserializes an array field element-by-element, skipping elements that do
/// not match the expected shape. Non-array values yield an empty sequence.
pub(crate) fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "lenient")]
        tag: Option<String>,
        #[serde(default, deserialize_with = "lenient_seq")]
        items: Vec<u32>,
    }

    #[test]
    fn test_lenient_absorbs_wrong_types() {
        let holder: Holder = serde_json::from_value(json!({"tag": ["x"]})).unwrap();
        assert_eq!(holder.tag, None);
    }

    #[test]
    fn test_lenient_passes_matching_values() {
        let holder: Holder = serde_json::from_value(json!({"tag": "x"})).unwrap();
        assert_eq!(holder.tag.as_deref(), Some("x"));
    }

    #[test]
    fn test_lenient_seq_skips_bad_elements() {
        let holder: Holder = serde_json::from_value(json!({"items": [1, "two", 3]})).unwrap();
        assert_eq!(holder.items, vec![1, 3]);
    }

    #[test]
    fn test_lenient_seq_non_array_is_empty() {
        let holder: Holder = serde_json::from_value(json!({"items": "nope"})).unwrap();
        assert!(holder.items.is_empty());
    }
}
