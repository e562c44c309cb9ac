//! Tolerant list-payload unwrapping.
//!
//! List endpoints have returned bare arrays, `{items: [..]}` and
//! `{results: [..]}` at various points; all three shapes are accepted.
//! Elements that fail to decode are dropped individually rather than
//! failing the whole list.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Extract a typed list from whichever wrapper the server used.
pub fn unwrap_list<T: DeserializeOwned>(value: Value) -> Vec<T> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("items").or_else(|| map.remove("results")) {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };
    items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array() {
        let list: Vec<i64> = unwrap_list(json!([1, 2, 3]));
        assert_eq!(list, vec![1, 2, 3]);
    }

    #[test]
    fn test_items_wrapper() {
        let list: Vec<i64> = unwrap_list(json!({"items": [4, 5]}));
        assert_eq!(list, vec![4, 5]);
    }

    #[test]
    fn test_results_wrapper() {
        let list: Vec<i64> = unwrap_list(json!({"results": [6]}));
        assert_eq!(list, vec![6]);
    }

    #[test]
    fn test_unknown_shape_is_empty() {
        let list: Vec<i64> = unwrap_list(json!({"count": 3}));
        assert!(list.is_empty());
        let list: Vec<i64> = unwrap_list(json!("nope"));
        assert!(list.is_empty());
    }

    #[test]
    fn test_bad_elements_dropped() {
        let list: Vec<i64> = unwrap_list(json!([1, "two", 3]));
        assert_eq!(list, vec![1, 3]);
    }
}
