//! Canonical string rendering and content hashing
//!
//! Two values that only differ in key order or array order render to the
//! same string, which makes the hash usable as a content identity.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::{PolicyError, Result};

const SEPARATOR: char = '#';

/// Render `value` into its canonical string, skipping `excluded_keys`
///
/// Excluded keys are dropped at every nesting level. Only objects and
/// arrays can be rendered at the top level.
pub fn stringify<T: Serialize + ?Sized>(value: &T, excluded_keys: &[&str]) -> Result<String> {
    let tree = serde_json::to_value(value).map_err(|e| PolicyError::stringify(e.to_string()))?;
    match tree {
        Value::Object(_) | Value::Array(_) => Ok(render(&tree, excluded_keys)),
        other => Err(PolicyError::stringify(format!(
            "expected an object or an array, found {}",
            other
        ))),
    }
}

/// Hash the canonical string of `value`
pub fn content_hash<T: Serialize + ?Sized>(value: &T, excluded_keys: &[&str]) -> Result<String> {
    stringify(value, excluded_keys).map(|rendered| string_hash(&rendered))
}

/// Lowercase hex SHA-256 of `value`
pub fn string_hash(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

fn render(value: &Value, excluded_keys: &[&str]) -> String {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map
                .keys()
                .filter(|key| !excluded_keys.contains(&key.as_str()))
                .collect();
            keys.sort();
            let mut out = String::new();
            for key in keys {
                out.push(SEPARATOR);
                out.push_str(key);
                out.push_str(&render(&map[key.as_str()], excluded_keys));
            }
            out
        }
        Value::Array(items) => {
            let mut rendered: Vec<String> =
                items.iter().map(|item| render(item, excluded_keys)).collect();
            rendered.sort();
            let mut out = String::from(SEPARATOR);
            for item in rendered {
                out.push_str(&item);
            }
            out
        }
        Value::String(s) => format!("{}{}", SEPARATOR, s),
        scalar => format!("{}{}", SEPARATOR, scalar),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use serde_json::json;

    use super::*;

    #[test]
    fn test_empty_object_renders_empty() {
        let empty: HashMap<String, i32> = HashMap::new();
        assert_eq!(stringify(&empty, &[]).unwrap(), "");
    }

    #[test]
    fn test_object_with_integers() {
        let value = json!({"B": 2, "A": 1});
        assert_eq!(stringify(&value, &[]).unwrap(), "#A#1#B#2");
    }

    #[test]
    fn test_object_with_arrays() {
        let value = json!({
            "A": ["A1", "A2", "A3"],
            "B": ["B1", "B2", "A3"],
        });
        assert_eq!(stringify(&value, &[]).unwrap(), "#A##A1#A2#A3#B##A3#B1#B2");
        assert_eq!(stringify(&value, &["A"]).unwrap(), "#B##A3#B1#B2");
    }

    #[test]
    fn test_excluded_key_dropped_when_nested() {
        let value = json!({"outer": {"Name": "x", "Keep": true}, "Name": "y"});
        assert_eq!(stringify(&value, &["Name"]).unwrap(), "#outer#Keep#true");
    }

    #[test]
    fn test_array_order_does_not_matter() {
        let first = json!({"Actions": ["b:x", "a:y"], "Resources": ["r2", "r1"]});
        let second = json!({"Resources": ["r1", "r2"], "Actions": ["a:y", "b:x"]});
        assert_eq!(stringify(&first, &[]).unwrap(), stringify(&second, &[]).unwrap());
        assert_eq!(content_hash(&first, &[]).unwrap(), content_hash(&second, &[]).unwrap());
    }

    #[test]
    fn test_structural_difference_changes_hash() {
        let first = json!({"A": ["x"]});
        let second = json!({"A": ["x", "x"]});
        assert_ne!(content_hash(&first, &[]).unwrap(), content_hash(&second, &[]).unwrap());
    }

    #[test]
    fn test_scalar_top_level_is_rejected() {
        assert!(matches!(
            stringify("Not a valid Json", &[]),
            Err(PolicyError::Stringify(_))
        ));
        assert!(stringify(&42, &[]).is_err());
    }

    #[test]
    fn test_non_string_keys_are_rejected() {
        let mut map = BTreeMap::new();
        map.insert(vec![1u8], 1);
        assert!(matches!(stringify(&map, &[]), Err(PolicyError::Stringify(_))));
    }

    #[test]
    fn test_string_hash_is_sha256_hex() {
        assert_eq!(
            string_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(string_hash("abc").len(), 64);
    }
}
