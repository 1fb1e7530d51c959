//! Dot-path addressing and deep merge over generic JSON trees.
//!
//! Parameter documents are arbitrary nested JSON, so field access is done
//! with a small recursive walker rather than typed structs. Arrays are
//! traversed through their first element, which matches how submissions
//! carry a list of rule items sharing one target.

use serde_json::Value;

/// Resolve a dot-separated path through a JSON tree.
///
/// Object nodes are descended by key. When an array is encountered
/// mid-path, navigation continues through its first element; an empty
/// array ends the walk. Returns `None` when any segment is missing.
pub fn value_at_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for part in path.split('.') {
        match current {
            Value::Object(map) => {
                current = map.get(part)?;
            }
            Value::Array(items) => {
                let first = items.first()?;
                current = first.as_object()?.get(part)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

/// Resolve a dot-separated path to a string value.
///
/// Non-string leaves resolve to `None`; uniqueness filters only match on
/// string fields.
pub fn string_at_path<'a>(root: &'a Value, path: &str) -> Option<&'a str> {
    value_at_path(root, path).and_then(Value::as_str)
}

/// Recursively merge `updates` into `existing`.
///
/// Object fields merge key-by-key; arrays and scalars are replaced
/// wholesale. Used for partial rule updates where the caller sends only
/// the fields that changed.
pub fn deep_merge(existing: &mut Value, updates: Value) {
    match updates {
        Value::Object(overlay) => {
            if let Value::Object(base) = existing {
                for (key, value) in overlay {
                    if value.is_object() {
                        if let Some(slot) = base.get_mut(&key) {
                            if slot.is_object() {
                                deep_merge(slot, value);
                                continue;
                            }
                        }
                    }
                    base.insert(key, value);
                }
            } else {
                *existing = Value::Object(overlay);
            }
        }
        other => *existing = other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_through_objects() {
        let doc = json!({"target": {"namespace": "backend", "workload": "api"}});
        assert_eq!(string_at_path(&doc, "target.namespace"), Some("backend"));
        assert_eq!(string_at_path(&doc, "target.missing"), None);
    }

    #[test]
    fn path_descends_into_first_array_element() {
        let doc = json!({"rules": [{"rule_type": "cpu"}, {"rule_type": "ram"}]});
        assert_eq!(string_at_path(&doc, "rules.rule_type"), Some("cpu"));
    }

    #[test]
    fn empty_array_ends_walk() {
        let doc = json!({"rules": []});
        assert_eq!(value_at_path(&doc, "rules.rule_type"), None);
    }

    #[test]
    fn non_string_leaf_is_not_a_string() {
        let doc = json!({"rule": {"threshold": 0.9}});
        assert_eq!(string_at_path(&doc, "rule.threshold"), None);
        assert!(value_at_path(&doc, "rule.threshold").is_some());
    }

    #[test]
    fn scalar_mid_path_fails() {
        let doc = json!({"target": "not-an-object"});
        assert_eq!(value_at_path(&doc, "target.namespace"), None);
    }

    #[test]
    fn merge_nested_objects() {
        let mut existing = json!({
            "target": {"namespace": "ns1", "workload": "api"},
            "common": {"severity": "warning"}
        });
        deep_merge(
            &mut existing,
            json!({"target": {"namespace": "ns2"}, "extra": true}),
        );

        assert_eq!(existing["target"]["namespace"], "ns2");
        assert_eq!(existing["target"]["workload"], "api");
        assert_eq!(existing["common"]["severity"], "warning");
        assert_eq!(existing["extra"], true);
    }

    #[test]
    fn merge_replaces_arrays_wholesale() {
        let mut existing = json!({"rules": [{"rule_type": "cpu"}, {"rule_type": "ram"}]});
        deep_merge(&mut existing, json!({"rules": [{"rule_type": "disk"}]}));

        let rules = existing["rules"].as_array().unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0]["rule_type"], "disk");
    }

    #[test]
    fn merge_replaces_scalar_with_object() {
        let mut existing = json!({"field": "scalar"});
        deep_merge(&mut existing, json!({"field": {"nested": 1}}));
        assert_eq!(existing["field"]["nested"], 1);
    }
}
