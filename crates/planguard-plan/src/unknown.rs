//! `resource_changes[*].change.after_unknown`: a tree mirroring the planned values in which a
//! `true` leaf marks a value that is only known after apply.

use crate::error::PlanError;
use planguard_domain::model::Value;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Markers by resource address, or `None` when the document carries no `resource_changes` at all.
pub fn markers(doc: &JsonValue) -> Result<Option<BTreeMap<String, JsonValue>>, PlanError> {
    let changes = match doc.get("resource_changes") {
        None | Some(JsonValue::Null) => return Ok(None),
        Some(JsonValue::Array(items)) => items,
        Some(_) => return Err(PlanError::malformed("resource_changes", "expected an array")),
    };

    let mut out = BTreeMap::new();
    for (i, change) in changes.iter().enumerate() {
        let at = format!("resource_changes[{i}]");
        let address = match change.get("address") {
            Some(JsonValue::String(a)) => a,
            Some(_) => return Err(PlanError::malformed(format!("{at}.address"), "expected a string")),
            None => return Err(PlanError::malformed(format!("{at}.address"), "missing")),
        };
        match change.get("change").and_then(|c| c.get("after_unknown")) {
            None | Some(JsonValue::Null) => {}
            Some(marker @ (JsonValue::Object(_) | JsonValue::Bool(_))) => {
                out.insert(address.clone(), marker.clone());
            }
            Some(_) => {
                return Err(PlanError::malformed(
                    format!("{at}.change.after_unknown"),
                    "expected an object",
                ));
            }
        }
    }
    Ok(Some(out))
}

/// Marks unknown values in a resource's top-level attributes.
pub fn apply(values: &mut BTreeMap<String, Value>, marker: &JsonValue) {
    let JsonValue::Object(fields) = marker else {
        return;
    };
    for (key, m) in fields {
        if has_unknown(m) {
            mark(values.entry(key.clone()).or_default(), m);
        }
    }
}

fn mark(value: &mut Value, marker: &JsonValue) {
    if !has_unknown(marker) {
        return;
    }
    match marker {
        JsonValue::Bool(true) => *value = Value::Unknown,
        JsonValue::Object(fields) => {
            if value.is_null() {
                *value = Value::Object(BTreeMap::new());
            }
            if let Value::Object(map) = value {
                for (key, m) in fields {
                    if has_unknown(m) {
                        mark(map.entry(key.clone()).or_default(), m);
                    }
                }
            }
        }
        JsonValue::Array(items) => {
            if value.is_null() {
                *value = Value::List(Vec::new());
            }
            if let Value::List(list) = value {
                if list.len() < items.len() {
                    list.resize(items.len(), Value::Null);
                }
                for (slot, m) in list.iter_mut().zip(items) {
                    mark(slot, m);
                }
            }
        }
        _ => {}
    }
}

fn has_unknown(marker: &JsonValue) -> bool {
    match marker {
        JsonValue::Bool(b) => *b,
        JsonValue::Object(fields) => fields.values().any(has_unknown),
        JsonValue::Array(items) => items.iter().any(has_unknown),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(json: JsonValue) -> BTreeMap<String, Value> {
        match Value::from(json) {
            Value::Object(map) => map,
            _ => BTreeMap::new(),
        }
    }

    #[test]
    fn true_leaf_marks_unknown_and_creates_absent_keys() {
        let mut v = values(json!({ "bucket": null, "tags": {} }));
        apply(&mut v, &json!({ "bucket": true, "id": true, "tags": {}, "arn": false }));
        assert_eq!(v.get("bucket"), Some(&Value::Unknown));
        assert_eq!(v.get("id"), Some(&Value::Unknown));
        assert!(!v.contains_key("arn"));
        assert_eq!(v.get("tags"), Some(&Value::Object(BTreeMap::new())));
    }

    #[test]
    fn nested_lists_are_marked_by_position() {
        let mut v = values(json!({ "rule": [{ "status": "Enabled", "id": null }] }));
        apply(&mut v, &json!({ "rule": [{ "id": true }] }));
        let rule = v.get("rule").expect("rule");
        assert_eq!(rule.lookup("0.id"), Ok(&Value::Unknown));
        assert_eq!(rule.lookup("0.status"), Ok(&Value::String("Enabled".to_string())));
    }

    #[test]
    fn markers_absent_means_unavailable() {
        assert_eq!(markers(&json!({})).expect("ok"), None);
        let found = markers(&json!({ "resource_changes": [
            { "address": "aws_s3_bucket.a", "change": { "after_unknown": { "id": true } } },
            { "address": "aws_s3_bucket.b", "change": {} }
        ]}))
        .expect("ok")
        .expect("some");
        assert_eq!(found.len(), 1);
        assert!(found.contains_key("aws_s3_bucket.a"));
    }

    #[test]
    fn malformed_changes_are_rejected() {
        assert!(markers(&json!({ "resource_changes": {} })).is_err());
        assert!(markers(&json!({ "resource_changes": [{ "change": {} }] })).is_err());
    }
}
