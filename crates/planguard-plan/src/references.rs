//! Reference expressions from the plan's `configuration` section. Planned values hold resolved
//! (often computed) attribute values; the configuration still says which resource an attribute
//! was wired to, e.g. `bucket = aws_s3_bucket.logs.id`.
//!
//! Expressions inside a module are relative to that module, so every reference is qualified
//! with the module path before it leaves this file.
//!
//! The section is supplementary, so shapes that do not match are skipped rather than rejected.

use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use tracing::debug;

pub type References = BTreeMap<String, Vec<String>>;

/// Per-attribute references keyed by configuration address (no instance keys).
pub fn configured(doc: &JsonValue) -> BTreeMap<String, References> {
    let mut out = BTreeMap::new();
    if let Some(root) = doc.get("configuration").and_then(|c| c.get("root_module")) {
        collect_module(root, "", &mut out);
    }
    out
}

fn collect_module(module: &JsonValue, prefix: &str, out: &mut BTreeMap<String, References>) {
    for resource in module
        .get("resources")
        .and_then(JsonValue::as_array)
        .into_iter()
        .flatten()
    {
        let Some(address) = resource.get("address").and_then(JsonValue::as_str) else {
            debug!("configuration resource without address skipped");
            continue;
        };
        let refs = attribute_references(resource, prefix);
        if !refs.is_empty() {
            out.insert(format!("{prefix}{address}"), refs);
        }
    }

    for (name, call) in module
        .get("module_calls")
        .and_then(JsonValue::as_object)
        .into_iter()
        .flatten()
    {
        if let Some(child) = call.get("module") {
            collect_module(child, &format!("{prefix}module.{name}."), out);
        }
    }
}

fn attribute_references(resource: &JsonValue, prefix: &str) -> References {
    let mut refs = References::new();
    for (attr, expr) in resource
        .get("expressions")
        .and_then(JsonValue::as_object)
        .into_iter()
        .flatten()
    {
        let found: Vec<String> = expr
            .get("references")
            .and_then(JsonValue::as_array)
            .into_iter()
            .flatten()
            .filter_map(JsonValue::as_str)
            .map(|r| format!("{prefix}{r}"))
            .collect();
        if !found.is_empty() {
            refs.insert(attr.clone(), found);
        }
    }
    refs
}
