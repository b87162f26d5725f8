use crate::model::{Plan, Resource, Value};
use crate::policy::{EffectiveConfig, RulePolicy};
use crate::rules::RuleSet;
use planguard_types::Severity;
use std::collections::BTreeMap;

/// Marker string that the builders turn into [`Value::Unknown`], mirroring how plans print
/// computed values.
pub const UNKNOWN: &str = "(known after apply)";

pub fn value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::String(s) if s == UNKNOWN => Value::Unknown,
        serde_json::Value::Array(items) => Value::List(items.into_iter().map(value).collect()),
        serde_json::Value::Object(map) => {
            Value::Object(map.into_iter().map(|(k, v)| (k, value(v))).collect())
        }
        other => Value::from(other),
    }
}

/// A resource addressed `{type}.{name}` whose values come from a JSON object literal.
pub fn resource(resource_type: &str, name: &str, values: serde_json::Value) -> Resource {
    let values: BTreeMap<String, Value> = match value(values) {
        Value::Object(map) => map,
        _ => BTreeMap::new(),
    };
    Resource::new(resource_type, name, values)
}

pub fn plan(resources: Vec<Resource>) -> Plan {
    Plan::new(resources)
}

pub fn config_with_rule(rule_set: &RuleSet, rule_id: &str, severity: Severity) -> EffectiveConfig {
    let mut cfg = EffectiveConfig::for_rule_set(rule_set);
    cfg.rules
        .insert(rule_id.to_string(), RulePolicy::enabled(severity));
    cfg
}
