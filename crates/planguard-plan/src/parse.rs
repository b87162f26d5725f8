use crate::error::PlanError;
use planguard_domain::model::{Resource, ResourceMode, Value};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;

type JsonObject = Map<String, JsonValue>;

/// Resources from `planned_values.root_module`, then its `child_modules` depth-first.
pub fn planned_resources(doc: &JsonValue) -> Result<Vec<Resource>, PlanError> {
    let root = doc
        .as_object()
        .ok_or_else(|| PlanError::malformed("(document)", "expected a JSON object"))?;
    let planned = required_object(root, "planned_values", "planned_values")?;
    let module = required_object(planned, "root_module", "planned_values.root_module")?;

    let mut out = Vec::new();
    collect_module(module, "planned_values.root_module", &mut out)?;
    Ok(out)
}

fn collect_module(module: &JsonObject, at: &str, out: &mut Vec<Resource>) -> Result<(), PlanError> {
    for (i, entry) in optional_array(module, "resources", at)?.iter().enumerate() {
        out.push(parse_resource(entry, &format!("{at}.resources[{i}]"))?);
    }

    for (i, child) in optional_array(module, "child_modules", at)?.iter().enumerate() {
        let child_at = format!("{at}.child_modules[{i}]");
        let child = child
            .as_object()
            .ok_or_else(|| PlanError::malformed(&child_at, "expected an object"))?;
        collect_module(child, &child_at, out)?;
    }
    Ok(())
}

fn parse_resource(entry: &JsonValue, at: &str) -> Result<Resource, PlanError> {
    let obj = entry
        .as_object()
        .ok_or_else(|| PlanError::malformed(at, "expected an object"))?;

    let resource_type = match obj.get("type") {
        Some(JsonValue::String(t)) if !t.is_empty() => t.as_str(),
        Some(JsonValue::String(_)) => {
            return Err(PlanError::malformed(format!("{at}.type"), "empty resource type"));
        }
        Some(_) => return Err(PlanError::malformed(format!("{at}.type"), "expected a string")),
        None => return Err(PlanError::malformed(format!("{at}.type"), "missing")),
    };

    let mode = match optional_string(obj, "mode", at)? {
        None | Some("managed") => ResourceMode::Managed,
        Some("data") => ResourceMode::Data,
        Some(other) => {
            return Err(PlanError::malformed(
                format!("{at}.mode"),
                format!("unknown mode `{other}`"),
            ));
        }
    };

    let address = optional_string(obj, "address", at)?;
    let name = match optional_string(obj, "name", at)? {
        Some(name) => name.to_string(),
        None => address.map(name_from_address).unwrap_or_default(),
    };

    let values: BTreeMap<String, Value> = match obj.get("values") {
        None | Some(JsonValue::Null) => BTreeMap::new(),
        Some(JsonValue::Object(map)) => map
            .iter()
            .map(|(k, v)| (k.clone(), Value::from(v.clone())))
            .collect(),
        Some(_) => {
            return Err(PlanError::malformed(format!("{at}.values"), "expected an object"));
        }
    };

    let mut resource = Resource::new(resource_type, &name, values);
    resource.mode = mode;
    if let Some(address) = address {
        resource.address = address.to_string();
    } else if name.is_empty() {
        resource.address = resource_type.to_string();
    }
    Ok(resource)
}

/// `module.net.aws_security_group.ssh["a"]` -> `ssh`
fn name_from_address(address: &str) -> String {
    let base = address.split('[').next().unwrap_or(address);
    base.rsplit('.').next().unwrap_or(base).to_string()
}

fn required_object<'a>(
    obj: &'a JsonObject,
    key: &str,
    at: &str,
) -> Result<&'a JsonObject, PlanError> {
    match obj.get(key) {
        Some(JsonValue::Object(map)) => Ok(map),
        Some(_) => Err(PlanError::malformed(at, "expected an object")),
        None => Err(PlanError::malformed(at, "missing")),
    }
}

/// Absent and `null` both read as an empty array.
fn optional_array<'a>(
    obj: &'a JsonObject,
    key: &str,
    at: &str,
) -> Result<&'a [JsonValue], PlanError> {
    match obj.get(key) {
        None | Some(JsonValue::Null) => Ok(&[]),
        Some(JsonValue::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(PlanError::malformed(format!("{at}.{key}"), "expected an array")),
    }
}

fn optional_string<'a>(
    obj: &'a JsonObject,
    key: &str,
    at: &str,
) -> Result<Option<&'a str>, PlanError> {
    match obj.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(PlanError::malformed(format!("{at}.{key}"), "expected a string")),
    }
}
