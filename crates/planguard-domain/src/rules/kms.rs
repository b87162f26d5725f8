use super::Rule;
use super::predicate::{Decision, at, is_true};
use crate::model::{Resource, Value};
use planguard_types::ids;

pub fn rules() -> Vec<Rule> {
    vec![
        Rule::attribute(
            ids::RULE_KMS_KEY_ROTATION,
            ids::CODE_ROTATION_DISABLED,
            "aws_kms_key",
            None,
            |key, _| {
                symmetric(key).unwrap_or_else(|| {
                    at(key.attr("enable_key_rotation"), |v| {
                        is_true(v, Decision::Violation)
                    })
                })
            },
            |_, id, _| format!("KMS key '{id}' does not have automatic rotation enabled"),
        )
        .with_control("CIS AWS 3.8")
        .with_help("Set enable_key_rotation = true on symmetric keys."),
    ]
}

/// Rotation only exists for symmetric keys. `None` means the key is symmetric (or the spec is
/// unset, which defaults to symmetric).
fn symmetric(key: &Resource) -> Option<Decision> {
    ["key_spec", "customer_master_key_spec"]
        .into_iter()
        .find_map(|attr| match key.attr(attr) {
            Ok(Value::String(spec)) if spec != "SYMMETRIC_DEFAULT" => {
                Some(Decision::NotApplicable)
            }
            Ok(Value::Unknown) => Some(Decision::Unverifiable),
            _ => None,
        })
}
