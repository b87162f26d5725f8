use crate::fingerprint::fingerprint_for_violation;
use crate::model::{Plan, Resource};
use crate::policy::{EffectiveConfig, RulePolicy};
use crate::report::DomainReport;
use crate::rules::{Rule, RuleSet, RuleShape, linkage};
use globset::{Glob, GlobSet, GlobSetBuilder};
use planguard_types::{ResourceRef, Violation, ids};
use serde_json::{Map, Value as JsonValue, json};
use tracing::debug;

/// Fingerprint subject for violations that are about the plan as a whole.
const PLAN_SUBJECT: &str = "<plan>";

/// Every rule of `rule_set` under its default policy.
pub fn evaluate(plan: &Plan, rule_set: &RuleSet) -> Vec<Violation> {
    evaluate_with(plan, rule_set, &EffectiveConfig::for_rule_set(rule_set)).violations
}

/// Violations come out in rule declaration order, then plan resource order. Nothing is sorted or
/// truncated.
pub fn evaluate_with(plan: &Plan, rule_set: &RuleSet, cfg: &EffectiveConfig) -> DomainReport {
    let mut violations: Vec<Violation> = Vec::new();
    let mut rules_evaluated = 0u32;

    for rule in rule_set.rules() {
        let Some(policy) = cfg.rule_policy(rule.id) else {
            debug!(rule = rule.id, "rule disabled");
            continue;
        };
        rules_evaluated += 1;

        let before = violations.len();
        run_rule(plan, rule, policy, &mut violations);
        debug!(
            rule = rule.id,
            shape = rule.shape.kind(),
            violations = violations.len() - before,
            "rule evaluated"
        );
    }

    DomainReport::new(plan, rule_set.name(), rules_evaluated, violations)
}

fn run_rule(plan: &Plan, rule: &Rule, policy: &RulePolicy, out: &mut Vec<Violation>) {
    match rule.shape {
        RuleShape::Existence {
            resource_type,
            message,
        } => {
            if plan.count_of_type(resource_type) == 0 {
                out.push(violation(
                    rule,
                    policy,
                    message.to_string(),
                    None,
                    json!({ "type": resource_type }),
                ));
            }
        }
        RuleShape::Attribute {
            resource_type,
            identity_key,
            predicate,
            message,
        } => {
            let allow = build_allowlist(&policy.allow);
            for resource in plan.of_type(resource_type) {
                if is_allowed(allow.as_ref(), rule, resource) {
                    continue;
                }
                if predicate(resource, policy).is_violation() {
                    let identity = resource.display_identity(identity_key);
                    let text = message(resource, &identity, policy);
                    let data = resource_data(rule, policy, resource, None);
                    out.push(violation(
                        rule,
                        policy,
                        text,
                        Some(resource_ref(resource, identity)),
                        data,
                    ));
                }
            }
        }
        RuleShape::Linked {
            link,
            inline,
            companion,
            message,
        } => {
            let allow = build_allowlist(&policy.allow);
            for primary in plan.of_type(link.primary_type) {
                if is_allowed(allow.as_ref(), rule, primary) {
                    continue;
                }
                let decision = linkage::decide(plan, &link, primary, inline, companion, policy);
                if decision.is_violation() {
                    let identity = primary.display_identity(Some(link.primary_key));
                    let text = message(primary, &identity, policy);
                    let data = resource_data(rule, policy, primary, Some(link.companion_type));
                    out.push(violation(
                        rule,
                        policy,
                        text,
                        Some(resource_ref(primary, identity)),
                        data,
                    ));
                }
            }
        }
    }
}

fn violation(
    rule: &Rule,
    policy: &RulePolicy,
    message: String,
    resource: Option<ResourceRef>,
    data: JsonValue,
) -> Violation {
    let subject = resource
        .as_ref()
        .map(|r| r.address.as_str())
        .unwrap_or(PLAN_SUBJECT);
    let fingerprint = fingerprint_for_violation(rule.id, rule.code, subject);
    let message = match rule.control {
        Some(control) => format!("{message} ({control})"),
        None => message,
    };

    Violation {
        rule_id: rule.id.to_string(),
        code: rule.code.to_string(),
        package: ids::package_of(rule.id).to_string(),
        severity: policy.severity,
        message,
        resource,
        control: rule.control.map(str::to_string),
        help: rule.help.map(str::to_string),
        fingerprint: Some(fingerprint),
        data,
    }
}

fn resource_ref(resource: &Resource, identity: String) -> ResourceRef {
    ResourceRef {
        resource_type: resource.resource_type.clone(),
        address: resource.address.clone(),
        identity,
    }
}

fn resource_data(
    rule: &Rule,
    policy: &RulePolicy,
    resource: &Resource,
    companion_type: Option<&str>,
) -> JsonValue {
    let mut obj = Map::new();
    obj.insert("address".into(), json!(resource.address));
    obj.insert("type".into(), json!(resource.resource_type));
    if let Some(companion) = companion_type {
        obj.insert("companion_type".into(), json!(companion));
    }
    if let Some(default) = rule.threshold {
        obj.insert("threshold".into(), json!(policy.threshold_or(default)));
    }
    JsonValue::Object(obj)
}

/// Patterns are validated when settings are resolved; anything that slips through is ignored.
fn build_allowlist(allow: &[String]) -> Option<GlobSet> {
    if allow.is_empty() {
        return None;
    }

    let mut builder = GlobSetBuilder::new();
    for glob in allow.iter().filter_map(|p| Glob::new(p).ok()) {
        builder.add(glob);
    }
    builder.build().ok()
}

fn is_allowed(allow: Option<&GlobSet>, rule: &Rule, resource: &Resource) -> bool {
    let allowed = allow.is_some_and(|set| set.is_match(&resource.address));
    if allowed {
        debug!(rule = rule.id, address = %resource.address, "resource allowlisted");
    }
    allowed
}
