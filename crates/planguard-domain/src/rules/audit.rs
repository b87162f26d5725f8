use super::Rule;
use super::predicate::{Decision, at, at_least, is_true};
use crate::model::{Resource, Value};
use crate::policy::RulePolicy;
use planguard_types::ids;

const TRAIL: &str = "aws_cloudtrail";
const LOG_GROUP: &str = "aws_cloudwatch_log_group";
const DEFAULT_LOG_RETENTION_DAYS: f64 = 365.0;

pub fn rules() -> Vec<Rule> {
    vec![
        Rule::existence(
            ids::RULE_AUDIT_CLOUDTRAIL_PRESENT,
            ids::CODE_TRAIL_MISSING,
            TRAIL,
            "no CloudTrail trail is defined in the plan",
        )
        .with_control("CIS AWS 3.1")
        .with_help("Add an aws_cloudtrail with is_multi_region_trail = true."),
        Rule::attribute(
            ids::RULE_AUDIT_CLOUDTRAIL_MULTI_REGION,
            ids::CODE_TRAIL_SINGLE_REGION,
            TRAIL,
            Some("name"),
            |trail, _| {
                at(trail.attr("is_multi_region_trail"), |v| {
                    is_true(v, Decision::Violation)
                })
            },
            |_, id, _| format!("CloudTrail trail '{id}' is not enabled in all regions"),
        )
        .with_control("CIS AWS 3.1")
        .with_help("Set is_multi_region_trail = true."),
        Rule::attribute(
            ids::RULE_AUDIT_CLOUDTRAIL_LOG_VALIDATION,
            ids::CODE_LOG_VALIDATION_DISABLED,
            TRAIL,
            Some("name"),
            |trail, _| {
                at(trail.attr("enable_log_file_validation"), |v| {
                    is_true(v, Decision::Violation)
                })
            },
            |_, id, _| format!("CloudTrail trail '{id}' does not have log file validation enabled"),
        )
        .with_control("CIS AWS 3.2")
        .with_help("Set enable_log_file_validation = true."),
        Rule::existence(
            ids::RULE_AUDIT_CONFIG_RECORDER_PRESENT,
            ids::CODE_CONFIG_RECORDER_MISSING,
            "aws_config_configuration_recorder",
            "no AWS Config configuration recorder is defined in the plan",
        )
        .with_control("CIS AWS 3.5")
        .with_help("Add an aws_config_configuration_recorder recording all supported resources."),
        Rule::attribute(
            ids::RULE_AUDIT_LOG_GROUP_RETENTION,
            ids::CODE_RETENTION_TOO_SHORT,
            LOG_GROUP,
            Some("name"),
            log_retention,
            |group, id, policy| {
                format!(
                    "CloudWatch log group '{id}' retains logs for {} days, less than the required {}",
                    retention_days(group),
                    policy.threshold_or(DEFAULT_LOG_RETENTION_DAYS)
                )
            },
        )
        .with_threshold(DEFAULT_LOG_RETENTION_DAYS)
        .with_help("Raise retention_in_days, or set it to 0 to keep logs indefinitely."),
    ]
}

/// `0` and unset both mean "never expire".
fn log_retention(group: &Resource, policy: &RulePolicy) -> Decision {
    at(group.attr("retention_in_days"), |v| match v {
        Value::Number(days) if *days == 0.0 => Decision::Compliant,
        other => at_least(
            other,
            policy.threshold_or(DEFAULT_LOG_RETENTION_DAYS),
            Decision::Compliant,
        ),
    })
}

fn retention_days(group: &Resource) -> String {
    group
        .attr("retention_in_days")
        .ok()
        .and_then(Value::as_f64)
        .map(|d| d.to_string())
        .unwrap_or_else(|| "?".to_string())
}
