use super::Rule;
use super::predicate::{Decision, at, at_least, is_true, non_empty};
use crate::model::{Resource, Value};
use crate::policy::RulePolicy;
use planguard_types::ids;

const DB_INSTANCE: &str = "aws_db_instance";
const DEFAULT_BACKUP_RETENTION_DAYS: f64 = 7.0;

pub fn rules() -> Vec<Rule> {
    vec![
        Rule::attribute(
            ids::RULE_DATA_RDS_ENCRYPTION,
            ids::CODE_STORAGE_UNENCRYPTED,
            DB_INSTANCE,
            Some("identifier"),
            |db, _| {
                aurora_member(db).unwrap_or_else(|| {
                    at(db.attr("storage_encrypted"), |v| is_true(v, Decision::Violation))
                })
            },
            |_, id, _| format!("RDS instance '{id}' does not have storage encryption enabled"),
        )
        .with_control("CIS AWS 2.3.1")
        .with_help("Set storage_encrypted = true (requires replacing an existing instance)."),
        Rule::attribute(
            ids::RULE_DATA_RDS_BACKUP_RETENTION,
            ids::CODE_BACKUP_RETENTION_TOO_SHORT,
            DB_INSTANCE,
            Some("identifier"),
            backup_retention,
            |db, id, policy| {
                let period = db
                    .attr("backup_retention_period")
                    .ok()
                    .and_then(Value::as_f64)
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "unset".to_string());
                format!(
                    "RDS instance '{id}' keeps automated backups for {period} days, less than the required {}",
                    policy.threshold_or(DEFAULT_BACKUP_RETENTION_DAYS)
                )
            },
        )
        .with_threshold(DEFAULT_BACKUP_RETENTION_DAYS)
        .with_help("Raise backup_retention_period to at least the required number of days."),
        Rule::attribute(
            ids::RULE_DATA_SQS_ENCRYPTION,
            ids::CODE_QUEUE_UNENCRYPTED,
            "aws_sqs_queue",
            Some("name"),
            |queue, _| {
                let managed = at(queue.attr("sqs_managed_sse_enabled"), |v| {
                    is_true(v, Decision::Violation)
                });
                let kms = at(queue.attr("kms_master_key_id"), |v| {
                    non_empty(v, Decision::Violation)
                });
                managed.or(kms)
            },
            |_, id, _| format!("SQS queue '{id}' is not encrypted at rest"),
        )
        .with_help("Set sqs_managed_sse_enabled = true or a kms_master_key_id."),
    ]
}

/// Aurora instances inherit storage and backup settings from their cluster.
fn aurora_member(db: &Resource) -> Option<Decision> {
    match db.attr("engine") {
        Ok(Value::String(engine)) if engine.starts_with("aurora") => Some(Decision::NotApplicable),
        Ok(Value::Unknown) => Some(Decision::Unverifiable),
        _ => None,
    }
}

fn backup_retention(db: &Resource, policy: &RulePolicy) -> Decision {
    if let Some(d) = aurora_member(db) {
        return d;
    }
    at(db.attr("backup_retention_period"), |v| {
        at_least(
            v,
            policy.threshold_or(DEFAULT_BACKUP_RETENTION_DAYS),
            Decision::Violation,
        )
    })
}
