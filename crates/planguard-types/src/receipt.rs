use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use time::OffsetDateTime;

/// Stable schema identifier for planguard reports.
pub const SCHEMA_REPORT_V1: &str = "planguard.report.v1";

/// Severity is metadata for consumers; it does not change the verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// The resource a violation is about.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResourceRef {
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Plan address, e.g. `aws_s3_bucket.logs` or `module.net.aws_security_group.bastion`.
    pub address: String,
    /// Value of the identifying attribute when known, otherwise the address.
    pub identity: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Violation {
    pub rule_id: String,
    pub code: String,
    pub package: String,
    pub severity: Severity,
    pub message: String,

    /// Absent for plan-wide violations (existence rules).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<ResourceRef>,

    /// Compliance-framework citation, e.g. `CIS AWS 2.1.1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    /// Stable identifier intended for dedup and trending: a hash of
    /// `rule_id + code + resource address`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    /// Rule-specific structured payload (kept open-ended for forward compatibility).
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: JsonValue,
}

/// A plan is compliant iff its violation list is empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn from_violations(violations: &[Violation]) -> Self {
        if violations.is_empty() {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}

/// Whether the plan carried `after_unknown` markers for computed values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum UnknownTracking {
    #[default]
    Available,
    /// No markers were present: computed values read as null.
    Unavailable,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Planguard-specific summary payload for the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct PlanguardData {
    pub package: String,
    pub resources_scanned: u32,
    pub rules_evaluated: u32,
    pub violations_total: u32,
    pub unknown_tracking: UnknownTracking,
}

/// A generic report envelope.
///
/// Keeping this generic allows the summary payload to evolve while the outer shape stays stable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope<TData = PlanguardData> {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    pub violations: Vec<Violation>,
    pub data: TData,
}

pub type PlanguardReport = ReportEnvelope<PlanguardData>;
