use anyhow::Context;
use planguard_render::{
    RenderableData, RenderableReport, RenderableSeverity, RenderableVerdict, RenderableViolation,
};
use planguard_types::{
    PlanguardReport, SCHEMA_REPORT_V1, Severity, UnknownTracking, Verdict, Violation,
};

pub fn parse_report_json(text: &str) -> anyhow::Result<PlanguardReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema:?} (expected {SCHEMA_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse planguard report")
}

pub fn serialize_report(report: &PlanguardReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(report: &PlanguardReport) -> RenderableReport {
    RenderableReport {
        verdict: match report.verdict {
            Verdict::Pass => RenderableVerdict::Pass,
            Verdict::Fail => RenderableVerdict::Fail,
        },
        violations: report.violations.iter().map(renderable_violation).collect(),
        data: RenderableData {
            package: report.data.package.clone(),
            resources_scanned: report.data.resources_scanned,
            rules_evaluated: report.data.rules_evaluated,
            violations_total: report.data.violations_total,
            unknown_tracking_degraded: report.data.unknown_tracking
                == UnknownTracking::Unavailable,
        },
    }
}

fn renderable_violation(v: &Violation) -> RenderableViolation {
    RenderableViolation {
        severity: match v.severity {
            Severity::Info => RenderableSeverity::Info,
            Severity::Warning => RenderableSeverity::Warning,
            Severity::Error => RenderableSeverity::Error,
        },
        rule_id: v.rule_id.clone(),
        code: v.code.clone(),
        message: v.message.clone(),
        address: v.resource.as_ref().map(|r| r.address.clone()),
        control: v.control.clone(),
        help: v.help.clone(),
    }
}
