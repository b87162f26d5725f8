//! The `check` use case: read a plan, evaluate the selected package, and produce a report.

use anyhow::Context;
use camino::Utf8Path;
use planguard_settings::{Overrides, ResolvedConfig};
use planguard_types::{PlanguardReport, ReportEnvelope, SCHEMA_REPORT_V1, ToolMeta, Verdict};
use time::OffsetDateTime;

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Serialized plan (`terraform show -json` output).
    pub plan_path: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: PlanguardReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the check use case: parse config, read the plan, evaluate, produce report.
///
/// Configuration is resolved before the plan is read, so a bad config fails fast. A malformed
/// plan aborts with no report.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    let cfg = if input.config_text.trim().is_empty() {
        planguard_settings::PlanguardConfigV1::default()
    } else {
        planguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved = planguard_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;

    let plan = planguard_plan::read_plan(input.plan_path).context("read plan")?;

    let planguard_domain::report::DomainReport {
        verdict,
        violations,
        data,
    } = planguard_domain::evaluate_with(&plan, &resolved.rule_set, &resolved.effective);

    let report = ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "planguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict,
        violations,
        data,
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
    })
}

/// Map verdict to exit code: 0 = pass, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Fail => 2,
    }
}
