use crate::{model::PlanguardConfigV1, packages};
use anyhow::Context;
use globset::Glob;
use planguard_domain::policy::{EffectiveConfig, RulePolicy};
use planguard_domain::rules::{RuleSet, catalog};
use planguard_types::{Severity, ids};

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub package: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub rule_set: RuleSet,
    pub effective: EffectiveConfig,
}

pub fn resolve_config(
    cfg: PlanguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let package = overrides
        .package
        .or(cfg.package)
        .unwrap_or_else(|| packages::default_package().to_string());

    let (rule_set, mut effective) = packages::package_defaults(&package)?;

    // Rule IDs are checked against every package, so one file can serve several packages.
    let known = catalog::rule_set(ids::PACKAGE_ALL).context("catalog has no `all` package")?;

    for (rule_id, rc) in cfg.rules.iter() {
        let rule = known.get(rule_id).with_context(|| format!("unknown rule: {rule_id}"))?;
        if rule_set.get(rule_id).is_none() {
            continue;
        }

        let entry = effective
            .rules
            .entry(rule_id.clone())
            .or_insert_with(RulePolicy::default);

        if let Some(enabled) = rc.enabled {
            entry.enabled = enabled;
        }
        if let Some(sev) = rc.severity.as_deref() {
            entry.severity =
                parse_severity(sev).with_context(|| format!("invalid severity for {rule_id}"))?;
        }
        if let Some(threshold) = rc.threshold {
            if rule.threshold.is_none() {
                anyhow::bail!("rule {rule_id} does not take a threshold");
            }
            if !threshold.is_finite() || threshold < 0.0 {
                anyhow::bail!("invalid threshold for {rule_id}: {threshold}");
            }
            entry.threshold = Some(threshold);
        }
        if !rc.allow.is_empty() {
            validate_allowlist(rule_id, &rc.allow)?;
            entry.allow = rc.allow.clone();
        }
    }

    Ok(ResolvedConfig {
        rule_set,
        effective,
    })
}

fn validate_allowlist(rule_id: &str, patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        Glob::new(pattern)
            .with_context(|| format!("invalid allow glob for {rule_id}: {pattern}"))?;
    }
    Ok(())
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    match v {
        "info" => Ok(Severity::Info),
        "warning" | "warn" => Ok(Severity::Warning),
        "error" => Ok(Severity::Error),
        other => anyhow::bail!("unknown severity: {other} (expected info|warning|error)"),
    }
}
