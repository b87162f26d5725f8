//! The `rules` use case: describe the rules of a package.

use anyhow::Context;
use planguard_domain::rules::{Rule, catalog};

#[derive(Clone, Debug, PartialEq)]
pub struct RuleSummary {
    pub id: &'static str,
    pub code: &'static str,
    /// `existence`, `attribute` or `linked`.
    pub shape: &'static str,
    pub resource_type: &'static str,
    /// Set for linked rules only.
    pub companion_type: Option<&'static str>,
    pub control: Option<&'static str>,
    pub threshold: Option<f64>,
}

/// Rules of `package` in evaluation order.
pub fn list_rules(package: &str) -> anyhow::Result<Vec<RuleSummary>> {
    let rule_set = catalog::rule_set(package).with_context(|| {
        format!(
            "unknown package: {package} (expected one of: {})",
            catalog::packages().join(", ")
        )
    })?;

    Ok(rule_set.rules().iter().map(summarize).collect())
}

pub(crate) fn summarize(rule: &Rule) -> RuleSummary {
    RuleSummary {
        id: rule.id,
        code: rule.code,
        shape: rule.shape.kind(),
        resource_type: rule.shape.resource_type(),
        companion_type: rule.shape.companion_type(),
        control: rule.control,
        threshold: rule.threshold,
    }
}

/// One line per rule: `id  shape  resource_type  control [threshold]`.
pub fn format_rules(rules: &[RuleSummary]) -> Vec<String> {
    let width = rules.iter().map(|r| r.id.len()).max().unwrap_or(0);
    rules
        .iter()
        .map(|r| {
            let mut line = format!(
                "{:<width$}  {:<9}  {}  {}",
                r.id,
                r.shape,
                r.resource_type,
                r.control.unwrap_or("-"),
            );
            if let Some(t) = r.threshold {
                line.push_str(&format!("  [threshold {t}]"));
            }
            line
        })
        .collect()
}
