use anyhow::Context;
use planguard_domain::policy::EffectiveConfig;
use planguard_domain::rules::{RuleSet, catalog};
use planguard_types::ids;

pub fn default_package() -> &'static str {
    ids::PACKAGE_ALL
}

/// The catalog rule set for `package` with every rule enabled at `error` severity.
pub fn package_defaults(package: &str) -> anyhow::Result<(RuleSet, EffectiveConfig)> {
    let rule_set = catalog::rule_set(package)
        .with_context(|| {
            format!(
                "unknown package: {package} (expected one of: {})",
                catalog::packages().join(", ")
            )
        })?;
    let effective = EffectiveConfig::for_rule_set(&rule_set);
    Ok((rule_set, effective))
}
