use crate::rules::RuleSet;
use planguard_types::Severity;
use std::collections::BTreeMap;

static DEFAULT_POLICY: RulePolicy = RulePolicy {
    enabled: true,
    severity: Severity::Error,
    allow: Vec::new(),
    threshold: None,
};

#[derive(Clone, Debug, PartialEq)]
pub struct RulePolicy {
    pub enabled: bool,
    pub severity: Severity,
    /// Glob patterns over resource addresses that the rule skips.
    pub allow: Vec<String>,
    /// Numeric threshold for rules that compare against one (retention periods).
    pub threshold: Option<f64>,
}

impl RulePolicy {
    pub fn enabled(severity: Severity) -> Self {
        Self {
            enabled: true,
            severity,
            allow: Vec::new(),
            threshold: None,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            severity: Severity::Info,
            allow: Vec::new(),
            threshold: None,
        }
    }

    pub fn threshold_or(&self, default: f64) -> f64 {
        self.threshold.unwrap_or(default)
    }
}

impl Default for RulePolicy {
    fn default() -> Self {
        DEFAULT_POLICY.clone()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EffectiveConfig {
    /// Name of the rule package being evaluated.
    pub package: String,
    pub rules: BTreeMap<String, RulePolicy>,
}

impl EffectiveConfig {
    /// Every rule of the set enabled at `error` severity.
    pub fn for_rule_set(rule_set: &RuleSet) -> Self {
        Self {
            package: rule_set.name().to_string(),
            rules: rule_set
                .rules()
                .iter()
                .map(|r| (r.id.to_string(), RulePolicy::default()))
                .collect(),
        }
    }

    /// Policy for `rule_id`, or `None` when the rule is disabled. Rules without an entry run
    /// with the default policy.
    pub fn rule_policy(&self, rule_id: &str) -> Option<&RulePolicy> {
        match self.rules.get(rule_id) {
            Some(p) if p.enabled => Some(p),
            Some(_) => None,
            None => Some(&DEFAULT_POLICY),
        }
    }
}
