use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SCHEMA_CONFIG_V1: &str = "planguard.config.v1";

/// `planguard.toml` schema v1.
///
/// This is a *user-facing* config model: unknown top-level keys are ignored so older binaries can
/// read newer files.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlanguardConfigV1 {
    /// Optional schema string for tooling (`planguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Rule package to evaluate (`all`, `s3`, `audit`, `data`, `compute`, `kms`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// Map of rule_id -> config.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// `info`, `warning`, or `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    /// Replaces the rule's default threshold (retention rules only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,

    /// Glob patterns over resource addresses that the rule skips.
    #[serde(default)]
    pub allow: Vec<String>,
}
