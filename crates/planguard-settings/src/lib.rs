//! Config parsing and package/policy resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod packages;
mod resolve;

pub use model::{PlanguardConfigV1, RuleConfig, SCHEMA_CONFIG_V1};
pub use packages::default_package;
pub use resolve::{Overrides, ResolvedConfig};

/// Parse `planguard.toml` (or equivalent) into a typed model. Empty input is the default config.
pub fn parse_config_toml(input: &str) -> anyhow::Result<PlanguardConfigV1> {
    let cfg: PlanguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the rule set and effective policies used by the engine
/// (CLI overrides > config file > catalog defaults).
pub fn resolve_config(
    cfg: PlanguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}

/// JSON Schema for `planguard.toml`, for editor tooling.
pub fn config_schema() -> schemars::Schema {
    schemars::schema_for!(PlanguardConfigV1)
}
