//! Built-in rule packages.

use super::{RuleSet, audit, compute, data, kms, s3};
use planguard_types::ids;

/// Package names accepted by [`rule_set`], `all` first.
pub fn packages() -> &'static [&'static str] {
    &[
        ids::PACKAGE_ALL,
        ids::PACKAGE_S3,
        ids::PACKAGE_AUDIT,
        ids::PACKAGE_DATA,
        ids::PACKAGE_COMPUTE,
        ids::PACKAGE_KMS,
    ]
}

pub fn rule_set(package: &str) -> Option<RuleSet> {
    let builder = RuleSet::builder(package);
    let set = match package {
        ids::PACKAGE_ALL => builder
            .extend(s3::rules())
            .extend(audit::rules())
            .extend(data::rules())
            .extend(compute::rules())
            .extend(kms::rules()),
        ids::PACKAGE_S3 => builder.extend(s3::rules()),
        ids::PACKAGE_AUDIT => builder.extend(audit::rules()),
        ids::PACKAGE_DATA => builder.extend(data::rules()),
        ids::PACKAGE_COMPUTE => builder.extend(compute::rules()),
        ids::PACKAGE_KMS => builder.extend(kms::rules()),
        _ => return None,
    };
    Some(set.build())
}
