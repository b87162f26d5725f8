//! S3 buckets. Every bucket setting here has two representations: an inline block on
//! `aws_s3_bucket` (older providers) and a standalone companion resource keyed by `bucket`.

use super::Rule;
use super::linkage::LinkSpec;
use super::predicate::{Decision, all_of, any_element, at, is_true, non_empty, string_in};
use crate::model::{Resource, Value};
use crate::policy::RulePolicy;
use planguard_types::ids;

const BUCKET: &str = "aws_s3_bucket";
const SSE_ALGORITHMS: &[&str] = &["AES256", "aws:kms", "aws:kms:dsse"];

const ENCRYPTION: LinkSpec = companion("aws_s3_bucket_server_side_encryption_configuration");
const VERSIONING: LinkSpec = companion("aws_s3_bucket_versioning");
const LOGGING: LinkSpec = companion("aws_s3_bucket_logging");
const PUBLIC_ACCESS_BLOCK: LinkSpec = companion("aws_s3_bucket_public_access_block");

const fn companion(companion_type: &'static str) -> LinkSpec {
    LinkSpec {
        primary_type: BUCKET,
        primary_key: "bucket",
        companion_type,
        companion_key: "bucket",
    }
}

pub fn rules() -> Vec<Rule> {
    vec![
        Rule::linked(
            ids::RULE_S3_BUCKET_ENCRYPTION,
            ids::CODE_BUCKET_UNENCRYPTED,
            ENCRYPTION,
            encryption_inline,
            encryption_companion,
            |_, id, _| format!("S3 bucket '{id}' does not have default server-side encryption enabled"),
        )
        .with_control("CIS AWS 2.1.1")
        .with_help("Add an aws_s3_bucket_server_side_encryption_configuration for the bucket."),
        Rule::linked(
            ids::RULE_S3_BUCKET_VERSIONING,
            ids::CODE_VERSIONING_DISABLED,
            VERSIONING,
            versioning_inline,
            versioning_companion,
            |_, id, _| format!("S3 bucket '{id}' does not have versioning enabled"),
        )
        .with_control("CIS AWS 2.1.3")
        .with_help("Add an aws_s3_bucket_versioning with status = \"Enabled\"."),
        Rule::linked(
            ids::RULE_S3_BUCKET_LOGGING,
            ids::CODE_ACCESS_LOGGING_DISABLED,
            LOGGING,
            logging_inline,
            logging_companion,
            |_, id, _| format!("S3 bucket '{id}' does not have access logging enabled"),
        )
        .with_control("CIS AWS 3.6")
        .with_help("Add an aws_s3_bucket_logging pointing at a log bucket."),
        Rule::linked(
            ids::RULE_S3_PUBLIC_ACCESS_BLOCK,
            ids::CODE_PUBLIC_ACCESS_NOT_BLOCKED,
            PUBLIC_ACCESS_BLOCK,
            |_, _| Decision::Violation,
            public_access_companion,
            |_, id, _| format!("S3 bucket '{id}' does not block public access"),
        )
        .with_control("CIS AWS 2.1.5")
        .with_help("Add an aws_s3_bucket_public_access_block with all four settings true."),
    ]
}

/// `rule[*].apply_server_side_encryption_by_default[*].sse_algorithm`, shared by the inline block
/// and the companion resource.
fn default_encryption(rules: &Value) -> Decision {
    any_element(rules, Decision::Violation, |rule| {
        at(rule.get("apply_server_side_encryption_by_default"), |defaults| {
            any_element(defaults, Decision::Violation, |d| {
                at(d.get("sse_algorithm"), |alg| {
                    string_in(alg, SSE_ALGORITHMS, Decision::Violation)
                })
            })
        })
    })
}

fn encryption_inline(bucket: &Resource, _: &RulePolicy) -> Decision {
    at(bucket.attr("server_side_encryption_configuration"), |blocks| {
        any_element(blocks, Decision::Violation, |b| at(b.get("rule"), default_encryption))
    })
}

fn encryption_companion(config: &Resource, _: &RulePolicy) -> Decision {
    at(config.attr("rule"), default_encryption)
}

fn versioning_inline(bucket: &Resource, _: &RulePolicy) -> Decision {
    at(bucket.attr("versioning"), |blocks| {
        any_element(blocks, Decision::Violation, |b| {
            at(b.get("enabled"), |e| is_true(e, Decision::Violation))
        })
    })
}

fn versioning_companion(versioning: &Resource, _: &RulePolicy) -> Decision {
    at(versioning.attr("versioning_configuration"), |blocks| {
        any_element(blocks, Decision::Violation, |b| {
            at(b.get("status"), |s| string_in(s, &["Enabled"], Decision::Violation))
        })
    })
}

fn logging_inline(bucket: &Resource, _: &RulePolicy) -> Decision {
    at(bucket.attr("logging"), |blocks| {
        any_element(blocks, Decision::Violation, |b| {
            at(b.get("target_bucket"), |t| non_empty(t, Decision::Violation))
        })
    })
}

fn logging_companion(logging: &Resource, _: &RulePolicy) -> Decision {
    at(logging.attr("target_bucket"), |t| non_empty(t, Decision::Violation))
}

fn public_access_companion(block: &Resource, _: &RulePolicy) -> Decision {
    all_of(
        [
            "block_public_acls",
            "block_public_policy",
            "ignore_public_acls",
            "restrict_public_buckets",
        ]
        .into_iter()
        .map(|flag| at(block.attr(flag), |v| is_true(v, Decision::Violation))),
    )
}
