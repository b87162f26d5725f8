//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Evaluation determinism (idempotence, resource reordering)
//! - Unknown values never adding violations
//! - Linkage pairing and reference detection
//! - Threshold boundaries and existence rules

use crate::engine::evaluate;
use crate::model::{Plan, Resource, Value};
use crate::rules::catalog;
use crate::rules::linkage::{LinkMatch, LinkSpec, link_match};
use crate::test_support::{UNKNOWN, plan, resource};
use planguard_types::{Violation, ids};
use proptest::prelude::*;
use serde_json::json;
use std::collections::BTreeSet;

// ============================================================================
// Strategies
// ============================================================================

const TYPES: &[&str] = &[
    "aws_s3_bucket",
    "aws_s3_bucket_server_side_encryption_configuration",
    "aws_s3_bucket_versioning",
    "aws_s3_bucket_logging",
    "aws_s3_bucket_public_access_block",
    "aws_cloudtrail",
    "aws_cloudwatch_log_group",
    "aws_db_instance",
    "aws_sqs_queue",
    "aws_ebs_volume",
    "aws_instance",
    "aws_security_group",
    "aws_kms_key",
];

const KEYS: &[&str] = &[
    "bucket",
    "name",
    "identifier",
    "engine",
    "status",
    "enabled",
    "encrypted",
    "monitoring",
    "target_bucket",
    "sse_algorithm",
    "rule",
    "versioning",
    "versioning_configuration",
    "block_public_acls",
    "block_public_policy",
    "ignore_public_acls",
    "restrict_public_buckets",
    "is_multi_region_trail",
    "enable_log_file_validation",
    "retention_in_days",
    "storage_encrypted",
    "backup_retention_period",
    "sqs_managed_sse_enabled",
    "kms_master_key_id",
    "enable_key_rotation",
    "customer_master_key_spec",
    "ingress",
    "protocol",
    "from_port",
    "to_port",
    "cidr_blocks",
];

const STRINGS: &[&str] = &[
    "a",
    "b",
    "AES256",
    "Enabled",
    "Suspended",
    "aws_s3_bucket.a.id",
    "aurora-mysql",
    "postgres",
    "tcp",
    "-1",
    "0.0.0.0/0",
    "RSA_2048",
    "",
];

fn arb_leaf() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        Just(json!(null)),
        Just(json!(UNKNOWN)),
        any::<bool>().prop_map(|b| json!(b)),
        (0u32..400).prop_map(|n| json!(n)),
        prop::sample::select(STRINGS).prop_map(|s| json!(s)),
    ]
}

/// Leaves, lists of leaves, and lists of small objects (the shape of nested blocks).
fn arb_value() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        3 => arb_leaf(),
        1 => prop::collection::vec(arb_leaf(), 0..3).prop_map(serde_json::Value::Array),
        1 => prop::collection::vec(
            prop::collection::btree_map(prop::sample::select(KEYS), arb_leaf(), 0..4),
            0..3
        )
        .prop_map(|blocks| json!(blocks)),
    ]
}

fn arb_resource() -> impl Strategy<Value = Resource> {
    (
        prop::sample::select(TYPES),
        prop::sample::select(&["a", "b", "c"][..]),
        prop::collection::btree_map(prop::sample::select(KEYS), arb_value(), 0..6),
    )
        .prop_map(|(ty, name, values)| resource(ty, name, json!(values)))
}

/// Resources that carry at least one nested block, in the shapes the rules read.
fn arb_block_resource() -> impl Strategy<Value = Resource> {
    prop_oneof![
        arb_leaf().prop_map(|status| resource(
            "aws_s3_bucket_versioning",
            "a",
            json!({ "bucket": "a", "versioning_configuration": [{ "status": status }] }),
        )),
        (arb_leaf(), arb_leaf(), arb_leaf(), arb_leaf()).prop_map(|(protocol, from, to, cidr)| {
            resource(
                "aws_security_group",
                "a",
                json!({ "name": "a", "ingress": [
                    { "protocol": protocol, "from_port": from, "to_port": to, "cidr_blocks": [cidr] },
                    { "protocol": "tcp", "from_port": 22, "to_port": 22, "cidr_blocks": ["0.0.0.0/0"] }
                ]}),
            )
        }),
        arb_leaf().prop_map(|algorithm| resource(
            "aws_s3_bucket",
            "a",
            json!({ "bucket": "a", "server_side_encryption_configuration": [{
                "rule": [{ "apply_server_side_encryption_by_default": [{ "sse_algorithm": algorithm }] }]
            }]}),
        )),
        (
            prop::sample::select(TYPES),
            prop::sample::select(KEYS),
            prop::collection::vec(
                prop::collection::btree_map(prop::sample::select(KEYS), arb_leaf(), 1..4),
                1..3
            ),
        )
            .prop_map(|(ty, key, blocks)| {
                let mut values = serde_json::Map::new();
                values.insert(key.to_string(), json!(blocks));
                resource(ty, "b", serde_json::Value::Object(values))
            }),
    ]
}

/// Nodes below `value`.
fn nested_len(value: &Value) -> usize {
    match value {
        Value::List(items) => items.iter().map(|v| 1 + nested_len(v)).sum(),
        Value::Object(fields) => fields.values().map(|v| 1 + nested_len(v)).sum(),
        _ => 0,
    }
}

/// Replaces the `n`th nested node (pre-order) with `Unknown`.
fn make_nested_unknown(value: &mut Value, n: &mut usize) -> bool {
    let children: Vec<&mut Value> = match value {
        Value::List(items) => items.iter_mut().collect(),
        Value::Object(fields) => fields.values_mut().collect(),
        _ => return false,
    };
    for child in children {
        if *n == 0 {
            *child = Value::Unknown;
            return true;
        }
        *n -= 1;
        if make_nested_unknown(child, n) {
            return true;
        }
    }
    false
}

fn arb_resources() -> impl Strategy<Value = Vec<Resource>> {
    prop::collection::vec(arb_resource(), 0..10)
}

fn pairs(violations: &[Violation]) -> BTreeSet<(String, String)> {
    violations
        .iter()
        .map(|v| {
            let address = v.resource.as_ref().map(|r| r.address.clone()).unwrap_or_default();
            (v.rule_id.clone(), address)
        })
        .collect()
}

fn evaluate_all(p: &Plan) -> Vec<Violation> {
    let set = catalog::rule_set(ids::PACKAGE_ALL).expect("all package");
    evaluate(p, &set)
}

// ============================================================================
// Determinism
// ============================================================================

proptest! {
    /// Evaluating the same plan twice yields identical output.
    #[test]
    fn evaluation_is_idempotent(resources in arb_resources()) {
        let p = plan(resources);
        prop_assert_eq!(evaluate_all(&p), evaluate_all(&p));
    }

    /// The violation set does not depend on resource order.
    #[test]
    fn reordering_resources_keeps_violation_set(
        (original, shuffled) in arb_resources()
            .prop_flat_map(|rs| (Just(rs.clone()), Just(rs).prop_shuffle()))
    ) {
        let a = pairs(&evaluate_all(&plan(original)));
        let b = pairs(&evaluate_all(&plan(shuffled)));
        prop_assert_eq!(a, b);
    }
}

// ============================================================================
// Unknown values
// ============================================================================

proptest! {
    /// Turning any present attribute into an unknown value never introduces a violation.
    #[test]
    fn unknown_never_adds_violations(
        resources in prop::collection::vec(arb_resource(), 1..10),
        which in any::<prop::sample::Index>(),
        key in any::<prop::sample::Index>(),
    ) {
        let before = pairs(&evaluate_all(&plan(resources.clone())));

        let mut resources = resources;
        let target = which.index(resources.len());
        let keys: Vec<String> = resources[target].values.keys().cloned().collect();
        prop_assume!(!keys.is_empty());
        let chosen = keys[key.index(keys.len())].clone();
        resources[target].values.insert(chosen, Value::Unknown);

        let after = pairs(&evaluate_all(&plan(resources)));
        prop_assert!(
            after.is_subset(&before),
            "unknown introduced violations: {:?}",
            after.difference(&before).collect::<Vec<_>>()
        );
    }
}

proptest! {
    /// The same holds for any field inside a nested block, or a whole block entry.
    #[test]
    fn unknown_in_nested_block_never_adds_violations(
        others in prop::collection::vec(arb_resource(), 0..6),
        target in arb_block_resource(),
        node in any::<prop::sample::Index>(),
    ) {
        let mut resources = others;
        resources.push(target);
        let before = pairs(&evaluate_all(&plan(resources.clone())));

        let last = resources.last_mut().expect("target resource");
        let total: usize = last.values.values().map(nested_len).sum();
        let mut n = node.index(total);
        prop_assert!(last.values.values_mut().any(|v| make_nested_unknown(v, &mut n)));

        let after = pairs(&evaluate_all(&plan(resources)));
        prop_assert!(
            after.is_subset(&before),
            "nested unknown introduced violations: {:?}",
            after.difference(&before).collect::<Vec<_>>()
        );
    }
}

// ============================================================================
// Thresholds and existence
// ============================================================================

proptest! {
    /// Backup retention passes exactly when it reaches the threshold.
    #[test]
    fn backup_retention_boundary(days in 0u32..60) {
        let p = plan(vec![resource(
            "aws_db_instance",
            "db",
            json!({ "identifier": "db", "storage_encrypted": true, "backup_retention_period": days }),
        )]);
        let flagged = evaluate_all(&p)
            .iter()
            .any(|v| v.rule_id == ids::RULE_DATA_RDS_BACKUP_RETENTION);
        prop_assert_eq!(flagged, days < 7);
    }

    /// Without a trail there is exactly one plan-wide violation; adding one clears it.
    #[test]
    fn cloudtrail_existence(resources in arb_resources()) {
        let without: Vec<Resource> = resources
            .into_iter()
            .filter(|r| r.resource_type != "aws_cloudtrail")
            .collect();
        let missing = evaluate_all(&plan(without.clone()))
            .into_iter()
            .filter(|v| v.rule_id == ids::RULE_AUDIT_CLOUDTRAIL_PRESENT)
            .collect::<Vec<_>>();
        prop_assert_eq!(missing.len(), 1);
        prop_assert!(missing[0].resource.is_none());

        let mut with = without;
        with.push(resource("aws_cloudtrail", "main", json!({})));
        let present = evaluate_all(&plan(with))
            .into_iter()
            .any(|v| v.rule_id == ids::RULE_AUDIT_CLOUDTRAIL_PRESENT);
        prop_assert!(!present);
    }
}

#[test]
fn backup_retention_at_six_seven_fourteen() {
    for (days, flagged) in [(6, true), (7, false), (14, false)] {
        let p = plan(vec![resource(
            "aws_db_instance",
            "db",
            json!({ "identifier": "db", "backup_retention_period": days }),
        )]);
        let hit = evaluate_all(&p)
            .iter()
            .any(|v| v.rule_id == ids::RULE_DATA_RDS_BACKUP_RETENTION);
        assert_eq!(hit, flagged, "backup_retention_period = {days}");
    }
}

// ============================================================================
// Linkage
// ============================================================================

const VERSIONING: LinkSpec = LinkSpec {
    primary_type: "aws_s3_bucket",
    primary_key: "bucket",
    companion_type: "aws_s3_bucket_versioning",
    companion_key: "bucket",
};

fn versioning_violations(p: &Plan) -> usize {
    evaluate_all(p)
        .iter()
        .filter(|v| v.rule_id == ids::RULE_S3_BUCKET_VERSIONING)
        .count()
}

#[test]
fn single_instance_pairing_flips_with_second_companion() {
    let bucket = resource("aws_s3_bucket", "main", json!({}));
    let compliant = resource(
        "aws_s3_bucket_versioning",
        "main",
        json!({ "versioning_configuration": [{ "status": "Enabled" }] }),
    );
    let p = plan(vec![bucket.clone(), compliant.clone()]);
    assert_eq!(versioning_violations(&p), 0);

    let second = resource(
        "aws_s3_bucket_versioning",
        "other",
        json!({ "versioning_configuration": [{ "status": "Enabled" }] }),
    );
    let p = plan(vec![bucket, compliant, second]);
    assert_eq!(versioning_violations(&p), 1);
}

proptest! {
    /// A reference to the bucket is found whatever text surrounds it.
    #[test]
    fn reference_detected_with_any_surroundings(
        prefix in "[a-z${}(). ]{0,8}",
        suffix in "[a-z${}(). ]{0,8}",
    ) {
        let bucket = resource("aws_s3_bucket", "myresource", json!({}));
        let companion = resource(
            "aws_s3_bucket_versioning",
            "v",
            json!({ "bucket": format!("{prefix}aws_s3_bucket.myresource{suffix}") }),
        );
        let p = plan(vec![
            bucket.clone(),
            resource("aws_s3_bucket", "other", json!({})),
            companion.clone(),
        ]);
        prop_assert_eq!(
            link_match(&p, &VERSIONING, &bucket, &companion),
            Some(LinkMatch::Reference)
        );
    }
}
