//! Cross-resource linkage: deciding whether a companion resource (e.g. an
//! `aws_s3_bucket_server_side_encryption_configuration`) configures a given primary resource
//! (its `aws_s3_bucket`).
//!
//! Strategies, tried in order per companion, first success wins:
//!
//! 1. direct: the companion's key attribute equals the primary's key attribute;
//! 2. reference: the companion's key attribute contains `{primary type}.{primary name}` or
//!    `{primary type}.{primary identity}` as a substring, or a configuration reference recorded
//!    for it names the primary's configuration address (`module.store.aws_s3_bucket.logs`, with
//!    or without a trailing attribute). Configuration references are only consulted when the two
//!    key literals do not contradict each other;
//! 3. sole candidate: the companion's key carries neither a literal nor a reference, and the
//!    plan holds exactly one managed resource of the primary type and exactly one of the
//!    companion type.
//!
//! Ambiguity resolves to "not linked", which flags the primary unless its inline form
//! complies. A companion whose key is `Unknown` and that cannot be paired by the rules above is
//! a possible link: it can make the primary unverifiable but never compliant.

use crate::model::{Identity, Plan, Resource, Value, config_address};
use crate::policy::RulePolicy;
use crate::rules::ResourcePredicate;
use crate::rules::predicate::{Decision, any_of};

/// Which resource types pair up, and through which attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkSpec {
    pub primary_type: &'static str,
    /// Identifying attribute on the primary (`bucket` on `aws_s3_bucket`).
    pub primary_key: &'static str,
    pub companion_type: &'static str,
    /// Attribute on the companion that points at the primary.
    pub companion_key: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkMatch {
    Direct,
    Reference,
    SoleCandidate,
    /// The companion's key is computed at apply time; it may or may not point here.
    Possible,
}

/// How a single companion relates to a primary, or `None` when it is not linked.
pub fn link_match(
    plan: &Plan,
    spec: &LinkSpec,
    primary: &Resource,
    companion: &Resource,
) -> Option<LinkMatch> {
    let companion_key = companion.values.get(spec.companion_key).unwrap_or(&Value::Null);

    if let (Identity::Literal(primary_id), Value::String(companion_id)) =
        (primary.identity(spec.primary_key), companion_key)
        && primary_id == companion_id
    {
        return Some(LinkMatch::Direct);
    }

    let tokens = reference_tokens(spec, primary);
    let literal_ref = companion_key
        .as_str()
        .is_some_and(|s| tokens.iter().any(|t| s.contains(t.as_str())));
    if literal_ref {
        return Some(LinkMatch::Reference);
    }

    if let (Identity::Literal(_), Value::String(_)) =
        (primary.identity(spec.primary_key), companion_key)
    {
        return None;
    }

    let references = companion.references_for(spec.companion_key);
    let target = primary.config_address();
    if references.iter().any(|r| refers_to(r, &target)) {
        return Some(LinkMatch::Reference);
    }

    let unresolved = matches!(companion_key, Value::Null | Value::Unknown) && references.is_empty();
    if !unresolved {
        return None;
    }

    if is_sole_pair(plan, spec) {
        return Some(LinkMatch::SoleCandidate);
    }

    if companion_key.is_unknown() {
        return Some(LinkMatch::Possible);
    }

    None
}

/// Every companion linked to `primary`, in plan order.
pub fn linked_companions<'a>(
    plan: &'a Plan,
    spec: &LinkSpec,
    primary: &Resource,
) -> Vec<(&'a Resource, LinkMatch)> {
    plan.of_type(spec.companion_type)
        .filter_map(|c| link_match(plan, spec, primary, c).map(|m| (c, m)))
        .collect()
}

/// `true` when some companion is definitely linked (possible links do not count).
pub fn has_companion(plan: &Plan, spec: &LinkSpec, primary: &Resource) -> bool {
    linked_companions(plan, spec, primary)
        .iter()
        .any(|(_, m)| *m != LinkMatch::Possible)
}

/// Decide a linked rule for one primary: inline form first, then linked companions.
pub fn decide(
    plan: &Plan,
    spec: &LinkSpec,
    primary: &Resource,
    inline: ResourcePredicate,
    companion: ResourcePredicate,
    policy: &RulePolicy,
) -> Decision {
    if primary.identity(spec.primary_key) == Identity::Unknown {
        return Decision::Unverifiable;
    }

    let inline_decision = inline(primary, policy);
    if matches!(inline_decision, Decision::Compliant | Decision::Unverifiable) {
        return inline_decision;
    }

    let companion_decision = any_of(linked_companions(plan, spec, primary).into_iter().map(
        |(c, m)| match (m, companion(c, policy)) {
            (LinkMatch::Possible, Decision::Compliant) => Decision::Unverifiable,
            (LinkMatch::Possible, Decision::Unverifiable) => Decision::Unverifiable,
            (LinkMatch::Possible, _) => Decision::Violation,
            (_, d) => d,
        },
    ));

    inline_decision.or(companion_decision)
}

fn is_sole_pair(plan: &Plan, spec: &LinkSpec) -> bool {
    plan.count_of_type(spec.primary_type) == 1 && plan.count_of_type(spec.companion_type) == 1
}

/// `module.a.aws_s3_bucket.b.id` and `module.a.aws_s3_bucket.b[0]` both refer to
/// `module.a.aws_s3_bucket.b`.
fn refers_to(reference: &str, target: &str) -> bool {
    let reference = config_address(reference);
    reference
        .strip_prefix(target)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

fn reference_tokens(spec: &LinkSpec, primary: &Resource) -> Vec<String> {
    let mut tokens = Vec::with_capacity(2);
    if !primary.name.is_empty() {
        tokens.push(format!("{}.{}", spec.primary_type, primary.name));
    }
    if let Identity::Literal(id) = primary.identity(spec.primary_key) {
        let token = format!("{}.{}", spec.primary_type, id);
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}
