use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a violation.
///
/// Identity fields, joined with `|`:
/// - rule_id
/// - code
/// - subject (resource address, or a fixed marker for plan-wide violations)
pub fn fingerprint_for_violation(rule_id: &str, code: &str, subject: &str) -> String {
    let canonical = [rule_id, code, subject].join("|");
    hex::encode(Sha256::digest(canonical.as_bytes()))
}
