//! What one evaluation produced, before the app layer wraps it in the versioned envelope.

use crate::model::Plan;
use planguard_types::{PlanguardData, Verdict, Violation};

#[derive(Clone, Debug)]
pub struct DomainReport {
    pub verdict: Verdict,
    pub violations: Vec<Violation>,
    pub data: PlanguardData,
}

impl DomainReport {
    /// Verdict and totals are derived from `violations`; `resources_scanned` counts managed
    /// resources only.
    pub(crate) fn new(
        plan: &Plan,
        package: &str,
        rules_evaluated: u32,
        violations: Vec<Violation>,
    ) -> Self {
        let data = PlanguardData {
            package: package.to_string(),
            resources_scanned: plan.managed().count() as u32,
            rules_evaluated,
            violations_total: violations.len() as u32,
            unknown_tracking: plan.unknown_tracking,
        };
        Self {
            verdict: Verdict::from_violations(&violations),
            violations,
            data,
        }
    }
}
