//! Plan adapter: read a serialized Terraform plan (`terraform show -json`) and build the plan model
//! used by the rule engine.
//!
//! This crate is allowed to do filesystem IO. Parsing is all-or-nothing: a malformed document
//! yields [`PlanError::MalformedPlan`] and no partial plan.

#![forbid(unsafe_code)]

mod error;
mod parse;
mod references;
mod unknown;

use camino::Utf8Path;
use planguard_domain::model::Plan;
use planguard_types::UnknownTracking;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

pub use error::PlanError;

/// Parse plan JSON text.
pub fn parse_plan(text: &str) -> Result<Plan, PlanError> {
    let doc: JsonValue = serde_json::from_str(text)
        .map_err(|e| PlanError::malformed("(document)", format!("invalid JSON: {e}")))?;
    parse_plan_value(&doc)
}

/// Build a plan from an already-decoded JSON document.
pub fn parse_plan_value(doc: &JsonValue) -> Result<Plan, PlanError> {
    let mut resources = parse::planned_resources(doc)?;
    let markers = unknown::markers(doc)?;
    let references = references::configured(doc);

    let unknown_tracking = match &markers {
        Some(markers) => {
            for resource in &mut resources {
                if let Some(marker) = markers.get(&resource.address) {
                    unknown::apply(&mut resource.values, marker);
                }
            }
            UnknownTracking::Available
        }
        None if resources.is_empty() => UnknownTracking::Available,
        None => {
            warn!("plan has no resource_changes; computed values will read as null");
            UnknownTracking::Unavailable
        }
    };

    for resource in &mut resources {
        if let Some(refs) = references.get(&resource.config_address()) {
            resource.references = refs.clone();
        }
    }

    debug!(
        resources = resources.len(),
        configured = references.len(),
        "plan parsed"
    );

    Ok(Plan {
        resources,
        unknown_tracking,
    })
}

/// Read and parse a plan file.
pub fn read_plan(path: &Utf8Path) -> Result<Plan, PlanError> {
    let text = std::fs::read_to_string(path).map_err(|source| PlanError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_plan(&text)
}

