use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    /// The document does not have the shape of a serialized plan. `at` is a JSON path such as
    /// `planned_values.root_module.resources[3].type`.
    #[error("malformed plan at {at}: {reason}")]
    MalformedPlan { at: String, reason: String },

    #[error("failed to read plan {path}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PlanError {
    pub(crate) fn malformed(at: impl Into<String>, reason: impl Into<String>) -> Self {
        PlanError::MalformedPlan {
            at: at.into(),
            reason: reason.into(),
        }
    }
}
