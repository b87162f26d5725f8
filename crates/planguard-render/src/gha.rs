use crate::{RenderableReport, RenderableSeverity};

/// Render violations as GitHub Actions workflow command annotations.
///
/// Format: `::{level}::[{rule_id}:{code}] {message}`. Plans have no source positions, so no
/// `file=` property is emitted; the resource identity is part of the message.
pub fn render_github_annotations(report: &RenderableReport) -> Vec<String> {
    report
        .violations
        .iter()
        .map(|v| {
            let level = match v.severity {
                RenderableSeverity::Error => "error",
                RenderableSeverity::Warning => "warning",
                RenderableSeverity::Info => "notice",
            };
            let message = format!("[{}:{}] {}", v.rule_id, v.code, v.message)
                .replace('%', "%25")
                .replace('\r', "%0D")
                .replace('\n', "%0A");
            format!("::{level}::{message}")
        })
        .collect()
}
