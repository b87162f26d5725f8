use crate::RenderableReport;

/// One violation message per line, in report order. A compliant plan renders nothing.
pub fn render_text(report: &RenderableReport) -> Vec<String> {
    report
        .violations
        .iter()
        .map(|v| v.message.replace(['\r', '\n'], " "))
        .collect()
}
