//! Render use cases over in-memory reports.

use planguard_render::RenderableReport;

/// One violation message per line, for stdout.
pub fn render_text(report: &RenderableReport) -> Vec<String> {
    planguard_render::render_text(report)
}

pub fn render_markdown(report: &RenderableReport) -> String {
    planguard_render::render_markdown(report)
}

pub fn render_annotations(report: &RenderableReport, max: usize) -> Vec<String> {
    planguard_render::render_github_annotations(report)
        .into_iter()
        .take(max)
        .collect()
}
