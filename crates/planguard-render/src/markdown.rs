use crate::{RenderableReport, RenderableSeverity, RenderableVerdict};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Planguard report\n\n");
    let verdict = match report.verdict {
        RenderableVerdict::Pass => "PASS",
        RenderableVerdict::Fail => "FAIL",
    };
    out.push_str(&format!(
        "- Verdict: **{}**\n- Package: `{}`\n- Violations: {} ({} resources scanned, {} rules evaluated)\n\n",
        verdict,
        report.data.package,
        report.data.violations_total,
        report.data.resources_scanned,
        report.data.rules_evaluated
    ));

    if report.data.unknown_tracking_degraded {
        out.push_str(
            "> Note: the plan carried no unknown-value markers; computed values were read as null.\n\n",
        );
    }

    if report.violations.is_empty() {
        out.push_str("No violations.\n");
        return out;
    }

    out.push_str("## Violations\n\n");

    for v in &report.violations {
        let sev = match v.severity {
            RenderableSeverity::Info => "INFO",
            RenderableSeverity::Warning => "WARN",
            RenderableSeverity::Error => "ERROR",
        };

        match &v.address {
            Some(address) => out.push_str(&format!(
                "- [{}] `{}` / `{}`: {} (`{}`)\n",
                sev, v.rule_id, v.code, v.message, address
            )),
            None => out.push_str(&format!(
                "- [{}] `{}` / `{}`: {}\n",
                sev, v.rule_id, v.code, v.message
            )),
        }

        if let Some(help) = &v.help {
            out.push_str(&format!("  - help: {}\n", help));
        }
    }

    out
}
