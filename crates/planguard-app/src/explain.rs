//! The `explain` use case: remediation guidance for a rule ID or code, joined with what the
//! catalog knows about the rule (package, resource types, control, threshold).

use crate::rules::{RuleSummary, summarize};
use planguard_domain::rules::catalog;
use planguard_types::explain::{self, Explanation};
use planguard_types::ids;

#[derive(Clone, Debug)]
pub enum ExplainOutput {
    Found {
        explanation: Explanation,
        rule: Option<RuleSummary>,
    },
    NotFound {
        identifier: String,
        /// Rules that share the identifier's package prefix or contain it.
        suggestions: Vec<&'static str>,
        by_package: Vec<(&'static str, Vec<RuleSummary>)>,
    },
}

pub fn run_explain(identifier: &str) -> ExplainOutput {
    let rules = catalog_rules();
    match explain::lookup_explanation(identifier) {
        Some(explanation) => ExplainOutput::Found {
            explanation,
            rule: rules
                .into_iter()
                .find(|r| r.id == identifier || r.code == identifier),
        },
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            suggestions: suggest(identifier, &rules),
            by_package: group_by_package(rules),
        },
    }
}

fn catalog_rules() -> Vec<RuleSummary> {
    catalog::rule_set(ids::PACKAGE_ALL)
        .map(|set| set.rules().iter().map(summarize).collect())
        .unwrap_or_default()
}

fn suggest(identifier: &str, rules: &[RuleSummary]) -> Vec<&'static str> {
    let needle = identifier.trim().to_ascii_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let prefix = needle.split_once('.').map(|(package, _)| package);
    rules
        .iter()
        .filter(|r| {
            prefix == Some(ids::package_of(r.id))
                || r.id.contains(needle.as_str())
                || r.code.contains(needle.as_str())
        })
        .map(|r| r.id)
        .collect()
}

fn group_by_package(rules: Vec<RuleSummary>) -> Vec<(&'static str, Vec<RuleSummary>)> {
    let mut groups: Vec<(&'static str, Vec<RuleSummary>)> = catalog::packages()
        .iter()
        .filter(|p| **p != ids::PACKAGE_ALL)
        .map(|p| (*p, Vec::new()))
        .collect();
    for rule in rules {
        let package = ids::package_of(rule.id);
        if let Some((_, members)) = groups.iter_mut().find(|(p, _)| *p == package) {
            members.push(rule);
        }
    }
    groups
}

/// Terminal layout: title, catalog facts, description, fix, then both HCL examples indented.
pub fn format_explanation(explanation: &Explanation, rule: Option<&RuleSummary>) -> String {
    let mut out = format!("{}\n\n", explanation.title);

    if let Some(rule) = rule {
        out.push_str(&format!("  rule:      {} ({})\n", rule.id, rule.code));
        out.push_str(&format!("  package:   {}\n", ids::package_of(rule.id)));
        let checks = match rule.companion_type {
            Some(companion) => format!("{} or a linked {companion}", rule.resource_type),
            None if rule.shape == "existence" => {
                format!("at least one {} in the plan", rule.resource_type)
            }
            None => rule.resource_type.to_string(),
        };
        out.push_str(&format!("  checks:    {checks}\n"));
        if let Some(control) = rule.control {
            out.push_str(&format!("  control:   {control}\n"));
        }
        if let Some(threshold) = rule.threshold {
            out.push_str(&format!(
                "  threshold: {threshold} (override per rule in planguard.toml)\n"
            ));
        }
        out.push('\n');
    }

    out.push_str(explanation.description);
    out.push_str("\n\nHow to fix:\n");
    out.push_str(explanation.remediation);
    out.push_str("\n\nNon-compliant:\n");
    push_indented(&mut out, explanation.examples.before);
    out.push_str("\nCompliant:\n");
    push_indented(&mut out, explanation.examples.after);
    out
}

fn push_indented(out: &mut String, block: &str) {
    for line in block.lines() {
        if line.is_empty() {
            out.push('\n');
        } else {
            out.push_str("    ");
            out.push_str(line);
            out.push('\n');
        }
    }
}

pub fn format_not_found(
    identifier: &str,
    suggestions: &[&str],
    by_package: &[(&str, Vec<RuleSummary>)],
) -> String {
    let mut out = format!("unknown rule or code: {identifier}\n");
    if !suggestions.is_empty() {
        out.push_str(&format!("did you mean: {}\n", suggestions.join(", ")));
    }
    out.push_str("\nknown rules (rule_id / code):\n");
    for (package, rules) in by_package {
        out.push_str(&format!("  {package}\n"));
        for rule in rules {
            out.push_str(&format!("    {} / {}\n", rule.id, rule.code));
        }
    }
    out
}
