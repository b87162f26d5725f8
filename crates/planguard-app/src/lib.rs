//! Use case orchestration for planguard.
//!
//! This crate provides the application layer: use cases that coordinate the plan reader, the
//! domain engine, settings resolution, and renderers. The CLI crate depends on this; it only
//! handles argument parsing and I/O of its own outputs.

#![forbid(unsafe_code)]

mod check;
mod explain;
mod render;
mod report;
mod rules;

pub use check::{CheckInput, CheckOutput, run_check, verdict_exit_code};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use render::{render_annotations, render_markdown, render_text};
pub use report::{parse_report_json, serialize_report, to_renderable};
pub use rules::{RuleSummary, format_rules, list_rules};
