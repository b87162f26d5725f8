//! CLI entry point for planguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, logging setup, and exit
//! codes. All business logic lives in the `planguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use planguard_app::{
    CheckInput, ExplainOutput, format_explanation, format_not_found, format_rules, list_rules,
    parse_report_json, render_annotations, render_markdown, render_text, run_check, run_explain,
    serialize_report, to_renderable, verdict_exit_code,
};
use planguard_settings::Overrides;
use planguard_types::PlanguardReport;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (`tracing_subscriber` directive syntax).
const LOG_ENV: &str = "PLANGUARD_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "planguard",
    version,
    about = "Compliance rule evaluation for serialized Terraform plans"
)]
struct Cli {
    /// Path to planguard config TOML. A missing file means defaults.
    #[arg(long, default_value = "planguard.toml", global = true)]
    config: Utf8PathBuf,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a plan and print one violation message per line.
    Check {
        /// Plan JSON produced by `terraform show -json <planfile>`.
        #[arg(long)]
        plan: Utf8PathBuf,

        /// Override the rule package (all|s3|audit|data|compute|kms).
        #[arg(long)]
        package: Option<String>,

        /// Where to write the JSON report.
        #[arg(long)]
        report_out: Option<Utf8PathBuf>,

        /// Write a Markdown report alongside.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/planguard/comment.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/planguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/planguard/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Explain a rule_id or code with remediation guidance.
    Explain {
        /// The rule_id (e.g. "s3.bucket_versioning") or code (e.g. "versioning_disabled").
        identifier: String,
    },

    /// List the rules of a package.
    Rules {
        #[arg(long, default_value = "all")]
        package: String,
    },
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.cmd {
        Commands::Check {
            plan,
            package,
            report_out,
            write_markdown,
            markdown_out,
        } => cmd_check(
            &cli.config,
            &plan,
            package,
            report_out.as_deref(),
            write_markdown.then_some(markdown_out.as_path()),
        ),
        Commands::Md { report, output } => cmd_md(&report, output.as_deref()),
        Commands::Annotations { report, max } => cmd_annotations(&report, max),
        Commands::Explain { identifier } => cmd_explain(&identifier),
        Commands::Rules { package } => cmd_rules(&package),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("planguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

/// Logs go to stderr; stdout carries only command output.
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn cmd_check(
    config: &Utf8Path,
    plan: &Utf8Path,
    package: Option<String>,
    report_out: Option<&Utf8Path>,
    markdown_out: Option<&Utf8Path>,
) -> anyhow::Result<i32> {
    let config_text = read_optional(config)?;

    let output = run_check(CheckInput {
        plan_path: plan,
        config_text: &config_text,
        overrides: Overrides { package },
    })?;

    let renderable = to_renderable(&output.report);
    for line in render_text(&renderable) {
        println!("{line}");
    }

    if let Some(path) = report_out {
        let data = serialize_report(&output.report)?;
        write_file(path, &data).context("write report json")?;
    }
    if let Some(path) = markdown_out {
        write_file(path, render_markdown(&renderable).as_bytes()).context("write markdown")?;
    }

    Ok(verdict_exit_code(output.report.verdict))
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<i32> {
    let report = read_report(report_path)?;
    let md = render_markdown(&to_renderable(&report));

    match output {
        Some(path) => write_file(path, md.as_bytes()).context("write markdown output")?,
        None => print!("{md}"),
    }
    Ok(0)
}

fn cmd_annotations(report_path: &Utf8Path, max: usize) -> anyhow::Result<i32> {
    let report = read_report(report_path)?;
    for annotation in render_annotations(&to_renderable(&report), max) {
        println!("{annotation}");
    }
    Ok(0)
}

fn cmd_explain(identifier: &str) -> anyhow::Result<i32> {
    match run_explain(identifier) {
        ExplainOutput::Found { explanation, rule } => {
            print!("{}", format_explanation(&explanation, rule.as_ref()));
            Ok(0)
        }
        ExplainOutput::NotFound {
            identifier,
            suggestions,
            by_package,
        } => {
            eprint!("{}", format_not_found(&identifier, &suggestions, &by_package));
            Ok(1)
        }
    }
}

fn cmd_rules(package: &str) -> anyhow::Result<i32> {
    for line in format_rules(&list_rules(package)?) {
        println!("{line}");
    }
    Ok(0)
}

/// Contents of `path`, or empty when the file does not exist.
fn read_optional(path: &Utf8Path) -> anyhow::Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(err).with_context(|| format!("read config: {path}")),
    }
}

fn read_report(path: &Utf8Path) -> anyhow::Result<PlanguardReport> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read report: {path}"))?;
    parse_report_json(&text)
}

fn write_file(path: &Utf8Path, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, data).with_context(|| format!("write file: {path}"))?;
    Ok(())
}
