//! Shared output formatting for lint results.

use anyhow::Result;
use import_lint_core::{LintResult, Severity, Violation, ViolationDiagnostic};
use miette::{NamedSource, Report};
use std::path::Path;

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `root` is the analyzed project root; violation paths are relative to it.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Pretty => print_pretty(result, root),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
    }
    Ok(())
}

fn print_text(result: &LintResult) {
    let (errors, warnings, infos) = result.count_by_severity();

    for violation in &result.violations {
        let severity_indicator = match violation.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        println!(
            "{} {} at {}:{}:{}",
            violation.code,
            violation.rule,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        );
        println!("  {}: {}", severity_indicator, violation.message);
        if let Some(suggestion) = &violation.suggestion {
            println!("  = help: {}", suggestion.message);
        }
        println!();
    }

    print_summary(result, errors, warnings, infos);
}

fn print_summary(result: &LintResult, errors: usize, warnings: usize, infos: usize) {
    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, infos, result.files_checked
    );

    if result.fixes_applied > 0 {
        println!("Applied {} fix(es)", result.fixes_applied);
    }
    let fixable = result.fixable_count();
    if fixable > 0 {
        println!("{fixable} problem(s) can be fixed with `--fix`");
    }
}

fn print_pretty(result: &LintResult, root: &Path) {
    let (errors, warnings, infos) = result.count_by_severity();

    for violation in &result.violations {
        match std::fs::read_to_string(root.join(&violation.location.file)) {
            Ok(content) => eprintln!("{:?}", pretty_report(violation, content)),
            Err(e) => {
                tracing::debug!("Cannot read {:?} for snippet: {}", violation.location.file, e);
                eprintln!("{violation}");
            }
        }
    }

    print_summary(result, errors, warnings, infos);
}

fn pretty_report(violation: &Violation, content: String) -> Report {
    let name = violation.location.file.display().to_string();
    Report::new(ViolationDiagnostic::from(violation))
        .with_source_code(NamedSource::new(name, content))
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in &result.violations {
        println!("{violation}");
    }
}
