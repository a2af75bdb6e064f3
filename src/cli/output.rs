use colored::*;

use crate::common::format::{self, format_count, format_count_colored, format_versions};
use crate::janitor::{PackageReport, RunSummary};
use crate::policy::{PolicyKind, RetentionPolicies};

/// Announce a dry run before any package is processed
pub fn print_dry_run_banner() {
    println!("{} Performing dry run.", "ℹ".cyan());
}

/// Print the full plan of a dry run, package by package
pub fn print_dry_run_plan(summary: &RunSummary, policies: &RetentionPolicies) {
    if !policies.any_enabled() {
        println!(
            "  {} No retention policy enabled. Try --remove-released, --remove-with-later or --remove-max-age.",
            "⚠".yellow()
        );
    }

    for package in &summary.packages {
        print_package_plan(package, policies);
    }

    println!();
    println!("{}", "─".repeat(60).dimmed());
    println!(
        "  {} Dry run: would remove {} across {} packages. No files modified.",
        "ℹ".cyan(),
        format_count_colored(summary.versions_planned),
        summary.packages.len()
    );
}

fn print_package_plan(package: &PackageReport, policies: &RetentionPolicies) {
    println!();
    println!(
        "Cleaning package with id [{}]",
        package.package_id.bold()
    );

    if let Some(ref error) = package.listing_error {
        println!("  {} Could not list versions: {}", "✗".red(), error);
        return;
    }

    for diagnostic in &package.invalid_versions {
        println!(
            "  {} Invalid version detected [{}]: {}",
            "⚠".yellow(),
            diagnostic.path.display(),
            diagnostic.reason.dimmed()
        );
    }

    for finding in &package.evaluation.findings {
        let label = match finding.policy {
            PolicyKind::Released => {
                "Found pre-release packages with an associated release".to_string()
            }
            PolicyKind::LaterRelease => {
                "Found pre-release packages with a later release".to_string()
            }
            PolicyKind::MaxAge => format!(
                "Found pre-release packages which are more than {} old",
                format::format_days(policies.max_age_days().unwrap_or_default())
            ),
        };
        println!("  {} {}", label, format_versions(&finding.versions));
    }

    for diagnostic in &package.evaluation.artifact_diagnostics {
        println!(
            "  {} Invalid package identified at [{}]: {}",
            "⚠".yellow(),
            diagnostic.path.display(),
            diagnostic.reason.dimmed()
        );
    }

    println!(
        "  {} {}",
        "Would remove package versions".bold(),
        format_versions(package.plan.versions())
    );
}

/// High-level completion notice for an execute run; details are in the log
pub fn print_execute_summary(summary: &RunSummary) {
    for package in summary.packages_with_errors() {
        println!(
            "  {} There were errors processing package [{}], please check the log!",
            "✗".red(),
            package.package_id
        );
    }

    let log = summary
        .log_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "none".to_string());

    if summary.any_errors {
        println!(
            "  {} Completed with errors. Removed {}. See log: {}",
            "⚠".yellow(),
            format_count_colored(summary.versions_removed),
            log.cyan()
        );
    } else {
        println!(
            "  {} Removed {}. Log: {}",
            "✓".green(),
            format_count_colored(summary.versions_removed),
            log.cyan()
        );
    }
}

/// Machine-readable summary
pub fn print_summary_json(summary: &RunSummary) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

/// A dry run still lists its plan in quiet mode: one line per package,
/// then the summary line
pub fn print_dry_run_quiet(summary: &RunSummary) {
    for package in &summary.packages {
        println!(
            "[{}] Would remove package versions {}",
            package.package_id,
            format_versions(package.plan.versions())
        );
    }
    print_summary_quiet(summary);
}

/// One line: removed, planned, error flag
pub fn print_summary_quiet(summary: &RunSummary) {
    println!(
        "{}  {}  {}",
        summary.versions_removed,
        format_count(summary.versions_planned),
        if summary.any_errors { "errors" } else { "ok" }
    );
}
