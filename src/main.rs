use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use nuget_janitor::cleaner::CleanMode;
use nuget_janitor::cli::args::{Cli, OutputFormat};
use nuget_janitor::cli::output;
use nuget_janitor::common::config::Config;
use nuget_janitor::janitor::{Janitor, RunOptions};
use nuget_janitor::policy::RetentionPolicies;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    init_tracing(cli.verbose);

    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load().context("Failed to load default config")?,
    };
    let format = cli
        .format
        .unwrap_or_else(|| OutputFormat::from(config.output_format));

    let mode = if cli.dry_run {
        CleanMode::DryRun
    } else {
        CleanMode::Execute
    };

    let policies = RetentionPolicies {
        remove_released: cli.remove_released,
        remove_with_later: cli.remove_with_later,
        max_age: None,
        artifact_extension: config.artifact_extension.clone(),
    }
    .with_max_age_days(cli.remove_max_age);

    let mut options = RunOptions::new(cli.source.clone(), mode, policies.clone());
    options.log_dir = cli
        .log_dir
        .clone()
        .unwrap_or_else(|| config.resolved_log_dir());
    options.show_progress = !cli.no_progress && format == OutputFormat::Human;

    let summary = Janitor::new(options).run()?;

    match format {
        OutputFormat::Human => match mode {
            CleanMode::DryRun => {
                output::print_dry_run_banner();
                output::print_dry_run_plan(&summary, &policies);
            }
            CleanMode::Execute => output::print_execute_summary(&summary),
        },
        OutputFormat::Json => output::print_summary_json(&summary)?,
        OutputFormat::Quiet => match mode {
            CleanMode::DryRun => output::print_dry_run_quiet(&summary),
            CleanMode::Execute => output::print_summary_quiet(&summary),
        },
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "nuget_janitor=debug"
    } else {
        "nuget_janitor=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
