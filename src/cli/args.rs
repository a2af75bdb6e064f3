use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// NuGet Janitor: retention-policy cleanup for a NuGet file share
#[derive(Parser, Debug)]
#[command(
    name = "nuget-janitor",
    version,
    about = "Helper for cleaning a NuGet package repository on a file share.",
    long_about = "Helper for cleaning a NuGet package repository on a file share.\n\
                  Removes pre-release package versions under independently enabled\n\
                  retention policies. Release versions are never removed.",
    after_help = "EXAMPLES:\n  \
        nuget-janitor --source //share/nuget --remove-released --dry-run\n  \
        nuget-janitor --source //share/nuget --remove-with-later\n  \
        nuget-janitor --source //share/nuget --remove-max-age 30 --log-dir /var/log"
)]
pub struct Cli {
    /// The package source to tidy
    #[arg(long, value_name = "PATH")]
    pub source: Option<PathBuf>,

    /// Do a dry run, printing the tidy plan and not taking any action
    #[arg(long)]
    pub dry_run: bool,

    /// Remove pre-release packages which have an associated release
    #[arg(long)]
    pub remove_released: bool,

    /// Remove pre-release packages which have been superseded by a later release version
    #[arg(long)]
    pub remove_with_later: bool,

    /// Remove pre-release packages older than the given number of days
    #[arg(long, value_name = "DAYS")]
    pub remove_max_age: Option<u64>,

    /// Directory to write the run log to
    #[arg(long, value_name = "PATH")]
    pub log_dir: Option<PathBuf>,

    /// Config file (defaults to ~/.nuget-janitor/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Disable the deletion progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Verbose output
    #[arg(long, short)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
    Quiet,
}

impl From<crate::common::config::OutputFormat> for OutputFormat {
    fn from(format: crate::common::config::OutputFormat) -> Self {
        match format {
            crate::common::config::OutputFormat::Human => OutputFormat::Human,
            crate::common::config::OutputFormat::Json => OutputFormat::Json,
            crate::common::config::OutputFormat::Quiet => OutputFormat::Quiet,
        }
    }
}
