//! Runs the retention policies over every package under a source root.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, VersionDiagnostic};
use crate::cleaner::{self, CleanMode, CleanReport, CleanupPlan, RemoveDir, RunLog};
use crate::common::errors::{JanitorError, Result};
use crate::policy::{Evaluation, RetentionPolicies};
use crate::repo;

/// Everything one invocation needs
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Repository root; a run without one is refused
    pub source: Option<PathBuf>,
    pub mode: CleanMode,
    pub policies: RetentionPolicies,
    /// Where the execute-mode run log is created
    pub log_dir: PathBuf,
    pub show_progress: bool,
    /// Names the run log
    pub started_at: DateTime<Local>,
    /// Reference time for the max-age policy
    pub now: SystemTime,
    /// How a version directory is deleted in execute mode
    pub remove_dir: RemoveDir,
}

impl RunOptions {
    pub fn new(source: Option<PathBuf>, mode: CleanMode, policies: RetentionPolicies) -> Self {
        Self {
            source,
            mode,
            policies,
            log_dir: PathBuf::from("."),
            show_progress: false,
            started_at: Local::now(),
            now: SystemTime::now(),
            remove_dir: cleaner::remove_dir_all,
        }
    }
}

/// What happened to one package
#[derive(Debug, Clone, Serialize)]
pub struct PackageReport {
    pub package_id: String,
    pub path: PathBuf,
    pub invalid_versions: Vec<VersionDiagnostic>,
    pub evaluation: Evaluation,
    pub plan: CleanupPlan,
    pub clean: CleanReport,
    /// Set when the package directory itself could not be listed
    pub listing_error: Option<String>,
}

impl PackageReport {
    pub fn has_errors(&self) -> bool {
        self.listing_error.is_some() || self.clean.has_errors()
    }
}

/// Totals across all packages of a run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub source: PathBuf,
    pub mode: CleanMode,
    pub packages: Vec<PackageReport>,
    pub versions_planned: usize,
    pub versions_removed: usize,
    pub any_errors: bool,
    pub log_path: Option<PathBuf>,
}

impl RunSummary {
    fn new(source: &Path, mode: CleanMode) -> Self {
        Self {
            source: source.to_path_buf(),
            mode,
            packages: Vec::new(),
            versions_planned: 0,
            versions_removed: 0,
            any_errors: false,
            log_path: None,
        }
    }

    fn record(&mut self, report: PackageReport) {
        self.versions_planned += report.clean.planned;
        self.versions_removed += report.clean.removed;
        self.any_errors |= report.has_errors();
        self.packages.push(report);
    }

    /// Packages that finished with at least one error
    pub fn packages_with_errors(&self) -> impl Iterator<Item = &PackageReport> {
        self.packages.iter().filter(|p| p.has_errors())
    }
}

pub struct Janitor {
    options: RunOptions,
}

impl Janitor {
    pub fn new(options: RunOptions) -> Self {
        Self { options }
    }

    /// Process every package, one at a time, in listing order.
    ///
    /// In execute mode the run log is created before the first package and
    /// closed when this returns, whichever way it returns.
    pub fn run(&self) -> Result<RunSummary> {
        let source = validate_source(self.options.source.as_deref())?;
        let packages = repo::list_packages(source).map_err(|e| JanitorError::Io {
            path: source.to_path_buf(),
            source: e,
        })?;

        info!(
            source = %source.display(),
            mode = %self.options.mode,
            packages = packages.len(),
            "Starting cleanup"
        );
        if !self.options.policies.any_enabled() {
            warn!("No retention policy enabled; nothing will be removed");
        }

        let mut log = match self.options.mode {
            CleanMode::DryRun => None,
            CleanMode::Execute => {
                let mut log = RunLog::create(&self.options.log_dir, &self.options.started_at)?;
                log.start(source)?;
                Some(log)
            }
        };

        let mut summary = RunSummary::new(source, self.options.mode);
        for package_dir in packages {
            let report = self.clean_package(source, &package_dir, log.as_mut())?;
            summary.record(report);
        }

        if let Some(log) = log {
            summary.log_path = Some(log.finish(summary.versions_removed)?);
        }

        info!(
            removed = summary.versions_removed,
            planned = summary.versions_planned,
            errors = summary.any_errors,
            "Cleanup finished"
        );
        Ok(summary)
    }

    fn clean_package(
        &self,
        source: &Path,
        package_dir: &Path,
        mut log: Option<&mut RunLog>,
    ) -> Result<PackageReport> {
        let package_id = repo::dir_name(package_dir);
        debug!(package = %package_id, "Cleaning package");

        if let Some(log) = log.as_deref_mut() {
            log.begin_package(&package_id)?;
        }

        let version_dirs = match repo::list_versions(package_dir) {
            Ok(dirs) => dirs,
            Err(e) => {
                let error = e.to_string();
                warn!(package = %package_id, %error, "Failed to list package versions");
                if let Some(log) = log.as_deref_mut() {
                    log.listing_failed(package_dir, &error)?;
                    log.end_package()?;
                }
                return Ok(PackageReport {
                    package_id,
                    path: package_dir.to_path_buf(),
                    invalid_versions: Vec::new(),
                    evaluation: Evaluation::default(),
                    plan: CleanupPlan::default(),
                    clean: CleanReport {
                        mode: self.options.mode,
                        planned: 0,
                        removed: 0,
                        failures: Vec::new(),
                    },
                    listing_error: Some(error),
                });
            }
        };

        let catalog = Catalog::from_version_dirs(version_dirs);
        let evaluation = self.options.policies.evaluate(&catalog, self.options.now);
        let plan = CleanupPlan::new(&catalog, &evaluation.combined);

        let clean = match log.as_deref_mut() {
            None => cleaner::dry_run(&plan),
            Some(log) => {
                for diagnostic in catalog.diagnostics() {
                    log.invalid_version(diagnostic)?;
                }
                for diagnostic in &evaluation.artifact_diagnostics {
                    log.skipped_max_age(diagnostic)?;
                }
                let report = cleaner::execute(
                    &plan,
                    source,
                    log,
                    self.options.show_progress,
                    self.options.remove_dir,
                )?;
                log.end_package()?;
                report
            }
        };

        Ok(PackageReport {
            package_id,
            path: package_dir.to_path_buf(),
            invalid_versions: catalog.diagnostics().to_vec(),
            evaluation,
            plan,
            clean,
            listing_error: None,
        })
    }
}

/// The source root must be given and must be a directory
fn validate_source(source: Option<&Path>) -> Result<&Path> {
    let source = source.ok_or(JanitorError::MissingSource)?;
    if !source.is_dir() {
        return Err(JanitorError::SourceNotFound {
            path: source.to_path_buf(),
        });
    }
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_source_fails_fast() {
        let janitor = Janitor::new(RunOptions::new(
            None,
            CleanMode::Execute,
            RetentionPolicies::default(),
        ));
        let err = janitor.run().unwrap_err();
        assert!(matches!(err, JanitorError::MissingSource));
    }

    #[test]
    fn test_nonexistent_source_is_config_error() {
        let janitor = Janitor::new(RunOptions::new(
            Some(PathBuf::from("/definitely/not/a/share")),
            CleanMode::DryRun,
            RetentionPolicies::default(),
        ));
        let err = janitor.run().unwrap_err();
        assert!(err.is_config_error());
    }
}
