use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::run_log::RunLog;
use crate::catalog::{Catalog, CatalogEntry, SemanticVersion};
use crate::common::errors::Result;
use crate::common::{format, safety};
use crate::policy::RemovalSet;

/// Clean mode determines whether anything is touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanMode {
    /// Report the plan without doing it
    DryRun,
    /// Permanent removal, no undo
    Execute,
}

impl std::fmt::Display for CleanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CleanMode::DryRun => write!(f, "dry_run"),
            CleanMode::Execute => write!(f, "execute"),
        }
    }
}

/// The directories a removal set resolves to, in ascending version order
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanupPlan {
    pub entries: Vec<CatalogEntry>,
}

impl CleanupPlan {
    /// Resolve each version in `removal` to its directory in `catalog`
    pub fn new(catalog: &Catalog, removal: &RemovalSet) -> Self {
        let entries = removal
            .iter()
            .filter_map(|version| match catalog.path_of(version) {
                Some(path) => Some(CatalogEntry {
                    version: version.clone(),
                    path: path.to_path_buf(),
                }),
                None => {
                    warn!(%version, "Version selected for removal is not in the catalog");
                    None
                }
            })
            .collect();
        Self { entries }
    }

    pub fn versions(&self) -> impl Iterator<Item = &SemanticVersion> {
        self.entries.iter().map(|e| &e.version)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A version directory that could not be removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionFailure {
    pub version: SemanticVersion,
    pub path: PathBuf,
    pub error: String,
}

/// Report from cleaning one package
#[derive(Debug, Clone, Serialize)]
pub struct CleanReport {
    pub mode: CleanMode,
    pub planned: usize,
    pub removed: usize,
    pub failures: Vec<DeletionFailure>,
}

impl CleanReport {
    pub fn has_errors(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Removes one version directory tree
pub type RemoveDir = fn(&Path) -> std::io::Result<()>;

/// Permanent recursive removal
pub fn remove_dir_all(path: &Path) -> std::io::Result<()> {
    std::fs::remove_dir_all(path)
}

/// Dry run: nothing is removed and nothing is logged
pub fn dry_run(plan: &CleanupPlan) -> CleanReport {
    CleanReport {
        mode: CleanMode::DryRun,
        planned: plan.len(),
        removed: 0,
        failures: Vec::new(),
    }
}

/// Delete every directory in the plan.
///
/// A directory that fails to go is logged and counted, and the rest are
/// still attempted. Only a failure to write the log aborts.
pub fn execute(
    plan: &CleanupPlan,
    source_root: &Path,
    log: &mut RunLog,
    show_progress: bool,
    remove: RemoveDir,
) -> Result<CleanReport> {
    log.removing(plan.versions())?;

    let pb = if show_progress && !plan.is_empty() {
        let pb = ProgressBar::new(plan.len() as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.red} [{bar:40.red/blue}] {pos}/{len} Deleting... {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("━━░"),
        );
        Some(pb)
    } else {
        None
    };

    let mut report = CleanReport {
        mode: CleanMode::Execute,
        planned: plan.len(),
        removed: 0,
        failures: Vec::new(),
    };

    for entry in &plan.entries {
        if let Some(ref pb) = pb {
            pb.set_message(format::truncate(&entry.path.display().to_string(), 40));
        }

        match remove_version_dir(source_root, &entry.path, remove) {
            Ok(()) => {
                info!(path = %entry.path.display(), "Removed version directory");
                report.removed += 1;
            }
            Err(error) => {
                warn!(path = %entry.path.display(), %error, "Failed to remove version directory");
                log.removal_failed(&entry.path, &error)?;
                report.failures.push(DeletionFailure {
                    version: entry.version.clone(),
                    path: entry.path.clone(),
                    error,
                });
            }
        }

        if let Some(ref pb) = pb {
            pb.inc(1);
        }
    }

    if let Some(ref pb) = pb {
        pb.finish_and_clear();
    }

    Ok(report)
}

/// Delete one version directory permanently. A directory that is already
/// gone counts as a failure.
fn remove_version_dir(
    source_root: &Path,
    path: &Path,
    remove: RemoveDir,
) -> std::result::Result<(), String> {
    if !safety::is_removable_version_dir(source_root, path) {
        return Err(format!(
            "SAFETY: refusing to remove '{}', not a pre-release directory of a package under '{}'",
            path.display(),
            source_root.display()
        ));
    }

    remove(path).map_err(|e| e.to_string())
}
