use chrono::{DateTime, Local};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};

use crate::catalog::{SemanticVersion, VersionDiagnostic};
use crate::common::errors::{JanitorError, Result};
use crate::common::format;
use crate::policy::ArtifactDiagnostic;

const LOG_FILE_PREFIX: &str = "nuget-janitor-run-log-";

/// Audit trail of one execute-mode run.
///
/// The file is created fresh (never appended to or overwritten) and every
/// line is flushed as it is written, so an interrupted run leaves a log of
/// exactly what was done. The file closes when the `RunLog` is dropped.
#[derive(Debug)]
pub struct RunLog {
    path: PathBuf,
    writer: LineWriter<File>,
}

/// `nuget-janitor-run-log-YYYYMMDD-HHMMSS.txt`
pub fn log_file_name(started_at: &DateTime<Local>) -> String {
    format!(
        "{}{}.txt",
        LOG_FILE_PREFIX,
        started_at.format("%Y%m%d-%H%M%S")
    )
}

impl RunLog {
    /// Create the log for a run that started at `started_at`
    pub fn create(dir: &Path, started_at: &DateTime<Local>) -> Result<Self> {
        let path = dir.join(log_file_name(started_at));
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|source| JanitorError::Log {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            path,
            writer: LineWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn start(&mut self, source: &Path) -> Result<()> {
        self.line(format_args!("Starting cleanup for source [{}]", source.display()))?;
        self.line(format_args!(""))
    }

    pub fn begin_package(&mut self, package_id: &str) -> Result<()> {
        self.line(format_args!("Cleaning package with id [{}]", package_id))
    }

    pub fn invalid_version(&mut self, diagnostic: &VersionDiagnostic) -> Result<()> {
        self.line(format_args!(
            "  Invalid version detected [{}]: {}",
            diagnostic.path.display(),
            diagnostic.reason
        ))
    }

    pub fn skipped_max_age(&mut self, diagnostic: &ArtifactDiagnostic) -> Result<()> {
        self.line(format_args!(
            "  Skipped max-age check for [{}]: {}",
            diagnostic.path.display(),
            diagnostic.reason
        ))
    }

    pub fn listing_failed(&mut self, path: &Path, error: &str) -> Result<()> {
        self.line(format_args!("Failed to list [{}]: {}", path.display(), error))
    }

    pub fn removing<'a, I>(&mut self, versions: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a SemanticVersion>,
    {
        let versions = format::format_versions(versions);
        self.line(format_args!("Removing packages with versions {}", versions))
    }

    pub fn removal_failed(&mut self, path: &Path, error: &str) -> Result<()> {
        self.line(format_args!("Failed to remove [{}]: {}", path.display(), error))
    }

    pub fn end_package(&mut self) -> Result<()> {
        self.line(format_args!(""))
    }

    /// Write the closing total and close the file
    pub fn finish(mut self, versions_removed: usize) -> Result<PathBuf> {
        self.line(format_args!("Removed [{}] packages", versions_removed))?;
        self.writer.flush().map_err(|source| JanitorError::Log {
            path: self.path.clone(),
            source,
        })?;
        Ok(self.path)
    }

    fn line(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        writeln!(self.writer, "{}", args).map_err(|source| JanitorError::Log {
            path: self.path.clone(),
            source,
        })
    }
}
