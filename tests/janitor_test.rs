use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

use nuget_janitor::cleaner::CleanMode;
use nuget_janitor::common::errors::JanitorError;
use nuget_janitor::janitor::{Janitor, RunOptions, RunSummary};
use nuget_janitor::policy::{PolicyKind, RetentionPolicies};

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// A throwaway share with `source/` and `logs/` side by side
struct Share {
    dir: TempDir,
}

impl Share {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("source")).unwrap();
        std::fs::create_dir_all(dir.path().join("logs")).unwrap();
        Self { dir }
    }

    fn source(&self) -> PathBuf {
        self.dir.path().join("source")
    }

    fn logs(&self) -> PathBuf {
        self.dir.path().join("logs")
    }

    fn version_dir(&self, package: &str, version: &str) -> PathBuf {
        self.source().join(package).join(version)
    }

    /// Add a version directory with one package file of the given age
    fn add(&self, package: &str, version: &str, age: Duration) -> &Self {
        self.add_with_files(package, version, 1, age)
    }

    fn add_with_files(&self, package: &str, version: &str, files: usize, age: Duration) -> &Self {
        let dir = self.version_dir(package, version);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("{}.nuspec", package)), "<package/>").unwrap();
        for i in 0..files {
            let file = dir.join(format!("{}.{}.{}.nupkg", package, version, i));
            std::fs::write(&file, "nupkg").unwrap();
            let handle = std::fs::File::options().write(true).open(&file).unwrap();
            handle.set_modified(SystemTime::now() - age).unwrap();
        }
        self
    }

    fn add_dir(&self, package: &str, name: &str) -> &Self {
        std::fs::create_dir_all(self.version_dir(package, name)).unwrap();
        self
    }

    fn exists(&self, package: &str, version: &str) -> bool {
        self.version_dir(package, version).exists()
    }

    fn log_files(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.logs())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect()
    }

    fn run(&self, mode: CleanMode, policies: RetentionPolicies) -> RunSummary {
        self.try_run(mode, policies).unwrap()
    }

    fn try_run(
        &self,
        mode: CleanMode,
        policies: RetentionPolicies,
    ) -> Result<RunSummary, JanitorError> {
        let mut options = RunOptions::new(Some(self.source()), mode, policies);
        options.log_dir = self.logs();
        Janitor::new(options).run()
    }
}

fn policies(released: bool, later: bool, max_age_days: Option<u64>) -> RetentionPolicies {
    RetentionPolicies {
        remove_released: released,
        remove_with_later: later,
        max_age: None,
        artifact_extension: "nupkg".to_string(),
    }
    .with_max_age_days(max_age_days)
}

fn plan_of(summary: &RunSummary, package: &str) -> Vec<String> {
    summary
        .packages
        .iter()
        .find(|p| p.package_id == package)
        .unwrap()
        .plan
        .versions()
        .map(|v| v.to_string())
        .collect()
}

// ─── Scenarios ──────────────────────────────────────────────────────────────

#[test]
fn test_released_counterpart_removes_prereleases() {
    let share = Share::new();
    share
        .add("Contoso.Core", "1.0.0-alpha", DAY)
        .add("Contoso.Core", "1.0.0-beta", DAY)
        .add("Contoso.Core", "1.0.0", DAY);

    let summary = share.run(CleanMode::Execute, policies(true, false, None));

    assert_eq!(summary.versions_removed, 2);
    assert!(!summary.any_errors);
    assert!(!share.exists("Contoso.Core", "1.0.0-alpha"));
    assert!(!share.exists("Contoso.Core", "1.0.0-beta"));
    assert!(share.exists("Contoso.Core", "1.0.0"));
}

#[test]
fn test_superseded_by_later_release() {
    let share = Share::new();
    share
        .add("Contoso.Core", "1.0.0-alpha", DAY)
        .add("Contoso.Core", "1.1.0", DAY);

    let dry = share.run(CleanMode::DryRun, policies(true, false, None));
    assert!(plan_of(&dry, "Contoso.Core").is_empty());

    let summary = share.run(CleanMode::DryRun, policies(false, true, None));
    assert_eq!(plan_of(&summary, "Contoso.Core"), vec!["1.0.0-alpha"]);
}

#[test]
fn test_max_age_threshold() {
    let share = Share::new();
    share
        .add("Old", "1.0.0-rc", 20 * DAY)
        .add("Fresh", "1.0.0-rc", DAY);

    let summary = share.run(CleanMode::DryRun, policies(false, false, Some(14)));
    assert_eq!(plan_of(&summary, "Old"), vec!["1.0.0-rc"]);
    assert!(plan_of(&summary, "Fresh").is_empty());
}

#[test]
fn test_invalid_version_dir_is_reported_and_skipped() {
    let share = Share::new();
    share
        .add_dir("Contoso.Core", "not-a-version")
        .add("Contoso.Core", "1.0.0-beta", DAY)
        .add("Contoso.Core", "1.0.0", DAY);

    let summary = share.run(CleanMode::Execute, policies(true, false, None));
    let package = &summary.packages[0];

    assert_eq!(package.invalid_versions.len(), 1);
    assert_eq!(package.invalid_versions[0].name, "not-a-version");
    assert_eq!(summary.versions_removed, 1);
    assert!(share.exists("Contoso.Core", "not-a-version"));
    assert!(share.exists("Contoso.Core", "1.0.0"));

    let log = std::fs::read_to_string(summary.log_path.unwrap()).unwrap();
    assert!(log.contains("Invalid version detected ["));
    assert!(log.contains("not-a-version"));
}

#[test]
fn test_irregular_artifacts_only_skip_max_age() {
    let share = Share::new();
    share
        .add_with_files("Contoso.Core", "2.0.0-rc", 2, 100 * DAY)
        .add("Contoso.Core", "2.0.0", DAY);

    let age_only = share.run(CleanMode::DryRun, policies(false, false, Some(14)));
    let package = &age_only.packages[0];
    assert!(package.plan.is_empty());
    assert_eq!(package.evaluation.artifact_diagnostics.len(), 1);

    let combined = share.run(CleanMode::DryRun, policies(true, true, Some(14)));
    assert_eq!(plan_of(&combined, "Contoso.Core"), vec!["2.0.0-rc"]);
}

// ─── Modes and the run log ──────────────────────────────────────────────────

#[test]
fn test_dry_run_mutates_nothing_and_writes_no_log() {
    let share = Share::new();
    share
        .add("Contoso.Core", "1.0.0-alpha", 30 * DAY)
        .add("Contoso.Core", "1.0.0", 30 * DAY)
        .add("Contoso.Web", "2.0.0-beta", 30 * DAY);

    let summary = share.run(CleanMode::DryRun, policies(true, true, Some(7)));

    assert_eq!(summary.versions_planned, 2);
    assert_eq!(summary.versions_removed, 0);
    assert!(summary.log_path.is_none());
    assert!(share.log_files().is_empty());
    assert!(share.exists("Contoso.Core", "1.0.0-alpha"));
    assert!(share.exists("Contoso.Web", "2.0.0-beta"));
}

#[test]
fn test_execute_writes_one_log_with_all_sections() {
    let share = Share::new();
    share
        .add("A.Package", "1.0.0-alpha", DAY)
        .add("A.Package", "1.0.0", DAY)
        .add("B.Package", "3.0.0-rc", DAY);

    let summary = share.run(CleanMode::Execute, policies(true, false, None));

    let logs = share.log_files();
    assert_eq!(logs.len(), 1);
    let name = logs[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("nuget-janitor-run-log-"));
    assert!(name.ends_with(".txt"));
    assert_eq!(summary.log_path.as_deref(), Some(logs[0].as_path()));

    let log = std::fs::read_to_string(&logs[0]).unwrap();
    assert!(log.starts_with(&format!(
        "Starting cleanup for source [{}]",
        share.source().display()
    )));
    assert!(log.contains("Cleaning package with id [A.Package]"));
    assert!(log.contains("Cleaning package with id [B.Package]"));
    assert!(log.contains("Removing packages with versions [1.0.0-alpha]"));
    assert!(log.contains("Removing packages with versions []"));
    assert_eq!(log.lines().last(), Some("Removed [1] packages"));
}

#[test]
fn test_removed_count_matches_successful_deletions() {
    let share = Share::new();
    share
        .add("Contoso.Core", "1.0.0-alpha", DAY)
        .add("Contoso.Core", "1.0.0-beta", DAY)
        .add("Contoso.Core", "1.0.0", DAY)
        .add("Contoso.Web", "1.0.0-rc", DAY)
        .add("Contoso.Web", "1.0.0", DAY);

    let summary = share.run(CleanMode::Execute, policies(true, true, None));

    let deleted = ["1.0.0-alpha", "1.0.0-beta"]
        .iter()
        .filter(|v| !share.exists("Contoso.Core", v))
        .count()
        + usize::from(!share.exists("Contoso.Web", "1.0.0-rc"));
    assert_eq!(summary.versions_removed, deleted);
    assert_eq!(summary.versions_removed, 3);
}

#[test]
fn test_policies_overlap_removes_once() {
    let share = Share::new();
    share
        .add("Contoso.Core", "1.0.0-alpha", 30 * DAY)
        .add("Contoso.Core", "1.0.0", 30 * DAY);

    let summary = share.run(CleanMode::Execute, policies(true, true, Some(7)));
    let package = &summary.packages[0];

    for kind in [PolicyKind::Released, PolicyKind::LaterRelease, PolicyKind::MaxAge] {
        let found = package.evaluation.finding(kind).unwrap();
        assert_eq!(found.len(), 1, "{} should select 1.0.0-alpha", kind);
    }
    assert_eq!(package.plan.len(), 1);
    assert_eq!(summary.versions_removed, 1);
    assert!(!summary.any_errors);
}

#[test]
fn test_packages_are_independent() {
    let share = Share::new();
    share
        .add("A", "1.0.0-alpha", DAY)
        .add("B", "1.0.0", DAY)
        .add("B", "2.0.0-alpha", DAY);

    let summary = share.run(CleanMode::DryRun, policies(true, true, None));
    assert!(plan_of(&summary, "A").is_empty());
    assert!(plan_of(&summary, "B").is_empty());
}

#[test]
fn test_empty_source() {
    let share = Share::new();
    let summary = share.run(CleanMode::Execute, policies(true, true, Some(1)));
    assert!(summary.packages.is_empty());
    assert_eq!(summary.versions_removed, 0);
    assert_eq!(share.log_files().len(), 1);
}

#[test]
fn test_missing_source_touches_nothing() {
    let share = Share::new();
    let mut options = RunOptions::new(None, CleanMode::Execute, policies(true, true, None));
    options.log_dir = share.logs();

    let err = Janitor::new(options).run().unwrap_err();
    assert!(matches!(err, JanitorError::MissingSource));
    assert!(share.log_files().is_empty());
}

#[test]
fn test_unwritable_log_dir_is_fatal() {
    let share = Share::new();
    share
        .add("Contoso.Core", "1.0.0-alpha", DAY)
        .add("Contoso.Core", "1.0.0", DAY);

    let mut options = RunOptions::new(
        Some(share.source()),
        CleanMode::Execute,
        policies(true, false, None),
    );
    options.log_dir = share.dir.path().join("no-such-dir");

    let err = Janitor::new(options).run().unwrap_err();
    assert!(matches!(err, JanitorError::Log { .. }));
    assert!(share.exists("Contoso.Core", "1.0.0-alpha"));
}

#[test]
fn test_files_in_source_root_are_ignored() {
    let share = Share::new();
    std::fs::write(share.source().join("index.json"), "{}").unwrap();
    share.add("Contoso.Core", "1.0.0", DAY);

    let summary = share.run(CleanMode::DryRun, policies(true, true, None));
    assert_eq!(summary.packages.len(), 1);
    assert_eq!(summary.packages[0].package_id, "Contoso.Core");
}

#[test]
fn test_source_may_be_given_with_trailing_separator() {
    let share = Share::new();
    share
        .add("Contoso.Core", "1.0.0-alpha", DAY)
        .add("Contoso.Core", "1.0.0", DAY);

    let source = PathBuf::from(format!("{}/", share.source().display()));
    let mut options = RunOptions::new(Some(source), CleanMode::Execute, policies(true, false, None));
    options.log_dir = share.logs();

    let summary = Janitor::new(options).run().unwrap();
    assert_eq!(summary.versions_removed, 1);
    assert!(!summary.any_errors);
    assert!(!Path::new(&share.version_dir("Contoso.Core", "1.0.0-alpha")).exists());
}

// ─── Deletion failures ──────────────────────────────────────────────────────

/// Deletes like the real thing, except that every `1.0.0-beta` is locked
fn refuse_beta(path: &Path) -> std::io::Result<()> {
    if path.ends_with("1.0.0-beta") {
        return Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "directory is locked",
        ));
    }
    std::fs::remove_dir_all(path)
}

#[test]
fn test_failed_deletion_is_flagged_and_run_continues() {
    let share = Share::new();
    share
        .add("Contoso.Core", "1.0.0-alpha", DAY)
        .add("Contoso.Core", "1.0.0-beta", DAY)
        .add("Contoso.Core", "1.0.0-rc", DAY)
        .add("Contoso.Core", "1.0.0", DAY)
        .add("Contoso.Web", "2.0.0-alpha", DAY)
        .add("Contoso.Web", "2.0.0", DAY);

    let mut options = RunOptions::new(
        Some(share.source()),
        CleanMode::Execute,
        policies(true, false, None),
    );
    options.log_dir = share.logs();
    options.remove_dir = refuse_beta;

    let summary = Janitor::new(options).run().unwrap();

    assert!(summary.any_errors);
    assert_eq!(summary.versions_planned, 4);
    assert_eq!(summary.versions_removed, 3);
    assert!(share.exists("Contoso.Core", "1.0.0-beta"));
    assert!(!share.exists("Contoso.Core", "1.0.0-alpha"));
    assert!(!share.exists("Contoso.Core", "1.0.0-rc"));
    assert!(!share.exists("Contoso.Web", "2.0.0-alpha"));

    let failing: Vec<&str> = summary
        .packages_with_errors()
        .map(|p| p.package_id.as_str())
        .collect();
    assert_eq!(failing, vec!["Contoso.Core"]);

    let log = std::fs::read_to_string(summary.log_path.unwrap()).unwrap();
    let failure_lines: Vec<&str> = log
        .lines()
        .filter(|l| l.starts_with("Failed to remove ["))
        .collect();
    assert_eq!(failure_lines.len(), 1);
    assert!(failure_lines[0].contains("1.0.0-beta"));
    assert!(log.contains("Cleaning package with id [Contoso.Web]"));
    assert_eq!(log.lines().last(), Some("Removed [3] packages"));
}
