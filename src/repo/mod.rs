//! Thin wrappers over the repository layout
//! `<source>/<packageId>/<version>/<artifactFile>`.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Subdirectories of `dir`, sorted by name for a stable processing order
pub fn list_subdirectories(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Package directories directly under the source root
pub fn list_packages(source: &Path) -> io::Result<Vec<PathBuf>> {
    list_subdirectories(source)
}

/// Version directories of one package
pub fn list_versions(package_dir: &Path) -> io::Result<Vec<PathBuf>> {
    list_subdirectories(package_dir)
}

/// Package artifact files in a version directory.
///
/// Only regular files whose extension matches `extension`
/// (case-insensitive) count; `.nuspec` and hash files are ignored.
pub fn list_artifacts(version_dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut artifacts = Vec::new();
    for entry in std::fs::read_dir(version_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(extension))
            .unwrap_or(false);
        if matches {
            artifacts.push(path);
        }
    }
    artifacts.sort();
    Ok(artifacts)
}

/// Last-modified time of an artifact
pub fn modified_time(path: &Path) -> io::Result<SystemTime> {
    std::fs::metadata(path)?.modified()
}

/// Final path component as a display string
pub fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
