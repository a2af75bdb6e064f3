use std::path::Path;

use crate::catalog::SemanticVersion;

/// Check whether `path` may be deleted by a run over `source_root`.
///
/// Only a directory sitting exactly at `<source>/<packageId>/<version>`
/// whose name is a pre-release version qualifies. Release directories,
/// package directories, the source root itself and anything outside it
/// are refused.
pub fn is_removable_version_dir(source_root: &Path, path: &Path) -> bool {
    let package_dir = match path.parent() {
        Some(p) => p,
        None => return false,
    };

    if package_dir.parent() != Some(source_root) {
        return false;
    }

    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.parse::<SemanticVersion>().ok())
        .map(|v| v.is_prerelease())
        .unwrap_or(false)
}
