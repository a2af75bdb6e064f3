pub mod version;

pub use version::{SemanticVersion, VersionParseError};

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// One version directory of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub version: SemanticVersion,
    pub path: PathBuf,
}

/// A version directory that was left out of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionDiagnostic {
    pub name: String,
    pub path: PathBuf,
    pub reason: String,
}

/// The versions of one package, sorted ascending and free of duplicates.
///
/// Directory names that are not versions never reach `entries`; each one
/// is kept in `diagnostics` instead.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    diagnostics: Vec<VersionDiagnostic>,
}

/// Parse a version directory's name
pub fn parse_version_dir(path: &Path) -> Result<SemanticVersion, VersionDiagnostic> {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => {
            return Err(VersionDiagnostic {
                name: path.to_string_lossy().to_string(),
                path: path.to_path_buf(),
                reason: "directory name is not valid UTF-8".to_string(),
            })
        }
    };

    name.parse::<SemanticVersion>().map_err(|e| VersionDiagnostic {
        name: name.to_string(),
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

impl Catalog {
    /// Build a catalog from version directory paths in any order
    pub fn from_version_dirs<I>(dirs: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut entries = Vec::new();
        let mut diagnostics = Vec::new();

        for path in dirs {
            match parse_version_dir(&path) {
                Ok(version) => entries.push(CatalogEntry { version, path }),
                Err(diagnostic) => {
                    warn!(
                        path = %diagnostic.path.display(),
                        reason = %diagnostic.reason,
                        "Skipping invalid version directory"
                    );
                    diagnostics.push(diagnostic);
                }
            }
        }

        entries.sort_by(|a, b| a.version.cmp(&b.version).then_with(|| a.path.cmp(&b.path)));

        // Keep the first directory for each version; later ones are reported
        let mut deduped: Vec<CatalogEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            match deduped.last() {
                Some(last) if last.version == entry.version => {
                    diagnostics.push(VersionDiagnostic {
                        name: entry
                            .path
                            .file_name()
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_default(),
                        reason: format!(
                            "duplicate of version {} at {}",
                            last.version,
                            last.path.display()
                        ),
                        path: entry.path,
                    });
                }
                _ => deduped.push(entry),
            }
        }

        Self {
            entries: deduped,
            diagnostics,
        }
    }

    /// Build a catalog from directory names under a package directory
    pub fn from_names<I, S>(package_dir: &Path, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_version_dirs(names.into_iter().map(|n| package_dir.join(n.as_ref())))
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn diagnostics(&self) -> &[VersionDiagnostic] {
        &self.diagnostics
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

    /// Index of a version in the sorted catalog
    pub fn position(&self, version: &SemanticVersion) -> Option<usize> {
        self.entries
            .binary_search_by(|e| e.version.cmp(version))
            .ok()
    }

    pub fn contains(&self, version: &SemanticVersion) -> bool {
        self.position(version).is_some()
    }

    /// Directory that holds a version
    pub fn path_of(&self, version: &SemanticVersion) -> Option<&Path> {
        self.position(version)
            .map(|i| self.entries[i].path.as_path())
    }
}
