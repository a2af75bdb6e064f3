use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

use crate::catalog::{Catalog, CatalogEntry, SemanticVersion};
use crate::repo;

use super::RemovalSet;

/// A version the max-age check had to skip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactDiagnostic {
    pub version: SemanticVersion,
    pub path: PathBuf,
    pub reason: String,
}

/// Result of the max-age policy for one package
#[derive(Debug, Clone, Default)]
pub struct MaxAgeOutcome {
    pub removals: RemovalSet,
    pub diagnostics: Vec<ArtifactDiagnostic>,
}

/// Pre-releases whose artifact is older than `max_age` at `now`.
///
/// A version directory must hold exactly one artifact with the given
/// extension. Anything else skips that version for this policy only.
pub fn find_expired(
    catalog: &Catalog,
    max_age: Duration,
    now: SystemTime,
    artifact_extension: &str,
) -> MaxAgeOutcome {
    let mut removals = Vec::new();
    let mut diagnostics = Vec::new();

    for entry in catalog.entries() {
        if !entry.version.is_prerelease() {
            continue;
        }

        match artifact_age(entry, now, artifact_extension) {
            Ok(age) if age > max_age => {
                debug!(version = %entry.version, age_secs = age.as_secs(), "Pre-release expired");
                removals.push(entry.version.clone());
            }
            Ok(_) => {}
            Err(reason) => {
                warn!(path = %entry.path.display(), %reason, "Skipping max-age check");
                diagnostics.push(ArtifactDiagnostic {
                    version: entry.version.clone(),
                    path: entry.path.clone(),
                    reason,
                });
            }
        }
    }

    MaxAgeOutcome {
        removals: removals.into_iter().collect(),
        diagnostics,
    }
}

/// Time since the version's single artifact was last modified.
/// A timestamp in the future counts as age zero.
fn artifact_age(
    entry: &CatalogEntry,
    now: SystemTime,
    artifact_extension: &str,
) -> Result<Duration, String> {
    let artifacts = repo::list_artifacts(&entry.path, artifact_extension)
        .map_err(|e| format!("failed to list version directory: {}", e))?;

    let artifact = match artifacts.as_slice() {
        [single] => single,
        other => {
            return Err(format!(
                "expected exactly one .{} file, found {}",
                artifact_extension,
                other.len()
            ))
        }
    };

    let modified = repo::modified_time(artifact)
        .map_err(|e| format!("failed to read modification time of {}: {}", artifact.display(), e))?;

    Ok(now.duration_since(modified).unwrap_or_default())
}
