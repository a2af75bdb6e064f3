use crate::catalog::{Catalog, CatalogEntry, SemanticVersion};

use super::RemovalSet;

/// Pre-releases superseded by a release of the same or a later version.
///
/// For each pre-release the catalog is scanned from the start for the
/// first entry that either has a strictly greater base version, or is the
/// exact release of the pre-release's base. Everything from the
/// pre-release up to (not including) that entry is marked.
pub fn find_with_later_release(catalog: &Catalog) -> RemovalSet {
    let entries = catalog.entries();

    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.version.is_prerelease())
        .filter_map(|(index, entry)| {
            let base = entry.version.base();
            entries
                .iter()
                .position(|candidate| supersedes(candidate, &base))
                .filter(|&found| found > index)
                .map(|found| index..found)
        })
        .flat_map(move |range| entries[range].iter())
        .filter(|entry| entry.version.is_prerelease())
        .map(|entry| entry.version.clone())
        .collect()
}

fn supersedes(candidate: &CatalogEntry, base: &SemanticVersion) -> bool {
    let candidate_base = candidate.version.base();
    candidate_base > *base || (candidate_base == *base && !candidate.version.is_prerelease())
}
