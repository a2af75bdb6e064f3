use crate::catalog::Catalog;

use super::RemovalSet;

/// Pre-releases whose exact release is in the catalog.
///
/// For a pre-release at index `i` whose base release sits at index `j`,
/// everything in `i..j` goes. The catalog is sorted, so that range only
/// ever holds pre-releases of the same `MAJOR.MINOR.PATCH`.
pub fn find_with_release(catalog: &Catalog) -> RemovalSet {
    let entries = catalog.entries();

    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.version.is_prerelease())
        .filter_map(|(index, entry)| {
            catalog
                .position(&entry.version.base())
                .filter(|&release_index| release_index > index)
                .map(|release_index| index..release_index)
        })
        .flat_map(move |range| entries[range].iter())
        .filter(|entry| entry.version.is_prerelease())
        .map(|entry| entry.version.clone())
        .collect()
}
