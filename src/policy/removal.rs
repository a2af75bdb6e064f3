use serde::Serialize;
use std::collections::BTreeSet;

use crate::catalog::SemanticVersion;

/// Versions selected for removal, ordered by version precedence.
///
/// Built once by collecting a policy's output and read-only afterwards;
/// combining two sets produces a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RemovalSet(BTreeSet<SemanticVersion>);

impl RemovalSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, version: &SemanticVersion) -> bool {
        self.0.contains(version)
    }

    /// Ascending iteration
    pub fn iter(&self) -> impl Iterator<Item = &SemanticVersion> {
        self.0.iter()
    }

    /// Versions in both sets, each once
    pub fn union(&self, other: &RemovalSet) -> RemovalSet {
        self.0.union(&other.0).cloned().collect()
    }
}

impl FromIterator<SemanticVersion> for RemovalSet {
    fn from_iter<I: IntoIterator<Item = SemanticVersion>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RemovalSet {
    type Item = &'a SemanticVersion;
    type IntoIter = std::collections::btree_set::Iter<'a, SemanticVersion>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
