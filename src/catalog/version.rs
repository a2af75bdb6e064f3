use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use semver::{BuildMetadata, Prerelease, Version};
use thiserror::Error;

/// A package version named `MAJOR.MINOR.PATCH[-PRERELEASE]`.
///
/// Ordering follows semantic-versioning precedence: a release sorts after
/// every pre-release of the same `MAJOR.MINOR.PATCH`, and pre-release
/// labels compare identifier by identifier. Build metadata is not part of
/// the accepted grammar, so equality and ordering agree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SemanticVersion(Version);

/// Why a directory name is not a version
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VersionParseError {
    #[error("not a semantic version: {0}")]
    Malformed(String),

    #[error("build metadata '+{0}' is not allowed in a version directory name")]
    BuildMetadata(String),
}

impl SemanticVersion {
    /// A release version with no pre-release label
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(Version::new(major, minor, patch))
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn patch(&self) -> u64 {
        self.0.patch
    }

    /// The pre-release label, if any
    pub fn prerelease(&self) -> Option<&str> {
        if self.0.pre.is_empty() {
            None
        } else {
            Some(self.0.pre.as_str())
        }
    }

    pub fn is_prerelease(&self) -> bool {
        !self.0.pre.is_empty()
    }

    /// The same `MAJOR.MINOR.PATCH` with the pre-release label stripped
    pub fn base(&self) -> SemanticVersion {
        SemanticVersion(Version {
            pre: Prerelease::EMPTY,
            build: BuildMetadata::EMPTY,
            ..self.0.clone()
        })
    }
}

impl FromStr for SemanticVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let version =
            Version::parse(s).map_err(|e| VersionParseError::Malformed(e.to_string()))?;
        if !version.build.is_empty() {
            return Err(VersionParseError::BuildMetadata(version.build.to_string()));
        }
        Ok(Self(version))
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
