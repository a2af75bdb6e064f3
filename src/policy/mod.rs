pub mod max_age;
pub mod released;
pub mod removal;
pub mod superseded;

pub use max_age::{find_expired, ArtifactDiagnostic, MaxAgeOutcome};
pub use released::find_with_release;
pub use removal::RemovalSet;
pub use superseded::find_with_later_release;

use serde::Serialize;
use std::time::{Duration, SystemTime};

use crate::catalog::Catalog;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Retention policies that can select pre-releases for removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Pre-releases whose exact release exists
    Released,
    /// Pre-releases superseded by the same or a later release
    LaterRelease,
    /// Pre-releases whose artifact is older than the threshold
    MaxAge,
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyKind::Released => write!(f, "released"),
            PolicyKind::LaterRelease => write!(f, "later_release"),
            PolicyKind::MaxAge => write!(f, "max_age"),
        }
    }
}

/// Which policies are switched on for a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionPolicies {
    pub remove_released: bool,
    pub remove_with_later: bool,
    /// Active only when set and non-zero
    pub max_age: Option<Duration>,
    pub artifact_extension: String,
}

/// One policy's findings for a package
#[derive(Debug, Clone, Serialize)]
pub struct PolicyFinding {
    pub policy: PolicyKind,
    pub versions: RemovalSet,
}

/// Everything the enabled policies decided for one package
#[derive(Debug, Clone, Default, Serialize)]
pub struct Evaluation {
    pub findings: Vec<PolicyFinding>,
    pub combined: RemovalSet,
    pub artifact_diagnostics: Vec<ArtifactDiagnostic>,
}

impl RetentionPolicies {
    /// The max-age threshold in whole days. A day count too large to
    /// represent in seconds saturates, so nothing is ever old enough.
    pub fn with_max_age_days(mut self, days: Option<u64>) -> Self {
        self.max_age = days.filter(|d| *d > 0).map(|d| {
            d.checked_mul(SECS_PER_DAY)
                .map(Duration::from_secs)
                .unwrap_or(Duration::MAX)
        });
        self
    }

    pub fn max_age_days(&self) -> Option<u64> {
        self.max_age.map(|d| d.as_secs() / SECS_PER_DAY)
    }

    pub fn any_enabled(&self) -> bool {
        self.remove_released || self.remove_with_later || self.max_age_enabled()
    }

    fn max_age_enabled(&self) -> bool {
        matches!(self.max_age, Some(d) if !d.is_zero())
    }

    /// Run every enabled policy against the full catalog and union the
    /// results. Each policy sees the same catalog; none depends on what
    /// another already marked.
    pub fn evaluate(&self, catalog: &Catalog, now: SystemTime) -> Evaluation {
        let mut evaluation = Evaluation::default();

        if self.remove_released {
            evaluation.add(PolicyKind::Released, find_with_release(catalog));
        }

        if self.remove_with_later {
            evaluation.add(PolicyKind::LaterRelease, find_with_later_release(catalog));
        }

        if let Some(max_age) = self.max_age.filter(|d| !d.is_zero()) {
            let outcome = find_expired(catalog, max_age, now, &self.artifact_extension);
            evaluation.artifact_diagnostics = outcome.diagnostics;
            evaluation.add(PolicyKind::MaxAge, outcome.removals);
        }

        evaluation
    }
}

impl Evaluation {
    fn add(&mut self, policy: PolicyKind, versions: RemovalSet) {
        self.combined = self.combined.union(&versions);
        self.findings.push(PolicyFinding { policy, versions });
    }

    pub fn finding(&self, policy: PolicyKind) -> Option<&RemovalSet> {
        self.findings
            .iter()
            .find(|f| f.policy == policy)
            .map(|f| &f.versions)
    }
}
