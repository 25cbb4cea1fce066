//! Resolution results.

use corelib::TopologySnapshot;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Minimum known-size a reported view needs to be trusted.
///
/// `floor(n / 2) + 1` for a previously known cluster of `n` members, and `0`
/// when nothing was known yet so that any report qualifies.
pub fn majority_threshold(current_len: usize) -> usize {
    if current_len == 0 {
        0
    } else {
        current_len / 2 + 1
    }
}

/// How the chosen snapshot was arrived at.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionOutcome {
    /// No reports were available; the current snapshot is kept.
    Unchanged,
    /// A view meeting the majority threshold was chosen.
    Qualified,
    /// No view met the threshold. The first-seen view was chosen anyway.
    ///
    /// Degraded but not fatal: routing continues, and the caller should
    /// surface it so prolonged disagreement is noticed.
    UnqualifiedMajority,
}

impl ResolutionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionOutcome::Unchanged => "unchanged",
            ResolutionOutcome::Qualified => "qualified",
            ResolutionOutcome::UnqualifiedMajority => "unqualified-majority",
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ResolutionOutcome::UnqualifiedMajority)
    }
}

impl fmt::Display for ResolutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The snapshot to adopt, tagged with its outcome.
///
/// `snapshot` is always either `current` or one of the reported snapshots,
/// shared by pointer; strategies never synthesize a new view.
#[derive(Clone, Debug)]
pub struct Resolution {
    pub snapshot: Arc<TopologySnapshot>,
    pub outcome: ResolutionOutcome,
}

impl Resolution {
    pub fn unchanged(current: &Arc<TopologySnapshot>) -> Self {
        Self {
            snapshot: Arc::clone(current),
            outcome: ResolutionOutcome::Unchanged,
        }
    }

    pub fn new(snapshot: Arc<TopologySnapshot>, outcome: ResolutionOutcome) -> Self {
        Self { snapshot, outcome }
    }

    /// True if the chosen snapshot is a different object than `current`.
    pub fn replaces(&self, current: &Arc<TopologySnapshot>) -> bool {
        !Arc::ptr_eq(&self.snapshot, current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_majority_threshold() {
        assert_eq!(majority_threshold(0), 0);
        assert_eq!(majority_threshold(1), 1);
        assert_eq!(majority_threshold(2), 2);
        assert_eq!(majority_threshold(3), 2);
        assert_eq!(majority_threshold(4), 3);
        assert_eq!(majority_threshold(5), 3);
        assert_eq!(majority_threshold(6), 4);
    }

    #[test]
    fn test_unchanged_keeps_pointer() {
        let current = Arc::new(TopologySnapshot::empty());
        let resolution = Resolution::unchanged(&current);
        assert!(!resolution.replaces(&current));
        assert_eq!(resolution.outcome, ResolutionOutcome::Unchanged);
    }
}
