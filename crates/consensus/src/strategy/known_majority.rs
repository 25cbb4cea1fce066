//! Known-majority consensus strategy.
//!
//! Prefers the most complete view of the cluster, but only among views that
//! know at least a majority of the previously known members. Completeness is a
//! better freshness signal than raw votes: a stale majority that has not yet
//! seen a newly added node must not outvote the nodes that have.
//!
//! # Algorithm
//!
//! 1. `threshold = floor(n / 2) + 1` for `n` current members (`0` if `n == 0`)
//! 2. Classify reports by member set, in first-seen order
//! 3. Among classes with `known_size >= threshold`, pick the largest
//!    known-size, then the most votes, then the earliest
//! 4. If none qualifies, fall back to the first-seen class and tag the
//!    result [`ResolutionOutcome::UnqualifiedMajority`]
//! 5. With no reports at all, keep `current`
//!
//! # Limitations
//!
//! Below the threshold no view is trustworthy enough to prefer one minority
//! fragment over another, so the fallback choice is arbitrary (but stable).

use crate::classifier::classify;
use crate::resolution::{majority_threshold, Resolution, ResolutionOutcome};
use crate::strategy::{first_best, ConsensusStrategy};
use corelib::{TopologyReportSet, TopologySnapshot};
use std::sync::Arc;
use tracing::debug;

/// Known-majority consensus: most complete view that knows a majority.
#[derive(Debug, Clone, Copy, Default)]
pub struct KnownMajority;

impl ConsensusStrategy for KnownMajority {
    fn resolve(&self, current: &Arc<TopologySnapshot>, reports: &TopologyReportSet) -> Resolution {
        let classes = classify(reports);
        let Some(first_seen) = classes.first() else {
            return Resolution::unchanged(current);
        };

        let threshold = majority_threshold(current.len());
        let qualified = classes.iter().filter(|c| c.known_size() >= threshold);

        match first_best(qualified, |c| (c.known_size(), c.votes())) {
            Some(chosen) => {
                debug!(
                    threshold,
                    classes = classes.len(),
                    known_size = chosen.known_size(),
                    votes = chosen.votes(),
                    "known-majority chose qualified view"
                );
                Resolution::new(Arc::clone(chosen.representative()), ResolutionOutcome::Qualified)
            }
            None => {
                debug!(
                    threshold,
                    classes = classes.len(),
                    known_size = first_seen.known_size(),
                    "no view knows a majority, falling back to first seen"
                );
                Resolution::new(
                    Arc::clone(first_seen.representative()),
                    ResolutionOutcome::UnqualifiedMajority,
                )
            }
        }
    }

    fn name(&self) -> &'static str {
        "KnownMajority"
    }
}
