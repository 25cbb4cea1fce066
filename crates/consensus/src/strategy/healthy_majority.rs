//! Healthy-majority consensus strategy.
//!
//! Votes for the view that reports the most healthy members, i.e. members not
//! flagged `fail`, `eventual-fail` or `noaddr`. Useful when a failover is in
//! progress and the freshest reports are the ones that already see the failed
//! nodes marked as such.

use crate::classifier::classify;
use crate::resolution::{majority_threshold, Resolution, ResolutionOutcome};
use crate::strategy::ConsensusStrategy;
use corelib::{NodeAddress, TopologyReportSet, TopologySnapshot};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Healthy-majority consensus: view with the most healthy members.
///
/// Every report is scored on its own health, so two reports that agree on
/// membership but not on failure flags are told apart. Ties go to the report
/// whose member set has more votes, then to the first seen.
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthyMajority;

impl ConsensusStrategy for HealthyMajority {
    fn resolve(&self, current: &Arc<TopologySnapshot>, reports: &TopologyReportSet) -> Resolution {
        let classes = classify(reports);
        let votes: HashMap<&NodeAddress, usize> = classes
            .iter()
            .flat_map(|c| c.sources().iter().map(move |source| (source, c.votes())))
            .collect();

        let best = reports
            .iter()
            .map(|(source, snapshot)| {
                let class_votes = votes.get(source).copied().unwrap_or(1);
                (snapshot, snapshot.healthy_count(), class_votes)
            })
            .min_by_key(|&(_, healthy, class_votes)| Reverse((healthy, class_votes)));
        let Some((chosen, healthy, class_votes)) = best else {
            return Resolution::unchanged(current);
        };

        let threshold = majority_threshold(current.len());
        let outcome = if healthy >= threshold {
            ResolutionOutcome::Qualified
        } else {
            ResolutionOutcome::UnqualifiedMajority
        };

        debug!(threshold, healthy, votes = class_votes, %outcome, "healthy-majority chose view");
        Resolution::new(Arc::clone(chosen), outcome)
    }

    fn name(&self) -> &'static str {
        "HealthyMajority"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::{NodeAddress, NodeDescriptor, NodeFlag};

    fn addr(port: u16) -> NodeAddress {
        NodeAddress::new("127.0.0.1", port)
    }

    fn healthy(id: &str) -> NodeDescriptor {
        NodeDescriptor::new(id, addr(7000))
    }

    fn failed(id: &str) -> NodeDescriptor {
        healthy(id).with_flag(NodeFlag::Fail)
    }

    #[test]
    fn test_prefers_most_healthy_view() {
        let current = Arc::new(
            TopologySnapshot::new(vec![healthy("a"), healthy("b"), healthy("c")]).unwrap(),
        );
        let mut reports = TopologyReportSet::new();
        reports.insert(
            addr(1),
            TopologySnapshot::new(vec![healthy("a"), failed("b"), failed("c")]).unwrap(),
        );
        reports.insert(
            addr(2),
            TopologySnapshot::new(vec![healthy("a"), healthy("b")]).unwrap(),
        );

        let resolution = HealthyMajority.resolve(&current, &reports);
        assert_eq!(resolution.outcome, ResolutionOutcome::Qualified);
        assert!(Arc::ptr_eq(&resolution.snapshot, reports.get(&addr(2)).unwrap()));
    }

    #[test]
    fn test_same_members_scored_per_report() {
        let current = Arc::new(
            TopologySnapshot::new(vec![healthy("a"), healthy("b"), healthy("c")]).unwrap(),
        );
        let mut reports = TopologyReportSet::new();
        reports.insert(
            addr(1),
            TopologySnapshot::new(vec![healthy("a"), failed("b"), failed("c")]).unwrap(),
        );
        reports.insert(
            addr(2),
            TopologySnapshot::new(vec![healthy("a"), healthy("b"), healthy("c")]).unwrap(),
        );
        reports.insert(
            addr(3),
            TopologySnapshot::new(vec![healthy("a"), healthy("b")]).unwrap(),
        );

        let resolution = HealthyMajority.resolve(&current, &reports);
        assert_eq!(resolution.outcome, ResolutionOutcome::Qualified);
        assert_eq!(resolution.snapshot.healthy_count(), 3);
        assert!(Arc::ptr_eq(&resolution.snapshot, reports.get(&addr(2)).unwrap()));
    }

    #[test]
    fn test_health_ties_go_to_more_votes() {
        let current = Arc::new(TopologySnapshot::empty());
        let mut reports = TopologyReportSet::new();
        reports.insert(addr(1), TopologySnapshot::new(vec![healthy("a"), failed("x")]).unwrap());
        reports.insert(addr(2), TopologySnapshot::new(vec![healthy("b"), healthy("c")]).unwrap());
        reports.insert(addr(3), TopologySnapshot::new(vec![healthy("a"), healthy("x")]).unwrap());

        // Reports 2 and 3 both see two healthy members; {a, x} has two votes.
        let resolution = HealthyMajority.resolve(&current, &reports);
        assert!(Arc::ptr_eq(&resolution.snapshot, reports.get(&addr(3)).unwrap()));
    }

    #[test]
    fn test_unqualified_when_few_healthy() {
        let current = Arc::new(
            TopologySnapshot::new(vec![healthy("a"), healthy("b"), healthy("c")]).unwrap(),
        );
        let mut reports = TopologyReportSet::new();
        reports.insert(
            addr(1),
            TopologySnapshot::new(vec![healthy("a"), failed("b"), failed("c")]).unwrap(),
        );

        let resolution = HealthyMajority.resolve(&current, &reports);
        assert_eq!(resolution.outcome, ResolutionOutcome::UnqualifiedMajority);
        assert_eq!(resolution.snapshot.len(), 3);
    }

    #[test]
    fn test_empty_reports_keep_current() {
        let current = Arc::new(TopologySnapshot::empty());
        let resolution = HealthyMajority.resolve(&current, &TopologyReportSet::new());
        assert_eq!(resolution.outcome, ResolutionOutcome::Unchanged);
        assert!(Arc::ptr_eq(&resolution.snapshot, &current));
    }
}
