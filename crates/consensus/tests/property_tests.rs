// Property-based tests for consensus strategies
//
// Uses proptest to generate random clusters and report sets, validating the
// invariants every resolution must hold:
// 1. Unanimous agreement is adopted
// 2. Unqualified views never beat a qualified one
// 3. Among qualified views the largest wins
// 4. Empty report sets are a no-op
// 5. The result is always a reported snapshot (never synthesized)
// 6. Re-running on the same input gives the same answer

use consensus::{
    classify, majority_threshold, ConsensusStrategy, HealthyMajority, KnownMajority,
    ResolutionOutcome,
};
use corelib::{NodeAddress, NodeDescriptor, TopologyReportSet, TopologySnapshot};
use proptest::prelude::*;
use std::sync::Arc;

fn snapshot(ids: &[u8]) -> TopologySnapshot {
    TopologySnapshot::new(
        ids.iter()
            .map(|id| NodeDescriptor::new(format!("n{}", id), NodeAddress::new("10.0.0.1", 7000)))
            .collect(),
    )
    .unwrap()
}

fn sorted_unique(mut ids: Vec<u8>) -> Vec<u8> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

// Up to 8 member ids drawn from a universe of 10.
fn member_ids() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..10, 0..8).prop_map(sorted_unique)
}

fn report_set(views: &[Vec<u8>]) -> TopologyReportSet {
    views
        .iter()
        .enumerate()
        .map(|(i, ids)| (NodeAddress::new("10.0.1.1", 7000 + i as u16), snapshot(ids)))
        .collect()
}

proptest! {
    #[test]
    fn prop_unanimous_agreement_is_adopted(
        ids in prop::collection::vec(0u8..10, 1..8).prop_map(sorted_unique),
        copies in 1usize..6,
    ) {
        let current = Arc::new(snapshot(&ids));
        let views = vec![ids.clone(); copies];
        let reports = report_set(&views);

        let resolution = KnownMajority.resolve(&current, &reports);
        prop_assert_eq!(resolution.outcome, ResolutionOutcome::Qualified);
        prop_assert!(resolution.snapshot.is_equivalent(&current));
    }

    #[test]
    fn prop_qualified_view_always_wins(
        current_ids in member_ids(),
        views in prop::collection::vec(member_ids(), 1..6),
    ) {
        let current = Arc::new(snapshot(&current_ids));
        let reports = report_set(&views);
        let threshold = majority_threshold(current.len());

        let resolution = KnownMajority.resolve(&current, &reports);
        let max_qualified = views.iter().map(Vec::len).filter(|&n| n >= threshold).max();

        match max_qualified {
            Some(size) => {
                prop_assert_eq!(resolution.outcome, ResolutionOutcome::Qualified);
                prop_assert_eq!(resolution.snapshot.len(), size);
            }
            None => {
                prop_assert_eq!(resolution.outcome, ResolutionOutcome::UnqualifiedMajority);
                let first = reports.snapshots().next().unwrap();
                prop_assert!(resolution.snapshot.is_equivalent(first));
            }
        }
    }

    #[test]
    fn prop_empty_reports_are_noop(current_ids in member_ids()) {
        let current = Arc::new(snapshot(&current_ids));
        let reports = TopologyReportSet::new();

        for strategy in [&KnownMajority as &dyn ConsensusStrategy, &HealthyMajority] {
            let resolution = strategy.resolve(&current, &reports);
            prop_assert_eq!(resolution.outcome, ResolutionOutcome::Unchanged);
            prop_assert!(Arc::ptr_eq(&resolution.snapshot, &current));
        }
    }

    #[test]
    fn prop_result_is_a_reported_snapshot(
        current_ids in member_ids(),
        views in prop::collection::vec(member_ids(), 1..6),
    ) {
        let current = Arc::new(snapshot(&current_ids));
        let reports = report_set(&views);

        for strategy in [&KnownMajority as &dyn ConsensusStrategy, &HealthyMajority] {
            let resolution = strategy.resolve(&current, &reports);
            prop_assert!(reports.snapshots().any(|s| Arc::ptr_eq(s, &resolution.snapshot)));

            let again = strategy.resolve(&current, &reports);
            prop_assert!(Arc::ptr_eq(&again.snapshot, &resolution.snapshot));
        }
    }

    #[test]
    fn prop_classes_partition_the_reports(
        views in prop::collection::vec(member_ids(), 0..8),
    ) {
        let reports = report_set(&views);
        let classes = classify(&reports);

        let total: usize = classes.iter().map(|c| c.votes()).sum();
        prop_assert_eq!(total, reports.len());

        for (i, a) in classes.iter().enumerate() {
            for b in &classes[i + 1..] {
                prop_assert!(!a.representative().is_equivalent(b.representative()));
            }
        }
    }
}
