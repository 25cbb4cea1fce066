//! Equivalence classification of topology reports.
//!
//! Reports that agree on *who is in the cluster* are grouped into one
//! [`EquivalenceClass`]. Roles, slots and link-state flags are ignored: only
//! the set of member ids matters for the vote.
//!
//! # Algorithm
//!
//! 1. Walk the report set in first-seen order
//! 2. Fingerprint each snapshot's sorted member ids with xxh3
//! 3. Look up candidate classes with the same fingerprint and confirm with a
//!    full set comparison (fingerprints only narrow the search)
//! 4. Join the matching class or open a new one at the end of the list
//!
//! # Performance
//!
//! - **Time**: O(r * m log m) where r = reports, m = members per report
//! - **Space**: O(r) classes plus the fingerprint index

use corelib::{NodeAddress, TopologyReportSet, TopologySnapshot};
use std::collections::HashMap;
use std::sync::Arc;
use xxhash_rust::xxh3::Xxh3;

/// A group of reports that agree on cluster membership.
#[derive(Clone, Debug)]
pub struct EquivalenceClass {
    representative: Arc<TopologySnapshot>,
    votes: usize,
    sources: Vec<NodeAddress>,
}

impl EquivalenceClass {
    fn open(source: &NodeAddress, snapshot: &Arc<TopologySnapshot>) -> Self {
        Self {
            representative: Arc::clone(snapshot),
            votes: 1,
            sources: vec![source.clone()],
        }
    }

    /// First snapshot seen with this member set.
    pub fn representative(&self) -> &Arc<TopologySnapshot> {
        &self.representative
    }

    /// Number of reports in this class.
    pub fn votes(&self) -> usize {
        self.votes
    }

    /// Member count shared by every snapshot in this class.
    pub fn known_size(&self) -> usize {
        self.representative.len()
    }

    /// Queried addresses whose reports fell into this class, in order.
    pub fn sources(&self) -> &[NodeAddress] {
        &self.sources
    }
}

/// Order-independent fingerprint of a snapshot's member ids.
pub fn membership_fingerprint(snapshot: &TopologySnapshot) -> u64 {
    let mut hasher = Xxh3::new();
    for id in snapshot.member_ids() {
        // Length prefix keeps ["ab", "c"] apart from ["a", "bc"].
        hasher.update(&(id.as_str().len() as u64).to_le_bytes());
        hasher.update(id.as_str().as_bytes());
    }
    hasher.digest()
}

/// Partition `reports` into equivalence classes, in first-seen order.
///
/// Pure function of its input; an empty report set yields no classes.
pub fn classify(reports: &TopologyReportSet) -> Vec<EquivalenceClass> {
    let mut classes: Vec<EquivalenceClass> = Vec::new();
    let mut by_fingerprint: HashMap<u64, Vec<usize>> = HashMap::new();

    for (source, snapshot) in reports.iter() {
        let candidates = by_fingerprint
            .entry(membership_fingerprint(snapshot))
            .or_default();

        let existing = candidates
            .iter()
            .copied()
            .find(|&idx| classes[idx].representative.is_equivalent(snapshot));

        match existing {
            Some(idx) => {
                let class = &mut classes[idx];
                class.votes += 1;
                class.sources.push(source.clone());
            }
            None => {
                candidates.push(classes.len());
                classes.push(EquivalenceClass::open(source, snapshot));
            }
        }
    }

    classes
}
