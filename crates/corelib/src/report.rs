//! Topology report sets.
//!
//! One refresh round asks several nodes for their view of the cluster. The
//! answers are collected into a [`TopologyReportSet`], keyed by the address
//! that was queried. Nodes that failed or timed out are simply absent.
//!
//! The set remembers insertion order. That order is the "first-seen" order
//! consensus strategies use to break ties, so callers that need reproducible
//! results must insert reports in a fixed order.

use crate::node::NodeAddress;
use crate::topology::TopologySnapshot;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Insertion-ordered map from queried address to the snapshot it returned.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ReportEntry>", into = "Vec<ReportEntry>")]
pub struct TopologyReportSet {
    entries: Vec<(NodeAddress, Arc<TopologySnapshot>)>,
    positions: HashMap<NodeAddress, usize>,
}

/// Serialized form of one report.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportEntry {
    pub source: NodeAddress,
    pub nodes: TopologySnapshot,
}

impl TopologyReportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the snapshot reported by `source`.
    ///
    /// A repeated source keeps its original position and the previous
    /// snapshot is returned.
    pub fn insert(
        &mut self,
        source: NodeAddress,
        snapshot: impl Into<Arc<TopologySnapshot>>,
    ) -> Option<Arc<TopologySnapshot>> {
        let snapshot = snapshot.into();
        match self.positions.get(&source) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, snapshot)),
            None => {
                self.positions.insert(source.clone(), self.entries.len());
                self.entries.push((source, snapshot));
                None
            }
        }
    }

    pub fn get(&self, source: &NodeAddress) -> Option<&Arc<TopologySnapshot>> {
        self.positions.get(source).map(|&pos| &self.entries[pos].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reports in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeAddress, &Arc<TopologySnapshot>)> {
        self.entries.iter().map(|(source, snapshot)| (source, snapshot))
    }

    pub fn sources(&self) -> impl Iterator<Item = &NodeAddress> {
        self.entries.iter().map(|(source, _)| source)
    }

    pub fn snapshots(&self) -> impl Iterator<Item = &Arc<TopologySnapshot>> {
        self.entries.iter().map(|(_, snapshot)| snapshot)
    }
}

impl FromIterator<(NodeAddress, TopologySnapshot)> for TopologyReportSet {
    fn from_iter<I: IntoIterator<Item = (NodeAddress, TopologySnapshot)>>(iter: I) -> Self {
        let mut reports = Self::new();
        for (source, snapshot) in iter {
            reports.insert(source, snapshot);
        }
        reports
    }
}

impl From<Vec<ReportEntry>> for TopologyReportSet {
    fn from(entries: Vec<ReportEntry>) -> Self {
        entries.into_iter().map(|e| (e.source, e.nodes)).collect()
    }
}

impl From<TopologyReportSet> for Vec<ReportEntry> {
    fn from(reports: TopologyReportSet) -> Self {
        reports
            .entries
            .into_iter()
            .map(|(source, snapshot)| ReportEntry {
                source,
                nodes: Arc::unwrap_or_clone(snapshot),
            })
            .collect()
    }
}
