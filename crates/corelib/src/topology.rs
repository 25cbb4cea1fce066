//! Topology snapshots.
//!
//! A [`TopologySnapshot`] is one vantage point's belief about cluster
//! membership at one instant. Snapshots are built whole from a single topology
//! query and never mutated afterwards; a refresh replaces them wholesale.

use crate::error::{Error, Result};
use crate::node::{NodeDescriptor, NodeId, NodeRole};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Ordered, duplicate-free collection of node descriptors.
///
/// # Invariants
///
/// - No two descriptors share a [`NodeId`].
/// - Enumeration follows insertion order; membership is tested as a set.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<NodeDescriptor>", into = "Vec<NodeDescriptor>")]
pub struct TopologySnapshot {
    nodes: Vec<NodeDescriptor>,
    index: HashMap<NodeId, usize>,
}

impl TopologySnapshot {
    /// Build a snapshot, rejecting any repeated node id.
    pub fn new(nodes: Vec<NodeDescriptor>) -> Result<Self> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (pos, node) in nodes.iter().enumerate() {
            if index.insert(node.id().clone(), pos).is_some() {
                return Err(Error::DuplicateMember(node.id().to_string()));
            }
        }
        Ok(Self { nodes, index })
    }

    /// Snapshot with no members, used before the first resolution.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Member count ("known-size").
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NodeDescriptor> {
        self.nodes.iter()
    }

    pub fn nodes(&self) -> &[NodeDescriptor] {
        &self.nodes
    }

    pub fn get(&self, id: &NodeId) -> Option<&NodeDescriptor> {
        self.index.get(id).map(|&pos| &self.nodes[pos])
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// Member ids as an ordered set, independent of insertion order.
    pub fn member_ids(&self) -> BTreeSet<&NodeId> {
        self.nodes.iter().map(NodeDescriptor::id).collect()
    }

    /// True iff both snapshots know exactly the same members.
    ///
    /// Roles, slots, flags and addresses are ignored.
    pub fn is_equivalent(&self, other: &TopologySnapshot) -> bool {
        self.len() == other.len() && self.index.keys().all(|id| other.contains(id))
    }

    /// Number of members not flagged as failed or address-less.
    pub fn healthy_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_healthy()).count()
    }

    pub fn primaries(&self) -> impl Iterator<Item = &NodeDescriptor> {
        self.nodes.iter().filter(|n| n.role() == NodeRole::Primary)
    }

    /// First primary claiming `slot`, in enumeration order.
    pub fn slot_owner(&self, slot: u16) -> Option<&NodeDescriptor> {
        self.primaries().find(|n| n.owns_slot(slot))
    }
}

impl TryFrom<Vec<NodeDescriptor>> for TopologySnapshot {
    type Error = Error;

    fn try_from(nodes: Vec<NodeDescriptor>) -> Result<Self> {
        Self::new(nodes)
    }
}

impl From<TopologySnapshot> for Vec<NodeDescriptor> {
    fn from(snapshot: TopologySnapshot) -> Self {
        snapshot.nodes
    }
}

impl<'a> IntoIterator for &'a TopologySnapshot {
    type Item = &'a NodeDescriptor;
    type IntoIter = std::slice::Iter<'a, NodeDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
