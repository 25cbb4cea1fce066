//! Node abstractions for cluster topology.
//!
//! A [`NodeDescriptor`] is one report's view of a single cluster member. Two
//! descriptors describe the *same member* iff their [`NodeId`]s match; role,
//! slots and flags may legitimately differ between reports and do not affect
//! identity.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Number of hash slots in the cluster keyspace.
pub const SLOT_COUNT: u16 = 16384;

/// Stable identifier assigned to a node by the cluster.
///
/// Opaque to the client; compared and hashed as a plain string.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Network endpoint of a node.
///
/// Serialized as a `host:port` string. IPv6 hosts are written in brackets.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeAddress {
    pub host: String,
    pub port: u16,
}

impl NodeAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for NodeAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| Error::InvalidAddress(s.to_string()))?;

        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        if host.is_empty() {
            return Err(Error::InvalidAddress(s.to_string()));
        }

        let port = port
            .parse::<u16>()
            .map_err(|_| Error::InvalidAddress(s.to_string()))?;

        Ok(Self::new(host, port))
    }
}

impl TryFrom<String> for NodeAddress {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<NodeAddress> for String {
    fn from(addr: NodeAddress) -> Self {
        addr.to_string()
    }
}

/// Role a node plays as seen by the reporting node.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeRole {
    Primary,
    Replica,
    #[default]
    Unknown,
}

/// Link-state flag as last observed by the reporting node.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeFlag {
    /// The descriptor describes the reporting node itself.
    Myself,
    /// Failure agreed by a majority of primaries.
    Fail,
    /// Failure suspected by the reporter only.
    EventualFail,
    /// Node is still in handshake and not yet a trusted member.
    Handshake,
    /// Reporter has no address for the node.
    NoAddr,
    Connected,
    Disconnected,
}

impl NodeFlag {
    /// Flags that mark a node as failed or unreachable.
    pub const UNHEALTHY: [NodeFlag; 3] = [NodeFlag::Fail, NodeFlag::EventualFail, NodeFlag::NoAddr];
}

/// Inclusive range of hash slots owned by a primary.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawSlotRange")]
pub struct SlotRange {
    start: u16,
    end: u16,
}

#[derive(Deserialize)]
struct RawSlotRange {
    start: u16,
    end: u16,
}

impl TryFrom<RawSlotRange> for SlotRange {
    type Error = Error;

    fn try_from(raw: RawSlotRange) -> Result<Self> {
        SlotRange::new(raw.start, raw.end)
    }
}

impl SlotRange {
    /// Create a validated slot range (`start <= end < SLOT_COUNT`).
    pub fn new(start: u16, end: u16) -> Result<Self> {
        if start > end || end >= SLOT_COUNT {
            return Err(Error::InvalidSlotRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single(slot: u16) -> Result<Self> {
        Self::new(slot, slot)
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> u16 {
        self.end
    }

    pub fn contains(&self, slot: u16) -> bool {
        self.start <= slot && slot <= self.end
    }

    /// Number of slots covered.
    pub fn len(&self) -> usize {
        usize::from(self.end - self.start) + 1
    }
}

impl fmt::Display for SlotRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// One cluster member as described by a single topology report.
///
/// Immutable once built: the builder methods consume `self`, and snapshots
/// hand out shared references only. Equality and hashing use the id alone.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeDescriptor {
    id: NodeId,
    address: NodeAddress,
    #[serde(default)]
    role: NodeRole,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    slots: Vec<SlotRange>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    flags: BTreeSet<NodeFlag>,
}

impl NodeDescriptor {
    /// Construct a descriptor with unknown role, no slots and no flags.
    pub fn new(id: impl Into<NodeId>, address: NodeAddress) -> Self {
        Self {
            id: id.into(),
            address,
            role: NodeRole::Unknown,
            slots: Vec::new(),
            flags: BTreeSet::new(),
        }
    }

    pub fn with_role(mut self, role: NodeRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_slots(mut self, slots: impl IntoIterator<Item = SlotRange>) -> Self {
        self.slots = slots.into_iter().collect();
        self.slots.sort();
        self
    }

    pub fn with_flag(mut self, flag: NodeFlag) -> Self {
        self.flags.insert(flag);
        self
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn address(&self) -> &NodeAddress {
        &self.address
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    pub fn slots(&self) -> &[SlotRange] {
        &self.slots
    }

    pub fn flags(&self) -> &BTreeSet<NodeFlag> {
        &self.flags
    }

    pub fn has_flag(&self, flag: NodeFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// True unless the reporter flagged the node as failed or address-less.
    pub fn is_healthy(&self) -> bool {
        !NodeFlag::UNHEALTHY.iter().any(|f| self.flags.contains(f))
    }

    pub fn owns_slot(&self, slot: u16) -> bool {
        self.slots.iter().any(|r| r.contains(slot))
    }
}

impl PartialEq for NodeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for NodeDescriptor {}

impl Hash for NodeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for NodeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {:?}", self.id, self.address, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_parse() {
        let addr: NodeAddress = "10.0.0.1:7000".parse().unwrap();
        assert_eq!(addr, NodeAddress::new("10.0.0.1", 7000));
        assert_eq!(addr.to_string(), "10.0.0.1:7000");

        let v6: NodeAddress = "[::1]:7001".parse().unwrap();
        assert_eq!(v6.host, "::1");
        assert_eq!(v6.to_string(), "[::1]:7001");
    }

    #[test]
    fn test_address_parse_rejects_garbage() {
        assert!("localhost".parse::<NodeAddress>().is_err());
        assert!(":7000".parse::<NodeAddress>().is_err());
        assert!("host:notaport".parse::<NodeAddress>().is_err());
        assert!("host:70000".parse::<NodeAddress>().is_err());
    }

    #[test]
    fn test_slot_range_bounds() {
        assert!(SlotRange::new(0, 16383).is_ok());
        assert_eq!(
            SlotRange::new(10, 5),
            Err(Error::InvalidSlotRange { start: 10, end: 5 })
        );
        assert!(SlotRange::new(0, SLOT_COUNT).is_err());

        let range = SlotRange::new(100, 199).unwrap();
        assert_eq!(range.len(), 100);
        assert!(range.contains(100));
        assert!(range.contains(199));
        assert!(!range.contains(200));
    }

    #[test]
    fn test_descriptor_identity_ignores_metadata() {
        let addr = NodeAddress::new("127.0.0.1", 7000);
        let a = NodeDescriptor::new("n1", addr.clone()).with_role(NodeRole::Primary);
        let b = NodeDescriptor::new("n1", NodeAddress::new("127.0.0.2", 7001))
            .with_role(NodeRole::Replica)
            .with_flag(NodeFlag::Fail);
        let c = NodeDescriptor::new("n2", addr);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_health_flags() {
        let addr = NodeAddress::new("127.0.0.1", 7000);
        let healthy = NodeDescriptor::new("n1", addr.clone()).with_flag(NodeFlag::Connected);
        assert!(healthy.is_healthy());

        for flag in NodeFlag::UNHEALTHY {
            let node = NodeDescriptor::new("n1", addr.clone()).with_flag(flag);
            assert!(!node.is_healthy(), "{:?} should mark node unhealthy", flag);
        }
    }
}
