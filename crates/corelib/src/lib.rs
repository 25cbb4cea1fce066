//! Core data model for client-side cluster topology.
//!
//! This crate provides the types the consensus and refresh layers share:
//! - Node identity, address, role, slot ranges and link-state flags
//! - Immutable topology snapshots with set-style membership
//! - Insertion-ordered report sets gathered in one refresh round

pub mod error;
pub mod node;
pub mod report;
pub mod topology;

pub use error::{Error, Result};
pub use node::{NodeAddress, NodeDescriptor, NodeFlag, NodeId, NodeRole, SlotRange, SLOT_COUNT};
pub use report::{ReportEntry, TopologyReportSet};
pub use topology::TopologySnapshot;
