//! Topology consensus for cluster clients.
//!
//! This crate decides which of several, possibly conflicting, topology reports
//! a client adopts as its new view of the cluster:
//! - Equivalence classification of reports by member set
//! - Pluggable consensus strategies (known-majority, healthy-majority)
//! - Resolution results tagged with how trustworthy the choice is
//!
//! Resolution is a pure, synchronous computation. It performs no I/O, holds no
//! state between calls and never fails.

pub mod classifier;
pub mod error;
pub mod resolution;
pub mod strategy;

pub use classifier::{classify, EquivalenceClass};
pub use error::ConsensusError;
pub use resolution::{majority_threshold, Resolution, ResolutionOutcome};
pub use strategy::{ConsensusStrategy, HealthyMajority, KnownMajority, StrategyKind};
