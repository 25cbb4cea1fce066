//! Consensus strategy abstractions.
//!
//! A consensus strategy picks the topology snapshot a client adopts after a
//! refresh round. Different strategies weigh the reports differently:
//!
//! - **KnownMajority**: most complete view among those that know a majority
//!   of the previously known members
//! - **HealthyMajority**: view reporting the most healthy members

pub mod healthy_majority;
pub mod known_majority;

pub use healthy_majority::HealthyMajority;
pub use known_majority::KnownMajority;

use crate::classifier::EquivalenceClass;
use crate::error::ConsensusError;
use crate::resolution::Resolution;
use corelib::{TopologyReportSet, TopologySnapshot};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Trait for topology consensus strategies.
///
/// # Contract
///
/// - Total: always returns a [`Resolution`], never panics on well-formed input
/// - Empty `reports` returns `current` unchanged
/// - Otherwise returns one of the reported snapshots, never a synthesized one
/// - Deterministic for a given report order
///
/// # Thread Safety
///
/// Implementations must be stateless or internally immutable (Send + Sync) so
/// one instance can be shared by every refresh task.
pub trait ConsensusStrategy: Send + Sync + 'static {
    /// Choose the snapshot to adopt.
    ///
    /// # Arguments
    /// * `current` - Previously adopted snapshot; only its size is consulted
    /// * `reports` - Snapshots gathered this round, in first-seen order
    fn resolve(&self, current: &Arc<TopologySnapshot>, reports: &TopologyReportSet) -> Resolution;

    /// Get the strategy name (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// Pick the best class by `rank`, preferring the earliest on ties.
///
/// `min_by_key` keeps the first of equal elements, so ranking on reversed
/// keys yields "largest key, first seen".
pub(crate) fn first_best<'a, K, F>(
    classes: impl IntoIterator<Item = &'a EquivalenceClass>,
    rank: F,
) -> Option<&'a EquivalenceClass>
where
    K: Ord,
    F: Fn(&EquivalenceClass) -> K,
{
    classes.into_iter().min_by_key(|class| Reverse(rank(class)))
}

/// Strategy selector used by configuration and the CLI.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    #[default]
    KnownMajority,
    HealthyMajority,
}

impl StrategyKind {
    pub fn build(self) -> Box<dyn ConsensusStrategy> {
        match self {
            StrategyKind::KnownMajority => Box::new(KnownMajority),
            StrategyKind::HealthyMajority => Box::new(HealthyMajority),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::KnownMajority => "known-majority",
            StrategyKind::HealthyMajority => "healthy-majority",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = ConsensusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "known-majority" => Ok(StrategyKind::KnownMajority),
            "healthy-majority" => Ok(StrategyKind::HealthyMajority),
            other => Err(ConsensusError::UnknownStrategy(other.to_string())),
        }
    }
}
