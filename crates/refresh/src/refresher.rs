//! One topology refresh round.
//!
//! # Algorithm
//!
//! 1. Take the single-writer token so rounds never interleave
//! 2. Build the target list: seeds first, then (with dynamic sources) every
//!    addressable member of the current topology, deduplicated in order
//! 3. Query all targets in parallel, each under its own timeout
//! 4. Collect successful answers into a report set in target order; failed
//!    and timed-out nodes are left out
//! 5. Resolve with the configured strategy and install the result
//!
//! Report order follows the target list rather than arrival time, so ties
//! between equally good views are broken the same way every round.

use crate::config::RefreshConfig;
use crate::error::{QueryError, RefreshError};
use crate::holder::TopologyHolder;
use crate::query::TopologyQuery;
use consensus::{ConsensusStrategy, ResolutionOutcome};
use corelib::{NodeAddress, NodeFlag, TopologyReportSet, TopologySnapshot};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Summary of a completed refresh round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    pub outcome: ResolutionOutcome,
    /// Whether a new snapshot was installed.
    pub installed: bool,
    /// Holder generation after the round.
    pub generation: u64,
    pub queried: usize,
    pub responded: usize,
}

/// Drives gather → resolve → install for one client instance.
pub struct TopologyRefresher<Q: TopologyQuery> {
    query: Q,
    holder: Arc<TopologyHolder>,
    strategy: Box<dyn ConsensusStrategy>,
    config: RefreshConfig,
    round: Mutex<()>,
}

impl<Q: TopologyQuery> TopologyRefresher<Q> {
    /// Create a refresher using the strategy named in `config`.
    pub fn new(
        query: Q,
        holder: Arc<TopologyHolder>,
        config: RefreshConfig,
    ) -> Result<Self, RefreshError> {
        config.validate()?;
        Ok(Self {
            query,
            holder,
            strategy: config.strategy.build(),
            config,
            round: Mutex::new(()),
        })
    }

    /// Replace the configured strategy with a custom one.
    pub fn with_strategy(mut self, strategy: Box<dyn ConsensusStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    pub fn holder(&self) -> &Arc<TopologyHolder> {
        &self.holder
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Addresses to query for a round starting from `current`.
    pub fn targets(&self, current: &TopologySnapshot) -> Vec<NodeAddress> {
        let mut seen = HashSet::new();
        let mut targets = Vec::new();

        for seed in &self.config.seeds {
            if seen.insert(seed) {
                targets.push(seed.clone());
            }
        }

        if self.config.dynamic_sources {
            for node in current.iter().filter(|n| !n.has_flag(NodeFlag::NoAddr)) {
                if seen.insert(node.address()) {
                    targets.push(node.address().clone());
                }
            }
        }

        targets
    }

    /// Query every target in parallel and collect the answers in target order.
    pub async fn gather(&self, targets: &[NodeAddress]) -> TopologyReportSet {
        let timeout = self.config.query_timeout();
        let answers = join_all(targets.iter().map(|target| async move {
            let answer = match tokio::time::timeout(timeout, self.query.fetch(target)).await {
                Ok(result) => result,
                Err(_) => Err(QueryError::Timeout(self.config.query_timeout_ms)),
            };
            (target, answer)
        }))
        .await;

        let mut reports = TopologyReportSet::new();
        for (target, answer) in answers {
            match answer {
                Ok(snapshot) => {
                    debug!(node = %target, members = snapshot.len(), "topology query answered");
                    reports.insert(target.clone(), snapshot);
                }
                Err(err) => {
                    warn!(node = %target, error = %err, "topology query failed");
                    metrics::counter!("topology_query_failures_total").increment(1);
                }
            }
        }
        reports
    }

    /// Run one full refresh round.
    ///
    /// Concurrent callers are serialized; each sees the topology installed
    /// by the round before it.
    #[instrument(skip_all, fields(strategy = self.strategy.name()))]
    pub async fn refresh(&self) -> RefreshReport {
        let _round = self.round.lock().await;

        let current = self.holder.current();
        let targets = self.targets(&current);
        let reports = self.gather(&targets).await;
        let resolution = self.strategy.resolve(&current, &reports);

        let installed = resolution.replaces(&current);
        let generation = if installed {
            self.holder.install(Arc::clone(&resolution.snapshot))
        } else {
            self.holder.generation()
        };

        match resolution.outcome {
            ResolutionOutcome::Unchanged => {
                warn!(queried = targets.len(), "no topology reports, keeping current view")
            }
            ResolutionOutcome::UnqualifiedMajority => warn!(
                previous = current.len(),
                adopted = resolution.snapshot.len(),
                responded = reports.len(),
                "no reported view knows a majority of the cluster"
            ),
            ResolutionOutcome::Qualified => {}
        }
        if installed {
            info!(
                generation,
                members = resolution.snapshot.len(),
                outcome = %resolution.outcome,
                "installed topology"
            );
        }
        metrics::counter!("topology_refresh_total", "outcome" => resolution.outcome.as_str())
            .increment(1);

        RefreshReport {
            outcome: resolution.outcome,
            installed,
            generation,
            queried: targets.len(),
            responded: reports.len(),
        }
    }
}
