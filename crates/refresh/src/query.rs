//! Boundary to the network layer.

use crate::error::QueryError;
use async_trait::async_trait;
use corelib::{NodeAddress, TopologySnapshot};

/// Fetches one node's view of the cluster topology.
///
/// Implementations own connection handling and response parsing. They must
/// return either a well-formed snapshot or an error; a partially parsed
/// response is an error. Timeouts are applied by the refresher.
#[async_trait]
pub trait TopologyQuery: Send + Sync + 'static {
    async fn fetch(&self, target: &NodeAddress) -> Result<TopologySnapshot, QueryError>;
}
