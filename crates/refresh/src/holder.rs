//! Holder of the currently adopted topology.

use corelib::TopologySnapshot;
use parking_lot::RwLock;
use std::sync::Arc;

/// The client instance's current topology.
///
/// Readers clone an `Arc` under a short read lock and never observe a partial
/// update. Installation is a single pointer swap; serializing whole refresh
/// rounds is the refresher's job.
#[derive(Debug)]
pub struct TopologyHolder {
    inner: RwLock<Installed>,
}

#[derive(Debug)]
struct Installed {
    snapshot: Arc<TopologySnapshot>,
    generation: u64,
}

impl TopologyHolder {
    /// Start from `initial` at generation 0.
    pub fn new(initial: TopologySnapshot) -> Self {
        Self {
            inner: RwLock::new(Installed {
                snapshot: Arc::new(initial),
                generation: 0,
            }),
        }
    }

    pub fn current(&self) -> Arc<TopologySnapshot> {
        Arc::clone(&self.inner.read().snapshot)
    }

    /// Number of installs so far.
    pub fn generation(&self) -> u64 {
        self.inner.read().generation
    }

    /// Publish `snapshot` and return the new generation.
    pub fn install(&self, snapshot: Arc<TopologySnapshot>) -> u64 {
        let mut inner = self.inner.write();
        inner.snapshot = snapshot;
        inner.generation += 1;
        inner.generation
    }
}

impl Default for TopologyHolder {
    fn default() -> Self {
        Self::new(TopologySnapshot::empty())
    }
}
