//! Topology refresh cycle for cluster clients.
//!
//! This crate owns the client-instance side of topology consensus:
//! - The currently adopted snapshot, installed atomically
//! - The topology query boundary to the network layer
//! - One refresh round: gather reports in parallel, resolve, install

pub mod config;
pub mod error;
pub mod holder;
pub mod query;
pub mod refresher;

pub use config::RefreshConfig;
pub use error::{QueryError, RefreshError};
pub use holder::TopologyHolder;
pub use query::TopologyQuery;
pub use refresher::{RefreshReport, TopologyRefresher};
