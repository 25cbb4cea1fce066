//! Error types for the consensus crate.
//!
//! Resolution itself is total; the only fallible operation here is choosing a
//! strategy from configuration.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsensusError {
    #[error("Unknown consensus strategy '{0}', expected 'known-majority' or 'healthy-majority'")]
    UnknownStrategy(String),
}
