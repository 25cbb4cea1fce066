//! Error types for the refresh cycle.

use thiserror::Error;

/// Failure of one topology query.
///
/// Never reaches consensus: a failed or timed-out node is simply absent from
/// the round's report set.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Node unreachable: {0}")]
    Unreachable(String),

    #[error("Query timed out after {0} ms")]
    Timeout(u64),

    #[error("Malformed topology response: {0}")]
    Malformed(#[from] corelib::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while setting up a refresher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    #[error("Invalid refresh configuration: {0}")]
    InvalidConfig(String),
}
