//! Error types for the core library.

use thiserror::Error;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building topology data.
///
/// None of these can be produced by consensus resolution itself; they are
/// raised when a snapshot or descriptor is constructed from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Two descriptors in one snapshot share a node id.
    #[error("Duplicate member in topology snapshot: {0}")]
    DuplicateMember(String),

    /// A `host:port` string could not be parsed.
    #[error("Invalid node address: {0}")]
    InvalidAddress(String),

    /// Slot range outside `0..16384` or with `start > end`.
    #[error("Invalid slot range: {start}-{end}")]
    InvalidSlotRange { start: u16, end: u16 },

    /// Invalid node metadata.
    #[error("Invalid node: {0}")]
    InvalidNode(String),
}
