//! Error types for battle construction and rules loading.
//!
//! The simulation itself never fails: timeouts and stalemates are ordinary
//! battle results. Errors only arise while building a battle or loading the
//! read-only inputs it is played against.

use thiserror::Error;

/// Result type alias using [`VcrError`].
pub type Result<T> = std::result::Result<T, VcrError>;

/// Top-level error type for the battle engine.
#[derive(Debug, Error)]
pub enum VcrError {
    /// A battle must contain at least one participant.
    #[error("Battle has no participants")]
    EmptyBattle,

    /// A fleet battle needs at least one group.
    #[error("Fleet battle has no groups")]
    NoGroups,

    /// Data file parsing error.
    #[error("Failed to parse {what}: {message}")]
    DataParseError {
        /// Kind of document that failed to parse.
        what: &'static str,
        /// Error message.
        message: String,
    },

    /// Configuration option name not recognized.
    #[error("Unknown configuration option: {0}")]
    UnknownOption(String),

    /// Configuration option value not acceptable.
    #[error("Invalid value for option '{name}': {value}")]
    InvalidOptionValue {
        /// Option name as given.
        name: String,
        /// Offending value text.
        value: String,
    },

    /// A random table needs at least one entry.
    #[error("Random table is empty")]
    EmptyRandomTable,

    /// Snapshot serialization failed.
    #[error("Failed to serialize snapshot: {0}")]
    SerializationError(String),
}
