//! Error types for the OSI walkthrough.
//!
//! Controller transitions never fail. Errors only appear at the edges:
//! turning raw numbers or user text into typed values, strict catalog
//! lookups, and terminal I/O in the front end.

use thiserror::Error;

/// Top-level error type for all fallible operations in the system.
///
/// Each variant corresponds to a specific boundary:
/// - Typed ids: raw integers that name no layer
/// - Playback: zero-length tick periods and unknown speed presets
/// - Catalogs: strict scenario lookups
/// - Front end: unknown commands and I/O
#[derive(Debug, Error)]
pub enum Error {
    /// Layer ids run from 1 (physical) to 7 (application)
    #[error("invalid layer id {0}: expected 1..=7")]
    InvalidLayerId(u8),

    /// Tick period must be a positive number of milliseconds
    #[error("invalid tick interval {0}ms: must be positive")]
    InvalidTickInterval(u64),

    /// Speed text is neither a preset nor a millisecond count
    #[error("unknown speed {0:?}: expected fast, normal, slow or a millisecond count")]
    UnknownSpeed(String),

    /// Scenario id not present in the catalog
    #[error("unknown scenario {0:?}")]
    UnknownScenario(String),

    /// Input line that doesn't parse as a walkthrough command
    #[error("unknown command {0:?} (type `help` for a list)")]
    UnknownCommand(String),

    /// Terminal I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
