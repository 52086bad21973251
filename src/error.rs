/// Error taxonomy for the culling workflow
///
/// Only `Precondition` is ever shown to the user (as a one-shot
/// notice). Everything else is recovered internally: invalid or
/// missing session data falls back to the demo snapshot, storage
/// failures are logged and the app keeps running in memory.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CullError {
    /// Stored snapshot is missing one or both bucket arrays.
    /// Recovered by substituting the demo snapshot.
    #[error("stored results are missing the sharp/blurry buckets")]
    InvalidData,

    /// A user action was requested in a state that cannot satisfy it
    /// (e.g. compare without exactly 2 selected images). Surfaced as
    /// a transient notice; no state is mutated.
    #[error("{0}")]
    Precondition(String),

    /// Session database failure (open, read, write).
    #[error("session storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Filesystem failure (data directory, export copies).
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode failure for a persisted value.
    #[error("session encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl CullError {
    /// Shorthand for precondition failures.
    pub fn precondition(message: impl Into<String>) -> Self {
        CullError::Precondition(message.into())
    }
}
