//! Mail loop protection: bounds automated outbound notifications per
//! recipient per calendar day.
//!
//! Auto-responders answering auto-responders can bounce mail back and forth
//! indefinitely. The guard keeps a `(recipient, day)` log; once a recipient
//! has been written to more often than the configured ceiling within one
//! day, further sends are denied until the next day.
//!
//! `check` and `record` mirror the traditional two-step call sequence
//! (check before sending, record after). They are not atomic with respect
//! to each other — concurrent senders can both pass `check` before either
//! records. [`LoopProtection::record_and_check`] runs both inside one
//! transaction for callers that need exact enforcement.

mod guard;

pub use guard::{LoopProtection, LoopProtectionConfig};

/// Result type for loop protection operations.
pub type GuardResult<T> = Result<T, GuardError>;

/// Errors that can occur in loop protection operations.
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}
