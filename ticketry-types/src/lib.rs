//! Core type definitions for Ticketry.
//!
//! This crate defines the fundamental, backend-agnostic types used throughout
//! the ticketing core:
//! - Field, object and user identifiers (UUID v7)
//! - Calendar day buckets and the process-wide clock source
//! - Field change events and history entries
//!
//! Field-type-specific value shapes and backend behavior belong in
//! `ticketry-fields`, not here.

mod daybucket;
mod event;
mod ids;

pub use daybucket::{Clock, DayBucket, SystemClock};
pub use event::{EventId, EventName, FieldEvent, HistoryEntry};
pub use ids::{FieldId, ObjectId, UserId};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("invalid day bucket: {0}")]
    InvalidDayBucket(String),
}
