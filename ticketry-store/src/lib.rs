//! SQLite storage layer for Ticketry dynamic fields.
//!
//! Provides the generic value store behind every field backend plus the
//! field history (audit) table.
//!
//! # Architecture
//!
//! - Values are stored as JSON text keyed by `(field_id, object_id)`:
//!   one row per field per object, whole-value replace on write
//! - History rows record old/new value, acting user and timestamp
//! - All access goes through a shared connection behind a mutex; callers
//!   never manage connections directly

mod error;
mod value_store;

pub use error::{StoreError, StoreResult};
pub use value_store::ValueStore;
