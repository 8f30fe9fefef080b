//! Customer company records for Ticketry.
//!
//! The company table's layout is not fixed in code: a [`CompanyMap`] loaded
//! from configuration names the table, the key column and the attribute →
//! column mapping, and the store assembles its SQL from that map alone.
//! Deployments extend or rename columns by editing the map, not the code.

mod map;
mod store;

pub use map::{ColumnSpec, CompanyMap};
pub use store::{Company, CompanyStore};

/// Result type for customer company operations.
pub type CustomersResult<T> = Result<T, CustomersError>;

/// Errors that can occur in customer company operations.
#[derive(Debug, thiserror::Error)]
pub enum CustomersError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A required attribute was not supplied.
    #[error("missing required attribute: {attr}")]
    MissingAttribute { attr: String },

    /// An attribute has no column in the map.
    #[error("unknown attribute: {attr}")]
    UnknownAttribute { attr: String },

    /// No company exists under this ID.
    #[error("company not found: {id}")]
    NotFound { id: String },
}
