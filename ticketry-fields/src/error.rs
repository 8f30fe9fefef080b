//! Error types for field backends and the dispatcher.

use thiserror::Error;

/// Result type for field operations.
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors that can occur in field backend operations.
///
/// The dispatcher surface never returns these to callers — it logs them and
/// reports the absent sentinel. Backends and the registry return them
/// directly.
#[derive(Debug, Error)]
pub enum FieldsError {
    /// A backend for this field type is already registered.
    #[error("duplicate backend for field type: {tag}")]
    DuplicateBackend { tag: String },

    /// No backend registered for this field type.
    #[error("no backend registered for field type: {tag}")]
    BackendNotFound { tag: String },

    /// The field definition is missing its name or label.
    #[error("malformed field definition: {name:?}")]
    MalformedDefinition { name: String },

    /// The value does not fit the backend's expected shape or options.
    #[error("invalid value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// A mandatory field cannot be cleared.
    #[error("field '{field}' is mandatory and cannot be cleared")]
    MandatoryField { field: String },

    /// Storage error from the value store.
    #[error("storage error: {0}")]
    Storage(#[from] ticketry_store::StoreError),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
