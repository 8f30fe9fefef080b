//! Dynamic field backends, registry and dispatcher for Ticketry.
//!
//! A dynamic field attaches a typed, configurable value to a ticket,
//! article or customer record. This crate provides:
//! - [`FieldDefinition`] — the configuration-owned schema of one field
//! - [`FieldBackend`] — the capability trait implemented per field type
//!   (render, validate, get/set, search predicate, sort key)
//! - [`BackendRegistry`] — the startup-built, read-only type→backend map
//! - [`FieldDispatcher`] — the uniform operation surface that validates,
//!   resolves and delegates, reporting failures as an absent sentinel
//!
//! Value persistence and history live in `ticketry-store`; this crate only
//! issues calls through the store the caller supplies per operation.

pub mod backend;
pub mod backends;
mod definition;
mod dispatcher;
mod error;
mod notify;
mod registry;
mod value;

pub use backend::{
    DisplayRender, EditRender, FieldBackend, InputSpec, SearchTerm, SelectOption, SortKey,
    SortKind, SqlParam, SqlPredicate,
};
pub use definition::{FieldConfig, FieldDefinition, FieldType, ObjectKind};
pub use dispatcher::{DispatchContext, FieldDispatcher};
pub use error::{FieldsError, Result};
pub use notify::{Notifier, NotifyError, NullNotifier};
pub use registry::BackendRegistry;
pub use value::FieldValue;
