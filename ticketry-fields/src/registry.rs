//! The backend registry: field type → backend instance.
//!
//! Built once at startup and read-only thereafter. A registration conflict
//! is a configuration error and aborts initialization; the dispatcher only
//! ever resolves against a finished registry.

use crate::backend::FieldBackend;
use crate::backends::{
    CheckboxBackend, DateBackend, DateTimeBackend, DropdownBackend, MultiselectBackend,
    TextAreaBackend, TextBackend,
};
use crate::definition::FieldType;
use crate::error::FieldsError;
use std::collections::HashMap;

/// Immutable-after-construction mapping from field type to backend.
pub struct BackendRegistry {
    backends: HashMap<FieldType, Box<dyn FieldBackend>>,
}

impl BackendRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            backends: HashMap::new(),
        }
    }

    /// Creates a registry with all built-in backends registered.
    pub fn with_defaults() -> Result<Self, FieldsError> {
        let mut registry = Self::new();
        registry.register(Box::new(TextBackend))?;
        registry.register(Box::new(TextAreaBackend))?;
        registry.register(Box::new(CheckboxBackend))?;
        registry.register(Box::new(DateBackend))?;
        registry.register(Box::new(DateTimeBackend))?;
        registry.register(Box::new(DropdownBackend))?;
        registry.register(Box::new(MultiselectBackend))?;
        Ok(registry)
    }

    /// Registers a backend under its declared field type.
    ///
    /// Fails when the type already has a backend; initialization must abort
    /// on that error rather than silently shadowing.
    pub fn register(&mut self, backend: Box<dyn FieldBackend>) -> Result<(), FieldsError> {
        let field_type = backend.field_type();
        if self.backends.contains_key(&field_type) {
            return Err(FieldsError::DuplicateBackend {
                tag: field_type.tag().to_string(),
            });
        }
        self.backends.insert(field_type, backend);
        Ok(())
    }

    /// Resolves the backend for a field type, if one is registered.
    #[must_use]
    pub fn resolve(&self, field_type: FieldType) -> Option<&dyn FieldBackend> {
        self.backends.get(&field_type).map(Box::as_ref)
    }

    /// Whether a backend is registered for this field type.
    #[must_use]
    pub fn is_registered(&self, field_type: FieldType) -> bool {
        self.backends.contains_key(&field_type)
    }

    /// Number of registered backends.
    #[must_use]
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<_> = self.backends.keys().map(FieldType::tag).collect();
        tags.sort_unstable();
        f.debug_struct("BackendRegistry").field("backends", &tags).finish()
    }
}
