//! The field dispatcher: one uniform operation surface over all backends.
//!
//! Every operation follows the same contract: validate the definition,
//! resolve the backend, delegate. Failures at this surface are local and
//! non-fatal — they are logged and reported as the absent sentinel (`None`),
//! never raised. Callers must check for the sentinel.
//!
//! The dispatcher is stateless per call. The registry is immutable after
//! construction; value state lives in the store the caller passes in via
//! [`DispatchContext`]. The context is a plain borrow bundle — the
//! dispatcher never owns the stores or the notifier it is handed.

use crate::backend::{DisplayRender, EditRender, FieldBackend, SearchTerm, SortKey, SqlPredicate};
use crate::definition::{FieldDefinition, ObjectKind};
use crate::error::FieldsError;
use crate::notify::Notifier;
use crate::registry::BackendRegistry;
use crate::value::FieldValue;
use std::collections::HashSet;
use ticketry_store::ValueStore;
use ticketry_types::{EventName, FieldEvent, HistoryEntry, ObjectId, UserId};
use tracing::{debug, error, warn};

/// Per-call context for value-affecting operations. Borrowed, never owned.
#[derive(Clone, Copy)]
pub struct DispatchContext<'a> {
    /// The backing value store.
    pub store: &'a ValueStore,
    /// Sink for field change events.
    pub notifier: &'a dyn Notifier,
    /// The acting user, recorded in history and events.
    pub user_id: UserId,
}

/// Dispatches field operations to the backend registered for the field's
/// declared type.
pub struct FieldDispatcher {
    registry: BackendRegistry,
    /// Object kinds that receive history entries and events on writes.
    /// Auditing is an opt-in capability, not a hardcoded special case.
    audited_kinds: HashSet<ObjectKind>,
}

impl FieldDispatcher {
    /// Creates a dispatcher with the default audit set (tickets and
    /// articles, matching historical behavior).
    #[must_use]
    pub fn new(registry: BackendRegistry) -> Self {
        let mut audited_kinds = HashSet::new();
        audited_kinds.insert(ObjectKind::Ticket);
        audited_kinds.insert(ObjectKind::Article);
        Self {
            registry,
            audited_kinds,
        }
    }

    /// Creates a dispatcher that audits nothing.
    #[must_use]
    pub fn without_audit(registry: BackendRegistry) -> Self {
        Self {
            registry,
            audited_kinds: HashSet::new(),
        }
    }

    /// Opts an object kind into history/event emission on writes.
    pub fn audit_kind(&mut self, kind: ObjectKind) {
        self.audited_kinds.insert(kind);
    }

    /// Whether writes to this kind produce history and events.
    #[must_use]
    pub fn is_audited(&self, kind: ObjectKind) -> bool {
        self.audited_kinds.contains(&kind)
    }

    /// Validates the definition and resolves its backend. Both failure
    /// modes log an error and surface as `None`.
    fn checked_backend(&self, def: &FieldDefinition) -> Option<&dyn FieldBackend> {
        if !def.is_well_formed() {
            let err = FieldsError::MalformedDefinition {
                name: def.name.clone(),
            };
            error!(field = %def.id, "{err}");
            return None;
        }
        match self.registry.resolve(def.field_type) {
            Some(backend) => Some(backend),
            None => {
                let err = FieldsError::BackendNotFound {
                    tag: def.field_type.tag().to_string(),
                };
                error!(field = %def.name, "{err}");
                None
            }
        }
    }

    /// Produces the edit-mask data for a field.
    pub fn render_edit(
        &self,
        def: &FieldDefinition,
        current: Option<&FieldValue>,
    ) -> Option<EditRender> {
        let backend = self.checked_backend(def)?;
        Some(backend.render_edit(def, current))
    }

    /// Produces the display data for a field.
    pub fn render_display(
        &self,
        def: &FieldDefinition,
        value: Option<&FieldValue>,
    ) -> Option<DisplayRender> {
        let backend = self.checked_backend(def)?;
        Some(backend.render_display(def, value))
    }

    /// Reads the stored value. Pure delegation — the dispatcher performs no
    /// coercion on what the backend returns.
    pub fn value_get(
        &self,
        def: &FieldDefinition,
        object_id: &ObjectId,
        ctx: DispatchContext<'_>,
    ) -> Option<Option<FieldValue>> {
        let backend = self.checked_backend(def)?;
        match backend.value_get(def, object_id, ctx.store) {
            Ok(value) => Some(value),
            Err(e) => {
                error!(field = %def.name, object = %object_id, "value read failed: {e}");
                None
            }
        }
    }

    /// Writes (or clears) a field value.
    ///
    /// When the stored value already equals the new one, the write is
    /// skipped and success is reported without touching storage. On a real
    /// write to an audited object kind, a history entry is appended and a
    /// field event is emitted; failures in those side effects are logged
    /// but do not retract the committed write.
    ///
    /// Returns `Some(true)` on success, `None` on any failure.
    pub fn value_set(
        &self,
        def: &FieldDefinition,
        object_id: &ObjectId,
        new: Option<&FieldValue>,
        ctx: DispatchContext<'_>,
    ) -> Option<bool> {
        let backend = self.checked_backend(def)?;

        match new {
            Some(value) => {
                if let Err(e) = backend.validate(def, value) {
                    error!(field = %def.name, object = %object_id, "value rejected: {e}");
                    return None;
                }
            }
            None if def.mandatory => {
                let err = FieldsError::MandatoryField {
                    field: def.name.clone(),
                };
                error!(object = %object_id, "{err}");
                return None;
            }
            None => {}
        }

        let old = match backend.value_get(def, object_id, ctx.store) {
            Ok(old) => old,
            Err(e) => {
                error!(field = %def.name, object = %object_id, "pre-write read failed: {e}");
                return None;
            }
        };

        // Idempotence: a defined value equal to the stored one is a no-op.
        if let (Some(old_value), Some(new_value)) = (&old, new) {
            if *old_value == *new_value {
                debug!(field = %def.name, object = %object_id, "value unchanged, skipping write");
                return Some(true);
            }
        }

        if let Err(e) = backend.value_set(def, object_id, new, ctx.store) {
            error!(field = %def.name, object = %object_id, "value write failed: {e}");
            return None;
        }

        if self.is_audited(def.object_kind) {
            self.record_change(def, object_id, &old, new, ctx);
        }

        Some(true)
    }

    fn record_change(
        &self,
        def: &FieldDefinition,
        object_id: &ObjectId,
        old: &Option<FieldValue>,
        new: Option<&FieldValue>,
        ctx: DispatchContext<'_>,
    ) {
        let old_json = old.as_ref().map(FieldValue::to_json);
        let new_json = new.map(FieldValue::to_json);

        let entry = HistoryEntry::new(
            *object_id,
            def.name.clone(),
            old_json,
            new_json.clone(),
            ctx.user_id,
        );
        if let Err(e) = ctx.store.append_history(&entry) {
            warn!(field = %def.name, object = %object_id, "history append failed: {e}");
        }

        let name = match def.object_kind {
            ObjectKind::Ticket => EventName::TicketDynamicFieldUpdate,
            ObjectKind::Article => EventName::ArticleDynamicFieldUpdate,
            other => EventName::DynamicFieldUpdate(other.to_string()),
        };
        let event = FieldEvent::new(name, def.name.clone(), *object_id, new_json, ctx.user_id);
        if let Err(e) = ctx.notifier.notify(&event) {
            warn!(field = %def.name, object = %object_id, "event delivery failed: {e}");
        }
    }

    /// Produces a backend-specific WHERE fragment for a search term.
    ///
    /// An empty term short-circuits to "no predicate" without delegating.
    pub fn search_predicate(
        &self,
        def: &FieldDefinition,
        term: &SearchTerm,
    ) -> Option<SqlPredicate> {
        let backend = self.checked_backend(def)?;
        if term.is_empty() {
            return None;
        }
        backend.search_predicate(def, term)
    }

    /// Produces the ORDER BY expression for a field.
    pub fn sort_key(&self, def: &FieldDefinition) -> Option<SortKey> {
        let backend = self.checked_backend(def)?;
        Some(backend.sort_key(def))
    }
}

impl std::fmt::Debug for FieldDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDispatcher")
            .field("registry", &self.registry)
            .field("audited_kinds", &self.audited_kinds)
            .finish()
    }
}
