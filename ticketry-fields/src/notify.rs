//! The event sink the dispatcher publishes field changes through.

use thiserror::Error;
use ticketry_types::FieldEvent;

/// Error from an event sink.
#[derive(Debug, Error)]
#[error("notifier error: {0}")]
pub struct NotifyError(pub String);

/// Accepts field change events for downstream delivery (notification rules,
/// webhooks, escalations). Implementations must not block on remote
/// delivery; queueing is their concern.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: &FieldEvent) -> Result<(), NotifyError>;
}

/// Discards every event. For contexts with no event pipeline (migration
/// scripts, tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: &FieldEvent) -> Result<(), NotifyError> {
        Ok(())
    }
}
