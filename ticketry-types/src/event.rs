//! Field change events and history entries.
//!
//! Whenever a dynamic field value is written for an audited object kind, the
//! dispatcher appends a [`HistoryEntry`] to the audit trail and emits a
//! [`FieldEvent`] through the configured notifier. Both carry the field name,
//! the new value as JSON, and the acting user, so downstream consumers
//! (notification rules, escalation triggers, webhooks) never need to re-read
//! the store.

use crate::{ObjectId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Unique identifier for an emitted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new event ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// The name under which a field update event is published.
///
/// Ticket and article updates keep their historical names so existing
/// notification rules keep matching; every other object kind publishes under
/// the generic variant carrying its kind tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "kind", rename_all = "PascalCase")]
pub enum EventName {
    TicketDynamicFieldUpdate,
    ArticleDynamicFieldUpdate,
    /// Field update on any other audited object kind (kind tag attached).
    DynamicFieldUpdate(String),
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TicketDynamicFieldUpdate => f.write_str("TicketDynamicFieldUpdate"),
            Self::ArticleDynamicFieldUpdate => f.write_str("ArticleDynamicFieldUpdate"),
            Self::DynamicFieldUpdate(kind) => write!(f, "DynamicFieldUpdate:{kind}"),
        }
    }
}

/// A domain event announcing that a field value changed.
///
/// Events are immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEvent {
    /// Unique identifier for this event.
    pub id: EventId,

    /// The published event name.
    pub name: EventName,

    /// The internal name of the field that changed.
    pub field_name: String,

    /// The object whose field changed.
    pub object_id: ObjectId,

    /// The new value as JSON, or `None` when the value was cleared.
    pub value: Option<serde_json::Value>,

    /// The user who performed the write.
    pub user_id: UserId,

    /// Milliseconds since the Unix epoch.
    pub occurred_at: i64,
}

impl FieldEvent {
    /// Creates a new event stamped with the current time.
    #[must_use]
    pub fn new(
        name: EventName,
        field_name: impl Into<String>,
        object_id: ObjectId,
        value: Option<serde_json::Value>,
        user_id: UserId,
    ) -> Self {
        Self {
            id: EventId::new(),
            name,
            field_name: field_name.into(),
            object_id,
            value,
            user_id,
            occurred_at: now_millis(),
        }
    }
}

/// One row of the field audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The object whose field changed.
    pub object_id: ObjectId,

    /// The internal name of the field.
    pub field_name: String,

    /// The previous value as JSON, if any.
    pub old_value: Option<serde_json::Value>,

    /// The new value as JSON, if any.
    pub new_value: Option<serde_json::Value>,

    /// The user who performed the write.
    pub user_id: UserId,

    /// Milliseconds since the Unix epoch.
    pub recorded_at: i64,
}

impl HistoryEntry {
    /// Creates an entry stamped with the current time.
    #[must_use]
    pub fn new(
        object_id: ObjectId,
        field_name: impl Into<String>,
        old_value: Option<serde_json::Value>,
        new_value: Option<serde_json::Value>,
        user_id: UserId,
    ) -> Self {
        Self {
            object_id,
            field_name: field_name.into(),
            old_value,
            new_value,
            user_id,
            recorded_at: now_millis(),
        }
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
