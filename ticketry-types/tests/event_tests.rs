use pretty_assertions::{assert_eq, assert_ne};
use serde_json::json;
use std::str::FromStr;
use ticketry_types::{EventId, EventName, FieldEvent, HistoryEntry, ObjectId, UserId};

// ── EventId ───────────────────────────────────────────────────────

#[test]
fn event_id_unique() {
    let a = EventId::new();
    let b = EventId::new();
    assert_ne!(a, b);
}

#[test]
fn event_id_display_roundtrip() {
    let id = EventId::new();
    let s = id.to_string();
    let parsed: EventId = s.parse().unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn event_id_from_str_invalid() {
    assert!(EventId::from_str("bad").is_err());
}

// ── EventName ─────────────────────────────────────────────────────

#[test]
fn ticket_event_name_display() {
    assert_eq!(
        EventName::TicketDynamicFieldUpdate.to_string(),
        "TicketDynamicFieldUpdate"
    );
}

#[test]
fn generic_event_name_carries_kind() {
    let name = EventName::DynamicFieldUpdate("CustomerCompany".into());
    assert_eq!(name.to_string(), "DynamicFieldUpdate:CustomerCompany");
}

#[test]
fn event_name_serde_roundtrip() {
    for name in [
        EventName::TicketDynamicFieldUpdate,
        EventName::ArticleDynamicFieldUpdate,
        EventName::DynamicFieldUpdate("CustomerUser".into()),
    ] {
        let json = serde_json::to_string(&name).unwrap();
        let parsed: EventName = serde_json::from_str(&json).unwrap();
        assert_eq!(name, parsed);
    }
}

// ── FieldEvent ────────────────────────────────────────────────────

#[test]
fn field_event_carries_payload() {
    let object_id = ObjectId::new();
    let user_id = UserId::new();
    let event = FieldEvent::new(
        EventName::TicketDynamicFieldUpdate,
        "priority_reason",
        object_id,
        Some(json!("hardware failure")),
        user_id,
    );

    assert_eq!(event.field_name, "priority_reason");
    assert_eq!(event.object_id, object_id);
    assert_eq!(event.user_id, user_id);
    assert_eq!(event.value, Some(json!("hardware failure")));
    assert!(event.occurred_at > 0);
}

#[test]
fn field_event_ids_are_unique() {
    let object_id = ObjectId::new();
    let user_id = UserId::new();
    let a = FieldEvent::new(
        EventName::ArticleDynamicFieldUpdate,
        "f",
        object_id,
        None,
        user_id,
    );
    let b = FieldEvent::new(
        EventName::ArticleDynamicFieldUpdate,
        "f",
        object_id,
        None,
        user_id,
    );
    assert_ne!(a.id, b.id);
}

#[test]
fn field_event_serde_roundtrip() {
    let event = FieldEvent::new(
        EventName::DynamicFieldUpdate("CustomerUser".into()),
        "vip_level",
        ObjectId::new(),
        Some(json!(["gold", "priority"])),
        UserId::new(),
    );
    let json = serde_json::to_string(&event).unwrap();
    let parsed: FieldEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(event, parsed);
}

// ── HistoryEntry ──────────────────────────────────────────────────

#[test]
fn history_entry_tracks_old_and_new() {
    let entry = HistoryEntry::new(
        ObjectId::new(),
        "severity",
        Some(json!("low")),
        Some(json!("high")),
        UserId::new(),
    );
    assert_eq!(entry.old_value, Some(json!("low")));
    assert_eq!(entry.new_value, Some(json!("high")));
    assert!(entry.recorded_at > 0);
}

#[test]
fn history_entry_cleared_value() {
    let entry = HistoryEntry::new(ObjectId::new(), "severity", Some(json!("low")), None, UserId::new());
    assert!(entry.new_value.is_none());
}
