//! Generic key-value store for dynamic field values, backed by SQLite.
//!
//! Every field backend persists through this store. The dispatcher's
//! idempotence check relies on [`ValueStore::write_count`]: a skipped write
//! leaves the counter untouched.

use crate::error::{StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use ticketry_types::{FieldId, HistoryEntry, ObjectId, UserId};
use tracing::debug;

/// Persistent store for field values and field history.
pub struct ValueStore {
    conn: Arc<Mutex<Connection>>,
    writes: AtomicU64,
}

impl ValueStore {
    /// Opens (or creates) a value store at the given path.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            writes: AtomicU64::new(0),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Opens an in-memory value store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            writes: AtomicU64::new(0),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS dynamic_field_value (
                field_id TEXT NOT NULL,
                object_id TEXT NOT NULL,
                value TEXT NOT NULL,
                UNIQUE(field_id, object_id)
            );

            CREATE INDEX IF NOT EXISTS idx_field_value_object
                ON dynamic_field_value (object_id);

            CREATE TABLE IF NOT EXISTS field_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                object_id TEXT NOT NULL,
                field_name TEXT NOT NULL,
                old_value TEXT,
                new_value TEXT,
                user_id TEXT NOT NULL,
                recorded_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_field_history_object
                ON field_history (object_id);
            ",
        )?;
        Ok(())
    }

    // ── Field values ────────────────────────────────────────────

    /// Reads the stored value for `(field_id, object_id)`, if any.
    pub fn get(
        &self,
        field_id: &FieldId,
        object_id: &ObjectId,
    ) -> StoreResult<Option<serde_json::Value>> {
        let conn = self.conn.lock().unwrap();
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM dynamic_field_value WHERE field_id = ?1 AND object_id = ?2",
                params![field_id.to_string(), object_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    /// Writes the value for `(field_id, object_id)`, replacing any previous
    /// value as a whole.
    pub fn set(
        &self,
        field_id: &FieldId,
        object_id: &ObjectId,
        value: &serde_json::Value,
    ) -> StoreResult<()> {
        let text = serde_json::to_string(value)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO dynamic_field_value (field_id, object_id, value)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(field_id, object_id) DO UPDATE SET value = excluded.value",
            params![field_id.to_string(), object_id.to_string(), text],
        )?;
        self.writes.fetch_add(1, Ordering::Relaxed);
        debug!(field = %field_id, object = %object_id, "stored field value");
        Ok(())
    }

    /// Removes the value for `(field_id, object_id)`, if present.
    pub fn delete(&self, field_id: &FieldId, object_id: &ObjectId) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let removed = conn.execute(
            "DELETE FROM dynamic_field_value WHERE field_id = ?1 AND object_id = ?2",
            params![field_id.to_string(), object_id.to_string()],
        )?;
        if removed > 0 {
            self.writes.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }

    /// Returns all `(field_id, value)` pairs stored for an object.
    pub fn values_for_object(
        &self,
        object_id: &ObjectId,
    ) -> StoreResult<Vec<(FieldId, serde_json::Value)>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT field_id, value FROM dynamic_field_value WHERE object_id = ?1 ORDER BY field_id",
        )?;
        let rows = stmt.query_map(params![object_id.to_string()], |row| {
            let field: String = row.get(0)?;
            let value: String = row.get(1)?;
            Ok((field, value))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (field, value) = row?;
            let field_id = FieldId::parse(&field).map_err(|_| {
                rusqlite::Error::InvalidColumnType(0, "field_id".into(), rusqlite::types::Type::Text)
            })?;
            out.push((field_id, serde_json::from_str(&value)?));
        }
        Ok(out)
    }

    /// Removes every field value stored for an object (entity deletion).
    pub fn delete_for_object(&self, object_id: &ObjectId) -> StoreResult<usize> {
        let conn = self.conn.lock().unwrap();
        let removed = conn.execute(
            "DELETE FROM dynamic_field_value WHERE object_id = ?1",
            params![object_id.to_string()],
        )?;
        if removed > 0 {
            self.writes.fetch_add(1, Ordering::Relaxed);
        }
        Ok(removed)
    }

    /// Returns the objects whose value for `field_id` matches a backend
    /// predicate fragment.
    ///
    /// The fragment must use bare `?` placeholders; the field ID bind comes
    /// first, then the fragment's own parameters in order.
    pub fn find_objects(
        &self,
        field_id: &FieldId,
        predicate_sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> StoreResult<Vec<ObjectId>> {
        let sql = format!(
            "SELECT object_id FROM dynamic_field_value
             WHERE field_id = ? AND ({predicate_sql}) ORDER BY object_id"
        );
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&sql)?;

        let field = field_id.to_string();
        let mut binds: Vec<&dyn rusqlite::ToSql> = Vec::with_capacity(params.len() + 1);
        binds.push(&field);
        binds.extend_from_slice(params);

        let rows = stmt.query_map(binds.as_slice(), |row| row.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            let raw = row?;
            let object_id = ObjectId::parse(&raw).map_err(|_| {
                rusqlite::Error::InvalidColumnType(0, "object_id".into(), rusqlite::types::Type::Text)
            })?;
            out.push(object_id);
        }
        Ok(out)
    }

    // ── History ─────────────────────────────────────────────────

    /// Appends an entry to the field audit trail.
    pub fn append_history(&self, entry: &HistoryEntry) -> StoreResult<()> {
        let old = entry
            .old_value
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let new = entry
            .new_value
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO field_history (object_id, field_name, old_value, new_value, user_id, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.object_id.to_string(),
                entry.field_name,
                old,
                new,
                entry.user_id.to_string(),
                entry.recorded_at,
            ],
        )?;
        Ok(())
    }

    /// Returns the audit trail for an object, oldest first.
    pub fn history_for_object(&self, object_id: &ObjectId) -> StoreResult<Vec<HistoryEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT object_id, field_name, old_value, new_value, user_id, recorded_at
             FROM field_history WHERE object_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![object_id.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, i64>(5)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (object, field_name, old, new, user, recorded_at) = row?;
            let object_id = ObjectId::parse(&object).map_err(|_| {
                rusqlite::Error::InvalidColumnType(0, "object_id".into(), rusqlite::types::Type::Text)
            })?;
            let user_id = UserId::parse(&user).map_err(|_| {
                rusqlite::Error::InvalidColumnType(4, "user_id".into(), rusqlite::types::Type::Text)
            })?;
            out.push(HistoryEntry {
                object_id,
                field_name,
                old_value: old.map(|s| serde_json::from_str(&s)).transpose()?,
                new_value: new.map(|s| serde_json::from_str(&s)).transpose()?,
                user_id,
                recorded_at,
            });
        }
        Ok(out)
    }

    // ── Probes ──────────────────────────────────────────────────

    /// Number of mutating value-table statements executed so far.
    ///
    /// Idempotent sets in the dispatcher skip the store entirely, which
    /// tests observe through this counter.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for ValueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueStore")
            .field("writes", &self.write_count())
            .finish_non_exhaustive()
    }
}
