//! The loop protection guard and its SQLite log.

use crate::GuardResult;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use ticketry_types::{Clock, DayBucket, SystemClock};
use tracing::{debug, warn};

fn default_max_per_day() -> u32 {
    40
}

/// Configuration for the loop protection guard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopProtectionConfig {
    /// Maximum automated sends to one recipient within a calendar day.
    #[serde(default = "default_max_per_day")]
    pub max_per_day: u32,
}

impl Default for LoopProtectionConfig {
    fn default() -> Self {
        Self {
            max_per_day: default_max_per_day(),
        }
    }
}

/// Per-recipient per-day rate guard over a `(recipient, day)` log table.
pub struct LoopProtection {
    conn: Arc<Mutex<Connection>>,
    config: LoopProtectionConfig,
    clock: Box<dyn Clock>,
}

impl LoopProtection {
    /// Opens (or creates) a guard log at the given path.
    pub fn new(path: impl AsRef<Path>, config: LoopProtectionConfig) -> GuardResult<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn, config)
    }

    /// Opens an in-memory guard log (for testing).
    pub fn open_in_memory(config: LoopProtectionConfig) -> GuardResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, config)
    }

    fn with_connection(conn: Connection, config: LoopProtectionConfig) -> GuardResult<Self> {
        let guard = Self {
            conn: Arc::new(Mutex::new(conn)),
            config,
            clock: Box::new(SystemClock),
        };
        guard.init_schema()?;
        Ok(guard)
    }

    /// Replaces the clock source. Tests use this to advance the day.
    pub fn set_clock(&mut self, clock: Box<dyn Clock>) {
        self.clock = clock;
    }

    fn init_schema(&self) -> GuardResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS ticket_loop_protection (
                sent_to TEXT NOT NULL,
                sent_date TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_loop_protection_sent
                ON ticket_loop_protection (sent_to, sent_date);
            ",
        )?;
        Ok(())
    }

    /// Records one automated send to a recipient, then purges every log
    /// entry from other days. The purge on every write keeps the log
    /// bounded to one day's entries.
    pub fn record(&self, recipient: &str) -> GuardResult<()> {
        let recipient = recipient.trim().to_lowercase();
        let today = self.clock.today();
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO ticket_loop_protection (sent_to, sent_date) VALUES (?1, ?2)",
            params![recipient, today.as_str()],
        )?;
        let purged = conn.execute(
            "DELETE FROM ticket_loop_protection WHERE sent_date != ?1",
            params![today.as_str()],
        )?;
        if purged > 0 {
            debug!(purged, "dropped loop protection entries from previous days");
        }
        Ok(())
    }

    /// Checks whether another automated send to this recipient is allowed
    /// today. Returns `true` to permit. Does not record; callers record
    /// after a successful send.
    pub fn check(&self, recipient: &str) -> GuardResult<bool> {
        let recipient = recipient.trim().to_lowercase();
        let today = self.clock.today();
        let sent = self.count(&recipient, &today)?;

        if sent >= self.config.max_per_day {
            warn!(
                recipient = %recipient,
                sent,
                max_per_day = self.config.max_per_day,
                "loop protection: send ceiling reached, denying auto-response"
            );
            return Ok(false);
        }
        Ok(true)
    }

    /// Records and checks in one transaction: the insert is rolled back
    /// when it would exceed the ceiling. Closes the race between separate
    /// `check` and `record` calls. Returns `true` when the send is allowed
    /// (and stays recorded).
    pub fn record_and_check(&self, recipient: &str) -> GuardResult<bool> {
        let recipient = recipient.trim().to_lowercase();
        let today = self.clock.today();
        let mut conn = self.conn.lock().unwrap();

        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO ticket_loop_protection (sent_to, sent_date) VALUES (?1, ?2)",
            params![recipient, today.as_str()],
        )?;
        tx.execute(
            "DELETE FROM ticket_loop_protection WHERE sent_date != ?1",
            params![today.as_str()],
        )?;
        let sent: u32 = tx.query_row(
            "SELECT COUNT(*) FROM ticket_loop_protection WHERE sent_to = ?1 AND sent_date = ?2",
            params![recipient, today.as_str()],
            |row| row.get(0),
        )?;

        if sent > self.config.max_per_day {
            tx.rollback()?;
            warn!(
                recipient = %recipient,
                max_per_day = self.config.max_per_day,
                "loop protection: send ceiling reached, denying auto-response"
            );
            return Ok(false);
        }
        tx.commit()?;
        Ok(true)
    }

    /// Number of recorded sends to a recipient today.
    pub fn sent_today(&self, recipient: &str) -> GuardResult<u32> {
        let recipient = recipient.trim().to_lowercase();
        let today = self.clock.today();
        self.count(&recipient, &today)
    }

    fn count(&self, recipient: &str, day: &DayBucket) -> GuardResult<u32> {
        let conn = self.conn.lock().unwrap();
        let sent = conn.query_row(
            "SELECT COUNT(*) FROM ticket_loop_protection WHERE sent_to = ?1 AND sent_date = ?2",
            params![recipient, day.as_str()],
            |row| row.get(0),
        )?;
        Ok(sent)
    }
}

impl std::fmt::Debug for LoopProtection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopProtection")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
