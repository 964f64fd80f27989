// SQLite journal of committed events, used to recover a session after a
// crash or an unclean exit.

use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection};

use crate::events::{Event, EventKind};
use crate::pitch::RelativePoint;

/// SQLite-backed journal for session events and key-value session state.
pub struct Database {
    conn: Mutex<Connection>,
}

/// Raw `session_events` row before the kind is parsed.
type EventRow = (String, f64, f64, Option<f64>, Option<f64>, Option<f64>, Option<f64>);

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS session_events (
                session_id TEXT NOT NULL,
                seq        INTEGER NOT NULL,
                kind       TEXT NOT NULL,
                rx         REAL NOT NULL,
                ry         REAL NOT NULL,
                end_rx     REAL,
                end_ry     REAL,
                xg         REAL,
                xa         REAL,
                timestamp  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                PRIMARY KEY (session_id, seq)
            );

            CREATE TABLE IF NOT EXISTS session_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Journal a committed event at position `seq` in the session's log.
    /// Re-recording the same `seq` replaces the row.
    pub fn record_event(&self, session_id: &str, seq: usize, event: &Event) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "INSERT OR REPLACE INTO session_events
                (session_id, seq, kind, rx, ry, end_rx, end_ry, xg, xa)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                session_id,
                seq as i64,
                event.kind.as_str(),
                event.start.rx,
                event.start.ry,
                event.end.map(|p| p.rx),
                event.end.map(|p| p.ry),
                event.xg,
                event.xa,
            ],
        )
        .context("failed to record session event")?;
        Ok(())
    }

    /// Drop the highest-`seq` event of a session. Returns `false` when the
    /// session had no events.
    pub fn remove_last_event(&self, session_id: &str) -> Result<bool> {
        let conn = self.conn();
        let removed = conn
            .execute(
                "DELETE FROM session_events
                 WHERE session_id = ?1
                   AND seq = (SELECT MAX(seq) FROM session_events WHERE session_id = ?1)",
                params![session_id],
            )
            .context("failed to remove last session event")?;
        Ok(removed > 0)
    }

    /// Delete every journalled event of a session. Session state is kept.
    pub fn clear_session(&self, session_id: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "DELETE FROM session_events WHERE session_id = ?1",
            params![session_id],
        )
        .context("failed to clear session events")?;
        Ok(())
    }

    /// Load a session's events in log order.
    pub fn load_events(&self, session_id: &str) -> Result<Vec<Event>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT kind, rx, ry, end_rx, end_ry, xg, xa
                 FROM session_events WHERE session_id = ?1 ORDER BY seq",
            )
            .context("failed to prepare load_events query")?;

        let rows: Vec<EventRow> = stmt
            .query_map(params![session_id], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                ))
            })
            .context("failed to query session events")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map session event rows")?;

        rows.into_iter()
            .map(|(kind, rx, ry, end_rx, end_ry, xg, xa)| -> Result<Event> {
                let kind = EventKind::from_str_kind(&kind)
                    .ok_or_else(|| anyhow!("unknown event kind {kind:?} in journal"))?;
                let end = match (end_rx, end_ry) {
                    (Some(erx), Some(ery)) => Some(RelativePoint::new(erx, ery)),
                    _ => None,
                };
                Ok(Event {
                    start: RelativePoint::new(rx, ry),
                    end,
                    kind,
                    xg,
                    xa,
                })
            })
            .collect()
    }

    /// Number of events journalled for a session.
    pub fn event_count(&self, session_id: &str) -> Result<usize> {
        let conn = self.conn();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM session_events WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )
            .context("failed to count session events")?;
        Ok(count as usize)
    }

    /// Returns `true` if at least one event has been journalled for the
    /// given session.
    pub fn has_session_in_progress(&self, session_id: &str) -> Result<bool> {
        let conn = self.conn();
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM session_events WHERE session_id = ?1)",
                params![session_id],
                |row| row.get(0),
            )
            .context("failed to check session_events existence")?;
        Ok(exists)
    }

    /// Persist an arbitrary JSON value under `key`. Uses INSERT OR REPLACE so
    /// repeated saves overwrite the previous value.
    pub fn save_state(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.conn();
        let json_str =
            serde_json::to_string(value).context("failed to serialize state value")?;
        conn.execute(
            "INSERT OR REPLACE INTO session_state (key, value) VALUES (?1, ?2)",
            params![key, json_str],
        )
        .context("failed to save state")?;
        Ok(())
    }

    /// Load a previously saved JSON value by `key`. Returns `None` if the key
    /// does not exist.
    pub fn load_state(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT value FROM session_state WHERE key = ?1")
            .context("failed to prepare load_state query")?;

        let mut rows = stmt
            .query_map(params![key], |row| row.get::<_, String>(0))
            .context("failed to query session state")?;

        match rows.next() {
            Some(row_result) => {
                let json_str = row_result.context("failed to read state row")?;
                let value: serde_json::Value = serde_json::from_str(&json_str)
                    .context("failed to deserialize state value")?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    // ------------------------------------------------------------------
    // Session ID management
    // ------------------------------------------------------------------

    /// Key used in the session_state table to store the current session ID.
    const SESSION_ID_KEY: &'static str = "current_session_id";

    /// Retrieve the stored session ID. Returns `None` if none has been set.
    pub fn get_session_id(&self) -> Result<Option<String>> {
        let value = self.load_state(Self::SESSION_ID_KEY)?;
        Ok(value.and_then(|v| v.as_str().map(|s| s.to_string())))
    }

    pub fn set_session_id(&self, session_id: &str) -> Result<()> {
        self.save_state(
            Self::SESSION_ID_KEY,
            &serde_json::Value::String(session_id.to_string()),
        )
    }

    /// Generate a new session ID from the current UTC timestamp.
    ///
    /// Format: `session_YYYYMMDD_HHMMSS_SSS`. The millisecond suffix keeps
    /// IDs distinct even if two sessions start in the same second.
    pub fn generate_session_id() -> String {
        chrono::Utc::now()
            .format("session_%Y%m%d_%H%M%S_%3f")
            .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
