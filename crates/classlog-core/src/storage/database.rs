//! SQLite-based observation storage.
//!
//! Provides persistent storage for:
//! - Completed observation sessions (archived snapshots)
//! - A key-value store for application state, including the live
//!   session engine between CLI invocations

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::DatabaseError;
use crate::session::SessionSnapshot;

/// One archived observation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub id: i64,
    pub subject: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_secs: u64,
}

/// All-time archive totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Totals {
    pub total_observations: u64,
    pub total_observed_secs: u64,
}

/// SQLite database for observation storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/classlog/classlog.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let path = data_dir()?.join("classlog.db");
        let conn =
            Connection::open(&path).map_err(|source| DatabaseError::OpenFailed { path, source })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS observations (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                subject       TEXT NOT NULL,
                started_at    TEXT NOT NULL,
                ended_at      TEXT NOT NULL,
                duration_secs INTEGER NOT NULL,
                snapshot      TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_observations_started_at ON observations(started_at);",
        )?;
        Ok(())
    }

    /// Archive a completed session snapshot.
    ///
    /// # Errors
    /// Fails when the snapshot is missing its start or end timestamp.
    pub fn record_observation(&self, snapshot: &SessionSnapshot) -> Result<i64, DatabaseError> {
        let (Some(started_at), Some(ended_at)) = (snapshot.started_at, snapshot.ended_at) else {
            return Err(DatabaseError::QueryFailed(
                "cannot archive a session without start and end times".to_string(),
            ));
        };
        let duration_secs = (ended_at - started_at).num_seconds().max(0) as u64;
        self.conn.execute(
            "INSERT INTO observations (subject, started_at, ended_at, duration_secs, snapshot)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                snapshot.subject,
                started_at.to_rfc3339(),
                ended_at.to_rfc3339(),
                duration_secs,
                serde_json::to_string(snapshot)?,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Most recent observations, newest first.
    pub fn list_observations(&self, limit: u32) -> Result<Vec<ObservationRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, subject, started_at, ended_at, duration_secs
             FROM observations
             ORDER BY started_at DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, u64>(4)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, subject, started_at, ended_at, duration_secs) = row?;
            records.push(ObservationRecord {
                id,
                subject,
                started_at: parse_instant(&started_at)?,
                ended_at: parse_instant(&ended_at)?,
                duration_secs,
            });
        }
        Ok(records)
    }

    /// Load the full snapshot of an archived observation.
    pub fn load_snapshot(&self, id: i64) -> Result<Option<SessionSnapshot>, DatabaseError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT snapshot FROM observations WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn totals(&self) -> Result<Totals, DatabaseError> {
        self.conn
            .query_row(
                "SELECT COUNT(*), COALESCE(SUM(duration_secs), 0) FROM observations",
                [],
                |row| {
                    Ok(Totals {
                        total_observations: row.get(0)?,
                        total_observed_secs: row.get(1)?,
                    })
                },
            )
            .map_err(DatabaseError::from)
    }

    // ── Key-value store ──────────────────────────────────────────────

    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(DatabaseError::from)
    }

    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| DatabaseError::QueryFailed(format!("invalid timestamp '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ObserverSession;
    use chrono::{Duration, TimeZone};

    fn finished_snapshot() -> SessionSnapshot {
        let start = Utc.with_ymd_and_hms(2024, 9, 2, 9, 0, 0).unwrap();
        let mut session = ObserverSession::default();
        session.start("Year 8 Mathematics", start);
        session.toggle_mode("lecture", start);
        for i in 1..=30 {
            session.tick(start + Duration::seconds(i));
        }
        session.stop(start + Duration::seconds(45));
        session.snapshot()
    }

    #[test]
    fn kv_round_trip() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.kv_get("k").unwrap(), None);
        db.kv_set("k", "v1").unwrap();
        db.kv_set("k", "v2").unwrap();
        assert_eq!(db.kv_get("k").unwrap().as_deref(), Some("v2"));
        db.kv_delete("k").unwrap();
        assert_eq!(db.kv_get("k").unwrap(), None);
    }

    #[test]
    fn archive_and_list_observations() {
        let db = Database::open_memory().unwrap();
        let id = db.record_observation(&finished_snapshot()).unwrap();
        let records = db.list_observations(10).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
        assert_eq!(records[0].subject, "Year 8 Mathematics");
        assert_eq!(records[0].duration_secs, 45);
    }

    #[test]
    fn snapshot_round_trips_through_archive() {
        let db = Database::open_memory().unwrap();
        let snapshot = finished_snapshot();
        let id = db.record_observation(&snapshot).unwrap();
        let restored = db.load_snapshot(id).unwrap().unwrap();
        assert_eq!(restored.subject, snapshot.subject);
        assert_eq!(restored.modes, snapshot.modes);
        assert_eq!(restored.log.len(), snapshot.log.len());
        assert!(db.load_snapshot(id + 1).unwrap().is_none());
    }

    #[test]
    fn unfinished_snapshot_is_rejected() {
        let db = Database::open_memory().unwrap();
        let mut session = ObserverSession::default();
        session.start("Year 8 Mathematics", Utc::now());
        assert!(db.record_observation(&session.snapshot()).is_err());
    }

    #[test]
    fn totals_accumulate() {
        let db = Database::open_memory().unwrap();
        db.record_observation(&finished_snapshot()).unwrap();
        db.record_observation(&finished_snapshot()).unwrap();
        let totals = db.totals().unwrap();
        assert_eq!(totals.total_observations, 2);
        assert_eq!(totals.total_observed_secs, 90);
    }
}
