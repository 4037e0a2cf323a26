use super::db::Db;
use crate::libs::store::{SnapshotSink, StoreSnapshot};
use anyhow::Result;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

const SCHEMA_SNAPSHOTS: &str = "CREATE TABLE IF NOT EXISTS snapshots (
    slot TEXT NOT NULL PRIMARY KEY,
    payload TEXT NOT NULL,
    saved_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);";
const UPSERT_SNAPSHOT: &str = "INSERT INTO snapshots (slot, payload, saved_at) VALUES (?1, ?2, datetime(CURRENT_TIMESTAMP, 'localtime'))
    ON CONFLICT(slot) DO UPDATE SET payload = excluded.payload, saved_at = excluded.saved_at";
const SELECT_SNAPSHOT: &str = "SELECT payload FROM snapshots WHERE slot = ?1";
const DELETE_SNAPSHOT: &str = "DELETE FROM snapshots WHERE slot = ?1";

/// Store snapshots kept as JSON, one row per slot.
pub struct Snapshots {
    conn: Mutex<Connection>,
}

impl Snapshots {
    pub fn new() -> Result<Snapshots> {
        Self::init(Db::new()?)
    }

    pub fn open(path: &Path) -> Result<Snapshots> {
        Self::init(Db::open(path)?)
    }

    pub fn in_memory() -> Result<Snapshots> {
        Self::init(Db::in_memory()?)
    }

    fn init(db: Db) -> Result<Snapshots> {
        db.conn.execute(SCHEMA_SNAPSHOTS, [])?;
        Ok(Snapshots { conn: Mutex::new(db.conn) })
    }

    pub fn delete(&self, slot: &str) -> Result<()> {
        self.conn.lock().execute(DELETE_SNAPSHOT, params![slot])?;
        Ok(())
    }
}

impl SnapshotSink for Snapshots {
    fn load(&self, slot: &str) -> Result<Option<StoreSnapshot>> {
        let payload: Option<String> = self
            .conn
            .lock()
            .query_row(SELECT_SNAPSHOT, params![slot], |row| row.get(0))
            .optional()?;

        match payload {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    fn save(&self, slot: &str, snapshot: &StoreSnapshot) -> Result<()> {
        let payload = serde_json::to_string(snapshot)?;
        self.conn.lock().execute(UPSERT_SNAPSHOT, params![slot, payload])?;
        Ok(())
    }
}
