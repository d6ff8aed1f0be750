//! SQLite-backed cache store.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use super::CacheStore;

/// Database version for migrations.
const SCHEMA_VERSION: i32 = 1;

/// Cache entries in a single SQLite table.
///
/// `rusqlite::Connection` is not `Sync`, so access is serialized through a
/// mutex.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create the database at a specific path.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {:?}", path))?;
        Self::initialize(conn)
    }

    /// Open an in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS state_cache (
                key TEXT PRIMARY KEY,
                payload TEXT NOT NULL,
                expires_at TEXT NOT NULL
            );
            "#,
        )?;
        conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES ('schema_version', ?1)",
            params![SCHEMA_VERSION.to_string()],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Delete every expired entry. Returns the number removed.
    pub fn purge_expired(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let now = timestamp(Utc::now());
        let removed = conn.execute(
            "DELETE FROM state_cache WHERE expires_at <= ?1",
            params![now],
        )?;
        Ok(removed)
    }
}

impl CacheStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let row: Option<(String, String)> = conn
            .query_row(
                "SELECT payload, expires_at FROM state_cache WHERE key = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((payload, expires_at)) = row else {
            return Ok(None);
        };

        let expired = DateTime::parse_from_rfc3339(&expires_at)
            .map(|dt| dt.with_timezone(&Utc) <= Utc::now())
            .unwrap_or(true);
        if expired {
            conn.execute("DELETE FROM state_cache WHERE key = ?1", params![key])?;
            return Ok(None);
        }
        Ok(Some(payload))
    }

    fn set(&self, key: &str, payload: &str, expires_at: DateTime<Utc>) -> Result<()> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        conn.execute(
            "INSERT OR REPLACE INTO state_cache (key, payload, expires_at) VALUES (?1, ?2, ?3)",
            params![key, payload, timestamp(expires_at)],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        conn.execute("DELETE FROM state_cache WHERE key = ?1", params![key])?;
        Ok(())
    }
}

/// Fixed-width RFC3339 so SQL string comparison orders chronologically.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}
