//! Database module for Quote Manager
//! Handles SQLite storage for the persisted key-value state

use crate::constants::DB_SCHEMA_VERSION;
use crate::error::StorageError;
use rusqlite::{params, Connection, OptionalExtension, Result};
use std::path::Path;
use tracing::debug;

/// Key-value persistence used by the quote store and the session
pub trait Persistence {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> std::result::Result<(), StorageError>;
}

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        debug!(path = %path.display(), "Database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS metadata (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;

        if self.get_db_version()?.is_none() {
            self.set_db_version(DB_SCHEMA_VERSION)?;
        }
        Ok(())
    }

    /// Get a setting value
    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
    }

    /// Set a setting value
    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Get database schema version
    pub fn get_db_version(&self) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM metadata WHERE key = 'version'",
                [],
                |row| row.get(0),
            )
            .optional()
    }

    /// Set database schema version
    pub fn set_db_version(&self, version: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO metadata (key, value) VALUES ('version', ?1)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![version],
        )?;
        Ok(())
    }
}

impl Persistence for Database {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
        Ok(self.get_setting(key)?)
    }

    fn set(&self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
        Ok(self.set_setting(key, value)?)
    }
}
