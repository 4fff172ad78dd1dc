//! DuckDB key-value store implementation

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use duckdb::{params, Connection, OptionalExt};

use crate::domain::result::Result as CoreResult;
use crate::migrations::MIGRATIONS;
use crate::ports::KeyValueStore;
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of retries when the database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// Embedded durable key-value store backed by a single DuckDB table
pub struct DuckDbStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl DuckDbStore {
    /// Open (or create) the store at `db_path` and run pending migrations
    ///
    /// Opening retries with exponential backoff on file locking errors, which
    /// show up when two CLI invocations race for the same file.
    pub fn open(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    let store = Self {
                        conn: Mutex::new(conn),
                        db_path: Some(db_path.to_path_buf()),
                    };
                    store.run_migrations()?;
                    return Ok(store);
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        tracing::warn!(
                            path = %db_path.display(),
                            attempt = attempt + 1,
                            max = MAX_RETRIES,
                            "Store busy, retrying in {}ms: {}",
                            delay.as_millis(),
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| anyhow!("Failed to open store after {} retries", MAX_RETRIES)))
    }

    /// Open a throwaway in-memory DuckDB store
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
            db_path: None,
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Extension autoloading is disabled; the store needs no extensions
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Ok(Connection::open_with_flags(db_path, config)?)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))
    }

    /// Run pending store migrations
    pub fn run_migrations(&self) -> Result<MigrationResult> {
        let conn = self.lock()?;
        MigrationService::new(&conn, MIGRATIONS).run_pending()
    }

    /// Path of the backing file, `None` for in-memory stores
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn get_value(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT kv_value FROM sys_kv WHERE kv_key = ?",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_value(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO sys_kv (kv_key, kv_value, updated_at) VALUES (?, ?, current_timestamp)
             ON CONFLICT (kv_key) DO UPDATE SET
                kv_value = excluded.kv_value,
                updated_at = excluded.updated_at",
            params![key, value],
        )?;
        Ok(())
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT kv_key FROM sys_kv ORDER BY kv_key")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    fn delete_key(&self, key: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM sys_kv WHERE kv_key = ?", [key])?;
        Ok(())
    }
}

impl KeyValueStore for DuckDbStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.get_value(key)?)
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        Ok(self.set_value(key, value)?)
    }

    fn list(&self) -> CoreResult<Vec<String>> {
        Ok(self.list_keys()?)
    }

    fn delete(&self, key: &str) -> CoreResult<()> {
        Ok(self.delete_key(key)?)
    }
}
