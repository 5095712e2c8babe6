//! Database connection management.
//!
//! Wraps a single rusqlite Connection in a Mutex for thread-safe access.
//! Configures WAL mode and recommended PRAGMAs on initialization.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::info;

use trivia_core::error::TriviaError;
use trivia_core::types::DEFAULT_CATEGORIES;

use crate::migrations;

/// Thread-safe SQLite database wrapper.
///
/// The connection is wrapped in a Mutex since rusqlite Connection is not
/// Sync. Every statement runs with the lock held, so single-statement
/// inserts and deletes are atomic with respect to other requests.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a database at the given path.
    ///
    /// Configures WAL mode, synchronous=NORMAL, and runs all pending
    /// migrations.
    pub fn new(path: &Path) -> Result<Self, TriviaError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| TriviaError::Storage(format!("Failed to open database: {}", e)))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -16384;",
        )
        .map_err(|e| TriviaError::Storage(format!("Failed to set pragmas: {}", e)))?;

        info!("Database opened at {}", path.display());

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.with_conn(migrations::run_migrations)?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn in_memory() -> Result<Self, TriviaError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| TriviaError::Storage(format!("Failed to open in-memory db: {}", e)))?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.with_conn(migrations::run_migrations)?;
        Ok(db)
    }

    /// Execute a closure with a reference to the underlying connection.
    ///
    /// The mutex is held for the duration of the closure.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, TriviaError>
    where
        F: FnOnce(&Connection) -> Result<T, TriviaError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| TriviaError::Storage(format!("Database lock poisoned: {}", e)))?;
        f(&conn)
    }

    /// Insert the default categories that are missing. Returns how many were
    /// inserted. Existing rows with the same id are left untouched.
    pub fn seed_default_categories(&self) -> Result<usize, TriviaError> {
        let inserted = self.with_conn(|conn| {
            let mut inserted = 0;
            for (id, label) in DEFAULT_CATEGORIES {
                inserted += conn
                    .execute(
                        "INSERT OR IGNORE INTO categories (id, type) VALUES (?1, ?2)",
                        rusqlite::params![id, label],
                    )
                    .map_err(|e| {
                        TriviaError::Storage(format!("Failed to seed category {}: {}", id, e))
                    })?;
            }
            Ok(inserted)
        })?;
        if inserted > 0 {
            info!(inserted, "Seeded default categories");
        }
        Ok(inserted)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish()
    }
}
