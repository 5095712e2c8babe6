//! Database schema migrations.
//!
//! Applies the initial schema: the categories and questions tables plus the
//! schema_migrations bookkeeping table.

use rusqlite::Connection;
use tracing::info;

use trivia_core::error::TriviaError;

/// Run all pending database migrations.
pub fn run_migrations(conn: &Connection) -> Result<(), TriviaError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| TriviaError::Storage(format!("Failed to create migrations table: {}", e)))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| TriviaError::Storage(format!("Failed to query migration version: {}", e)))?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: initial_schema");
    }

    Ok(())
}

/// Version 1: Initial schema.
///
/// `questions.category` deliberately carries no foreign key: a question may
/// point at a category that does not exist, and it then simply never
/// matches a category filter.
fn apply_v1(conn: &Connection) -> Result<(), TriviaError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS categories (
            id      INTEGER PRIMARY KEY NOT NULL,
            type    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS questions (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            question    TEXT NOT NULL,
            answer      TEXT NOT NULL,
            category    INTEGER NOT NULL,
            difficulty  INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_questions_category
            ON questions (category, id);

        INSERT OR IGNORE INTO schema_migrations (version, name) VALUES (1, 'initial_schema');
        ",
    )
    .map_err(|e| TriviaError::Storage(format!("Failed to apply migration v1: {}", e)))?;

    Ok(())
}
