//! Trivia storage crate - SQLite record store for questions and categories.
//!
//! Provides a WAL-mode SQLite database with versioned migrations, default
//! category seeding, and repositories for ordered scans, filtered lookups,
//! inserts and deletes.

pub mod db;
pub mod migrations;
pub mod repository;

pub use db::Database;
pub use repository::{CategoryRepository, QuestionRepository};
