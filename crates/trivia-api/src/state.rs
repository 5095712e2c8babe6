//! Application state shared across all route handlers.
//!
//! AppState holds the configuration and the record store repositories.
//! It is passed to handlers via axum's State extractor and carries no
//! per-request or per-quiz data.

use std::sync::Arc;
use std::time::Instant;

use trivia_core::config::TriviaConfig;
use trivia_storage::{CategoryRepository, Database, QuestionRepository};

/// Shared application state.
///
/// All fields are cheap to clone across handler tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration. Read-only once the server starts.
    pub config: Arc<TriviaConfig>,
    /// SQLite database for persistent storage.
    pub database: Arc<Database>,
    pub questions: QuestionRepository,
    pub categories: CategoryRepository,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: TriviaConfig, database: Database) -> Self {
        let database = Arc::new(database);
        Self {
            config: Arc::new(config),
            questions: QuestionRepository::new(Arc::clone(&database)),
            categories: CategoryRepository::new(Arc::clone(&database)),
            database,
            start_time: Instant::now(),
        }
    }

    /// Page size for every paginated listing.
    pub fn page_size(&self) -> usize {
        self.config.api.questions_per_page
    }
}
