//! Repository implementations for SQLite-backed persistence.
//!
//! Provides QuestionRepository and CategoryRepository operating on the
//! Database struct using raw SQL. Every listing is ordered by id.

use std::sync::Arc;

use rusqlite::OptionalExtension;

use trivia_core::error::TriviaError;
use trivia_core::search::{filter_by_term, SearchTerm};
use trivia_core::types::{Category, CategoryId, NewQuestion, Question, QuestionId};

use crate::db::Database;

const QUESTION_COLUMNS: &str = "id, question, answer, category, difficulty";

/// Repository for trivia questions.
#[derive(Clone)]
pub struct QuestionRepository {
    db: Arc<Database>,
}

impl QuestionRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Store a new question and return it with its assigned id.
    pub fn insert(&self, new: NewQuestion) -> Result<Question, TriviaError> {
        let id = self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO questions (question, answer, category, difficulty)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![new.question, new.answer, new.category, new.difficulty],
            )
            .map_err(|e| TriviaError::Storage(format!("Failed to insert question: {}", e)))?;
            Ok(conn.last_insert_rowid())
        })?;
        Ok(new.with_id(id))
    }

    /// Find a question by id.
    pub fn find_by_id(&self, id: QuestionId) -> Result<Option<Question>, TriviaError> {
        self.db.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {} FROM questions WHERE id = ?1", QUESTION_COLUMNS),
                rusqlite::params![id],
                row_to_question,
            )
            .optional()
            .map_err(|e| TriviaError::Storage(e.to_string()))
        })
    }

    /// Every question, ordered by id.
    pub fn list_all(&self) -> Result<Vec<Question>, TriviaError> {
        self.query_questions(
            &format!("SELECT {} FROM questions ORDER BY id", QUESTION_COLUMNS),
            rusqlite::params![],
        )
    }

    /// Questions belonging to `category`, ordered by id.
    pub fn find_by_category(&self, category: CategoryId) -> Result<Vec<Question>, TriviaError> {
        self.query_questions(
            &format!(
                "SELECT {} FROM questions WHERE category = ?1 ORDER BY id",
                QUESTION_COLUMNS
            ),
            rusqlite::params![category],
        )
    }

    /// Questions whose text contains `term`, case-insensitively, ordered by id.
    ///
    /// Matching happens in Rust rather than with SQL `LIKE`, whose case
    /// folding only covers ASCII.
    pub fn search(&self, term: &SearchTerm) -> Result<Vec<Question>, TriviaError> {
        let all = self.list_all()?;
        Ok(filter_by_term(all, term))
    }

    /// Delete a question. Returns false if no question had that id.
    pub fn delete(&self, id: QuestionId) -> Result<bool, TriviaError> {
        self.db.with_conn(|conn| {
            let affected = conn
                .execute("DELETE FROM questions WHERE id = ?1", rusqlite::params![id])
                .map_err(|e| TriviaError::Storage(format!("Failed to delete question: {}", e)))?;
            Ok(affected > 0)
        })
    }

    /// Count all questions.
    pub fn count(&self) -> Result<u64, TriviaError> {
        self.db.with_conn(|conn| {
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM questions", [], |row| row.get(0))
                .map_err(|e| TriviaError::Storage(e.to_string()))?;
            Ok(count as u64)
        })
    }

    fn query_questions(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Question>, TriviaError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(sql)
                .map_err(|e| TriviaError::Storage(format!("Question query prepare: {}", e)))?;

            let rows = stmt
                .query_map(params, row_to_question)
                .map_err(|e| TriviaError::Storage(format!("Question query: {}", e)))?;

            let mut questions = Vec::new();
            for row in rows {
                questions.push(row.map_err(|e| TriviaError::Storage(e.to_string()))?);
            }
            Ok(questions)
        })
    }
}

/// Repository for question categories.
#[derive(Clone)]
pub struct CategoryRepository {
    db: Arc<Database>,
}

impl CategoryRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Every category, ordered by id.
    pub fn list_all(&self) -> Result<Vec<Category>, TriviaError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, type FROM categories ORDER BY id")
                .map_err(|e| TriviaError::Storage(format!("Category query prepare: {}", e)))?;

            let rows = stmt
                .query_map([], row_to_category)
                .map_err(|e| TriviaError::Storage(format!("Category query: {}", e)))?;

            let mut categories = Vec::new();
            for row in rows {
                categories.push(row.map_err(|e| TriviaError::Storage(e.to_string()))?);
            }
            Ok(categories)
        })
    }

    /// Find a category by id.
    pub fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, TriviaError> {
        self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT id, type FROM categories WHERE id = ?1",
                rusqlite::params![id],
                row_to_category,
            )
            .optional()
            .map_err(|e| TriviaError::Storage(e.to_string()))
        })
    }

    /// Store a category. Only used for seeding and fixtures; the service
    /// exposes no way to create categories.
    pub fn insert(&self, category: &Category) -> Result<(), TriviaError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO categories (id, type) VALUES (?1, ?2)",
                rusqlite::params![category.id, category.kind],
            )
            .map_err(|e| TriviaError::Storage(format!("Failed to insert category: {}", e)))?;
            Ok(())
        })
    }

    /// Count all categories.
    pub fn count(&self) -> Result<u64, TriviaError> {
        self.db.with_conn(|conn| {
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
                .map_err(|e| TriviaError::Storage(e.to_string()))?;
            Ok(count as u64)
        })
    }
}

fn row_to_question(row: &rusqlite::Row<'_>) -> rusqlite::Result<Question> {
    Ok(Question {
        id: row.get(0)?,
        question: row.get(1)?,
        answer: row.get(2)?,
        category: row.get(3)?,
        difficulty: row.get(4)?,
    })
}

fn row_to_category(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        kind: row.get(1)?,
    })
}
