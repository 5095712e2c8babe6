//! Transport-independent request handling.
//!
//! Each operation takes its inputs as explicit, already-validated
//! parameters, talks to the record store, runs the pagination, search or
//! quiz engine, and returns either a success payload or an `ApiError`.
//! The axum handlers only extract and validate.

use std::collections::{BTreeMap, HashSet};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use trivia_core::pagination::Page;
use trivia_core::quiz::{select_next, QuizScope};
use trivia_core::search::SearchTerm;
use trivia_core::types::{CategoryId, NewQuestion, Question, QuestionId};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Response payloads
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub success: bool,
    /// Category id to display label, ordered by id.
    pub categories: BTreeMap<CategoryId, String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionsResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: u64,
    pub categories: BTreeMap<CategoryId, String>,
    /// Always null for the unfiltered listing.
    pub current_category: Option<CategoryId>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    /// Number of matches before pagination.
    pub total_questions: u64,
    pub current_category: Option<CategoryId>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryQuestionsResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    /// Size of the whole question table, not of this category.
    pub total_questions: u64,
    pub current_category: CategoryId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted: QuestionId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateResponse {
    pub success: bool,
    pub created: QuestionId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuizResponse {
    pub success: bool,
    /// Absent once every question in scope has been asked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<Question>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub total_questions: u64,
    pub total_categories: u64,
}

// =============================================================================
// Operations
// =============================================================================

fn category_map(state: &AppState) -> Result<BTreeMap<CategoryId, String>, ApiError> {
    Ok(state
        .categories
        .list_all()?
        .into_iter()
        .map(|c| (c.id, c.kind))
        .collect())
}

/// All categories. An empty store is not-found.
pub fn list_categories(state: &AppState) -> Result<CategoriesResponse, ApiError> {
    let categories = category_map(state)?;
    if categories.is_empty() {
        return Err(ApiError::NotFound("no categories stored".to_string()));
    }
    Ok(CategoriesResponse {
        success: true,
        categories,
    })
}

/// One page of every question. An empty page is not-found.
pub fn list_questions(state: &AppState, page: usize) -> Result<QuestionsResponse, ApiError> {
    let all = state.questions.list_all()?;
    let page = Page::of(&all, page, state.page_size());
    if page.is_empty() {
        return Err(ApiError::NotFound(format!(
            "page is empty ({} questions stored)",
            page.total
        )));
    }
    Ok(QuestionsResponse {
        success: true,
        questions: page.items,
        total_questions: page.total as u64,
        categories: category_map(state)?,
        current_category: None,
    })
}

/// Delete a question by id.
pub fn delete_question(state: &AppState, id: QuestionId) -> Result<DeleteResponse, ApiError> {
    // A single DELETE: zero affected rows covers both a missing id and a
    // concurrent delete that got there first.
    if !state.questions.delete(id)? {
        return Err(ApiError::NotFound(format!("question {} does not exist", id)));
    }
    info!(question_id = id, "Question deleted");
    Ok(DeleteResponse {
        success: true,
        deleted: id,
    })
}

/// Store a new question.
pub fn create_question(state: &AppState, new: NewQuestion) -> Result<CreateResponse, ApiError> {
    let stored = state.questions.insert(new)?;
    info!(question_id = stored.id, category = stored.category, "Question created");
    Ok(CreateResponse {
        success: true,
        created: stored.id,
    })
}

/// One page of the questions matching `term`. No matches is not-found; a
/// store fault while matching is reported as bad-request.
pub fn search_questions(
    state: &AppState,
    term: &SearchTerm,
    page: usize,
) -> Result<SearchResponse, ApiError> {
    let matches = state
        .questions
        .search(term)
        .map_err(|e| ApiError::BadRequest(format!("search failed: {}", e)))?;
    if matches.is_empty() {
        return Err(ApiError::NotFound("no question matches the search term".to_string()));
    }
    let page = Page::of(&matches, page, state.page_size());
    if page.is_empty() {
        return Err(ApiError::NotFound(format!(
            "page is empty ({} matches)",
            page.total
        )));
    }
    Ok(SearchResponse {
        success: true,
        questions: page.items,
        total_questions: page.total as u64,
        current_category: None,
    })
}

/// One page of a category's questions.
///
/// A missing category is unprocessable-entity. A category with no questions
/// (or a page past its end) is a successful empty page. `total_questions`
/// counts the whole store.
pub fn list_by_category(
    state: &AppState,
    category: CategoryId,
    page: usize,
) -> Result<CategoryQuestionsResponse, ApiError> {
    if state.categories.find_by_id(category)?.is_none() {
        return Err(ApiError::UnprocessableEntity(format!(
            "category {} does not exist",
            category
        )));
    }
    let in_category = state.questions.find_by_category(category)?;
    let page = Page::of(&in_category, page, state.page_size());
    Ok(CategoryQuestionsResponse {
        success: true,
        questions: page.items,
        total_questions: state.questions.count()?,
        current_category: category,
    })
}

/// Draw the next quiz question, or report that the round is over by
/// leaving `question` out. An unknown category is not-found.
pub fn next_quiz_question<R: Rng + ?Sized>(
    state: &AppState,
    scope: QuizScope,
    previous: &HashSet<QuestionId>,
    rng: &mut R,
) -> Result<QuizResponse, ApiError> {
    let pool = match scope {
        QuizScope::All => state.questions.list_all()?,
        QuizScope::Category(id) => {
            if state.categories.find_by_id(id)?.is_none() {
                return Err(ApiError::NotFound(format!("quiz category {} does not exist", id)));
            }
            state.questions.find_by_category(id)?
        }
    };
    let question = select_next(pool, previous, rng).into_question();
    debug!(
        scope = %scope,
        previous = previous.len(),
        exhausted = question.is_none(),
        "Quiz turn"
    );
    Ok(QuizResponse {
        success: true,
        question,
    })
}

/// Liveness report. A store that cannot be counted reports `"degraded"`.
pub fn health(state: &AppState) -> HealthResponse {
    let counts = state
        .questions
        .count()
        .and_then(|questions| Ok((questions, state.categories.count()?)));
    let (status, total_questions, total_categories) = match counts {
        Ok((questions, categories)) => ("healthy", questions, categories),
        Err(e) => {
            warn!(error = %e, "Health check could not read the store");
            ("degraded", 0, 0)
        }
    };
    HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        total_questions,
        total_categories,
    }
}
