//! Route handler functions for all API endpoints.
//!
//! Each handler extracts and validates its path, query and body inputs into
//! explicit parameters, then hands them to the matching `service` operation.
//! Extractor rejections are mapped onto the error taxonomy here so that even
//! malformed requests get the uniform JSON envelope.

use std::collections::HashSet;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{Method, Uri};
use axum::Json;
use serde::Deserialize;

use trivia_core::quiz::QuizScope;
use trivia_core::search::SearchTerm;
use trivia_core::types::{CategoryId, NewQuestion, QuestionId};

use crate::error::ApiError;
use crate::service::{
    self, CategoriesResponse, CategoryQuestionsResponse, CreateResponse, DeleteResponse,
    HealthResponse, QuestionsResponse, QuizResponse, SearchResponse,
};
use crate::state::AppState;

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<usize>,
}

/// An id sent either as a JSON number or as a string. Web forms tend to
/// send select values as strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FlexibleId {
    Number(i64),
    Text(String),
}

impl FlexibleId {
    fn as_i64(&self) -> Option<i64> {
        match self {
            FlexibleId::Number(n) => Some(*n),
            FlexibleId::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Request body for POST /questions. Every field is required; they are
/// optional here so that absence is reported through the envelope.
#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<FlexibleId>,
    pub difficulty: Option<FlexibleId>,
}

impl CreateQuestionRequest {
    /// Check that every field is present and well-typed.
    pub fn validate(self) -> Result<NewQuestion, ApiError> {
        let missing: Vec<&str> = [
            ("question", self.question.is_none()),
            ("answer", self.answer.is_none()),
            ("category", self.category.is_none()),
            ("difficulty", self.difficulty.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();
        if !missing.is_empty() {
            return Err(ApiError::MethodNotAllowed(format!(
                "missing fields: {}",
                missing.join(", ")
            )));
        }

        let category: CategoryId = self
            .category
            .as_ref()
            .and_then(FlexibleId::as_i64)
            .ok_or_else(|| ApiError::MethodNotAllowed("category is not an integer".to_string()))?;
        let difficulty = self
            .difficulty
            .as_ref()
            .and_then(FlexibleId::as_i64)
            .and_then(|d| i32::try_from(d).ok())
            .ok_or_else(|| {
                ApiError::MethodNotAllowed("difficulty is not a small integer".to_string())
            })?;

        Ok(NewQuestion {
            question: self.question.unwrap_or_default(),
            answer: self.answer.unwrap_or_default(),
            category,
            difficulty,
        })
    }
}

/// Request body for POST /questions/search.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(rename = "searchTerm", alias = "search_term", default)]
    pub search_term: Option<String>,
}

/// The category selected for a quiz round.
#[derive(Debug, Deserialize)]
pub struct QuizCategory {
    pub id: Option<FlexibleId>,
    /// Display label echoed by the client; not used for lookup.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Request body for POST /quizzes.
#[derive(Debug, Deserialize)]
pub struct QuizRequest {
    #[serde(default)]
    pub previous_questions: Vec<QuestionId>,
    pub quiz_category: Option<QuizCategory>,
}

impl QuizRequest {
    /// Resolve the requested scope. A missing or null id is bad-request.
    pub fn scope(&self) -> Result<QuizScope, ApiError> {
        let id = self
            .quiz_category
            .as_ref()
            .and_then(|c| c.id.as_ref())
            .ok_or_else(|| ApiError::BadRequest("quiz_category.id is required".to_string()))?;
        match id {
            FlexibleId::Number(n) => Ok(QuizScope::from_id(*n)),
            FlexibleId::Text(s) => s.parse().map_err(ApiError::from),
        }
    }
}

fn page_number(params: Result<Query<PageParams>, QueryRejection>) -> Result<usize, ApiError> {
    let Query(params) =
        params.map_err(|e| ApiError::BadRequest(format!("invalid query: {}", e)))?;
    match params.page {
        None => Ok(1),
        Some(0) => Err(ApiError::BadRequest("page must be at least 1".to_string())),
        Some(page) => Ok(page),
    }
}

// =============================================================================
// Handler functions
// =============================================================================

/// GET /categories - every category as an id to label map.
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>, ApiError> {
    service::list_categories(&state).map(Json)
}

/// GET /questions?page=N - one page of all questions.
pub async fn list_questions(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<QuestionsResponse>, ApiError> {
    let page = page_number(params)?;
    service::list_questions(&state, page).map(Json)
}

/// DELETE /questions/{id}
pub async fn delete_question(
    State(state): State<AppState>,
    id: Result<Path<QuestionId>, PathRejection>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let Path(id) = id.map_err(|e| ApiError::NotFound(format!("invalid question id: {}", e)))?;
    service::delete_question(&state, id).map(Json)
}

/// POST /questions - create a question.
pub async fn create_question(
    State(state): State<AppState>,
    body: Result<Json<CreateQuestionRequest>, JsonRejection>,
) -> Result<Json<CreateResponse>, ApiError> {
    let Json(body) =
        body.map_err(|e| ApiError::MethodNotAllowed(format!("unusable payload: {}", e)))?;
    let new = body.validate()?;
    service::create_question(&state, new).map(Json)
}

/// POST /questions/search?page=N - case-insensitive substring search.
pub async fn search_questions(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let page = page_number(params)?;
    let Json(body) = body.map_err(|e| ApiError::BadRequest(format!("unusable payload: {}", e)))?;
    let term = SearchTerm::new(body.search_term.as_deref().unwrap_or(""));
    service::search_questions(&state, &term, page).map(Json)
}

/// GET /categories/{id}/questions?page=N
pub async fn list_by_category(
    State(state): State<AppState>,
    id: Result<Path<CategoryId>, PathRejection>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<CategoryQuestionsResponse>, ApiError> {
    let Path(id) = id.map_err(|e| ApiError::NotFound(format!("invalid category id: {}", e)))?;
    let page = page_number(params)?;
    service::list_by_category(&state, id, page).map(Json)
}

/// POST /quizzes - next unseen question of a quiz round.
pub async fn next_quiz_question(
    State(state): State<AppState>,
    body: Result<Json<QuizRequest>, JsonRejection>,
) -> Result<Json<QuizResponse>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(format!("unusable payload: {}", e)))?;
    let scope = body.scope()?;
    let previous: HashSet<QuestionId> = body.previous_questions.iter().copied().collect();
    let mut rng = rand::rng();
    service::next_quiz_question(&state, scope, &previous, &mut rng).map(Json)
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(service::health(&state))
}

/// Fallback for a known path used with a verb it does not support.
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed(format!("{} {}", method, uri.path()))
}

/// Fallback for unknown paths.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}
