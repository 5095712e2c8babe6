//! Integration tests for the trivia API.
//!
//! Drives the full router (extractors, fallbacks, error envelope) with
//! in-memory state. Each test builds its own store.

use std::collections::HashSet;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use trivia_api::create_router;
use trivia_api::service::{
    CategoriesResponse, CategoryQuestionsResponse, CreateResponse, DeleteResponse,
    HealthResponse, QuestionsResponse, QuizResponse, SearchResponse,
};
use trivia_api::state::AppState;
use trivia_core::config::TriviaConfig;
use trivia_core::error::TriviaError;
use trivia_core::types::{Category, NewQuestion};
use trivia_storage::Database;

// =============================================================================
// Helpers
// =============================================================================

fn empty_state() -> AppState {
    AppState::new(TriviaConfig::default(), Database::in_memory().unwrap())
}

/// Categories {1: Science, 2: Art}; questions 1 and 2 in Science, 3 in Art.
fn scenario_state() -> AppState {
    let state = empty_state();
    state.categories.insert(&Category::new(1, "Science")).unwrap();
    state.categories.insert(&Category::new(2, "Art")).unwrap();
    insert_question(&state, "What is the heaviest organ in the human body?", 1);
    insert_question(&state, "Who discovered penicillin?", 1);
    insert_question(&state, "Which Dutch graphic artist was a master of optical illusions?", 2);
    state
}

/// Default categories plus `count` Science questions, half mentioning "title".
fn seeded_state(count: usize) -> AppState {
    let state = empty_state();
    state.database.seed_default_categories().unwrap();
    for i in 0..count {
        let text = if i % 2 == 0 {
            format!("What is the title of book {}?", i)
        } else {
            format!("Who wrote book {}?", i)
        };
        insert_question(&state, &text, 1);
    }
    state
}

fn insert_question(state: &AppState, text: &str, category: i64) -> i64 {
    state
        .questions
        .insert(NewQuestion {
            question: text.to_string(),
            answer: "answer".to_string(),
            category,
            difficulty: 2,
        })
        .unwrap()
        .id
}

/// Break the store so every question query fails.
fn drop_questions_table(state: &AppState) {
    state
        .database
        .with_conn(|c| {
            c.execute_batch("DROP TABLE questions")
                .map_err(|e| TriviaError::Storage(e.to_string()))
        })
        .unwrap();
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::delete(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, json: &str) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

async fn send(state: &AppState, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = create_router(state.clone()).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap()
        .to_vec();
    (status, bytes)
}

/// Assert the uniform error envelope.
fn assert_envelope(bytes: &[u8], code: u16, message: &str) {
    let json: Value = serde_json::from_slice(bytes).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], code);
    assert_eq!(json["message"], message);
}

// =============================================================================
// Categories
// =============================================================================

#[tokio::test]
async fn test_list_categories() {
    let state = scenario_state();
    let (status, bytes) = send(&state, get("/categories")).await;
    assert_eq!(status, StatusCode::OK);

    let resp: CategoriesResponse = serde_json::from_slice(&bytes).unwrap();
    assert!(resp.success);
    assert_eq!(resp.categories.len(), 2);
    assert_eq!(resp.categories[&1], "Science");
    assert_eq!(resp.categories[&2], "Art");

    let raw: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(raw["categories"]["1"], "Science");
}

#[tokio::test]
async fn test_list_categories_empty_store_is_404() {
    let (status, bytes) = send(&empty_state(), get("/categories")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_envelope(&bytes, 404, "resource not found");
}

// =============================================================================
// Question listing
// =============================================================================

#[tokio::test]
async fn test_get_paginated_questions() {
    let state = seeded_state(23);
    let (status, bytes) = send(&state, get("/questions")).await;
    assert_eq!(status, StatusCode::OK);

    let resp: QuestionsResponse = serde_json::from_slice(&bytes).unwrap();
    assert!(resp.success);
    assert_eq!(resp.questions.len(), 10);
    assert_eq!(resp.total_questions, 23);
    assert_eq!(resp.categories.len(), 6);
    assert!(resp.current_category.is_none());

    let raw: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(raw["current_category"].is_null());
}

#[tokio::test]
async fn test_pages_cover_every_question_once() {
    let state = seeded_state(23);
    let mut seen = Vec::new();
    for page in 1..=3 {
        let (status, bytes) = send(&state, get(&format!("/questions?page={}", page))).await;
        assert_eq!(status, StatusCode::OK);
        let resp: QuestionsResponse = serde_json::from_slice(&bytes).unwrap();
        seen.extend(resp.questions.into_iter().map(|q| q.id));
    }
    let all: Vec<i64> = state.questions.list_all().unwrap().iter().map(|q| q.id).collect();
    assert_eq!(seen, all);
}

#[tokio::test]
async fn test_404_requesting_beyond_valid_page() {
    let state = seeded_state(5);
    let (status, bytes) = send(&state, get("/questions?page=10000")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_envelope(&bytes, 404, "resource not found");
}

#[tokio::test]
async fn test_invalid_page_is_400() {
    let state = seeded_state(5);
    for uri in ["/questions?page=0", "/questions?page=abc", "/questions?page=-1"] {
        let (status, bytes) = send(&state, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_envelope(&bytes, 400, "bad request");
    }
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_question() {
    let state = scenario_state();
    let (status, bytes) = send(&state, delete("/questions/2")).await;
    assert_eq!(status, StatusCode::OK);

    let resp: DeleteResponse = serde_json::from_slice(&bytes).unwrap();
    assert!(resp.success);
    assert_eq!(resp.deleted, 2);
    assert!(state.questions.find_by_id(2).unwrap().is_none());
}

#[tokio::test]
async fn test_delete_twice_is_404() {
    let state = scenario_state();
    let (first, _) = send(&state, delete("/questions/2")).await;
    assert_eq!(first, StatusCode::OK);

    let (second, bytes) = send(&state, delete("/questions/2")).await;
    assert_eq!(second, StatusCode::NOT_FOUND);
    assert_envelope(&bytes, 404, "resource not found");
}

#[tokio::test]
async fn test_delete_unknown_question_is_404() {
    let (status, bytes) = send(&scenario_state(), delete("/questions/1000000")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_envelope(&bytes, 404, "resource not found");
}

#[tokio::test]
async fn test_delete_non_numeric_id_is_404() {
    let (status, bytes) = send(&scenario_state(), delete("/questions/abc")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_envelope(&bytes, 404, "resource not found");
}

// =============================================================================
// Create
// =============================================================================

const NEW_QUESTION: &str = r#"{
    "question": "What is the highest mountain in Germany?",
    "answer": "Zugspitze",
    "category": 3,
    "difficulty": 2
}"#;

#[tokio::test]
async fn test_create_new_question() {
    let state = seeded_state(3);
    let (status, bytes) = send(&state, post_json("/questions", NEW_QUESTION)).await;
    assert_eq!(status, StatusCode::OK);

    let resp: CreateResponse = serde_json::from_slice(&bytes).unwrap();
    assert!(resp.success);

    let stored = state.questions.find_by_id(resp.created).unwrap().unwrap();
    assert_eq!(stored.answer, "Zugspitze");
    assert_eq!(stored.category, 3);
    assert_eq!(stored.difficulty, 2);
}

#[tokio::test]
async fn test_create_then_list_contains_new_id_once() {
    let state = seeded_state(3);
    let (_, bytes) = send(&state, post_json("/questions", NEW_QUESTION)).await;
    let created: CreateResponse = serde_json::from_slice(&bytes).unwrap();

    let (status, bytes) = send(&state, get("/questions")).await;
    assert_eq!(status, StatusCode::OK);
    let listed: QuestionsResponse = serde_json::from_slice(&bytes).unwrap();
    let hits = listed.questions.iter().filter(|q| q.id == created.created).count();
    assert_eq!(hits, 1);
    assert_eq!(listed.total_questions, 4);
}

#[tokio::test]
async fn test_create_with_dangling_category_is_accepted() {
    let state = scenario_state();
    let body = r#"{"question":"q","answer":"a","category":77,"difficulty":1}"#;
    let (status, _) = send(&state, post_json("/questions", body)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, bytes) = send(&state, get("/categories/77/questions")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_envelope(&bytes, 422, "unprocessable entity");
}

#[tokio::test]
async fn test_create_missing_fields_is_405() {
    let state = scenario_state();
    let (status, bytes) = send(&state, post_json("/questions", r#"{"question":"q"}"#)).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_envelope(&bytes, 405, "method not allowed");
    assert_eq!(state.questions.count().unwrap(), 3);
}

#[tokio::test]
async fn test_create_malformed_json_is_405() {
    let (status, bytes) = send(&scenario_state(), post_json("/questions", "{not json")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_envelope(&bytes, 405, "method not allowed");
}

#[tokio::test]
async fn test_405_if_question_creation_not_allowed() {
    let state = scenario_state();
    let (status, bytes) = send(&state, post_json("/questions/45", NEW_QUESTION)).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_envelope(&bytes, 405, "method not allowed");
    assert_eq!(state.questions.count().unwrap(), 3);
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_search_question_with_result() {
    let state = seeded_state(30);
    let (status, bytes) =
        send(&state, post_json("/questions/search", r#"{"searchTerm":"TITLE"}"#)).await;
    assert_eq!(status, StatusCode::OK);

    let resp: SearchResponse = serde_json::from_slice(&bytes).unwrap();
    assert!(resp.success);
    assert_eq!(resp.total_questions, 15);
    assert_eq!(resp.questions.len(), 10);
    assert!(resp
        .questions
        .iter()
        .all(|q| q.question.to_lowercase().contains("title")));
}

#[tokio::test]
async fn test_search_second_page() {
    let state = seeded_state(30);
    let (status, bytes) = send(
        &state,
        post_json("/questions/search?page=2", r#"{"searchTerm":"title"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let resp: SearchResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(resp.questions.len(), 5);
}

#[tokio::test]
async fn test_search_question_without_result_is_404() {
    let state = seeded_state(10);
    let (status, bytes) =
        send(&state, post_json("/questions/search", r#"{"searchTerm":"?1!da"}"#)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_envelope(&bytes, 404, "resource not found");
}

#[tokio::test]
async fn test_search_blank_term_matches_everything() {
    let state = seeded_state(4);
    let (status, bytes) =
        send(&state, post_json("/questions/search", r#"{"searchTerm":"   "}"#)).await;
    assert_eq!(status, StatusCode::OK);
    let resp: SearchResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(resp.total_questions, 4);
}

#[tokio::test]
async fn test_search_malformed_body_is_400() {
    let (status, bytes) =
        send(&seeded_state(4), post_json("/questions/search", r#"{"searchTerm":12"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_envelope(&bytes, 400, "bad request");
}

// =============================================================================
// Questions by category
// =============================================================================

#[tokio::test]
async fn test_get_questions_for_available_category() {
    let state = scenario_state();
    let (status, bytes) = send(&state, get("/categories/2/questions")).await;
    assert_eq!(status, StatusCode::OK);

    let resp: CategoryQuestionsResponse = serde_json::from_slice(&bytes).unwrap();
    assert!(resp.success);
    assert_eq!(resp.current_category, 2);
    assert_eq!(resp.questions.len(), 1);
    assert_eq!(resp.questions[0].id, 3);
    // Whole-store count, not the category's.
    assert_eq!(resp.total_questions, 3);
}

#[tokio::test]
async fn test_get_questions_for_non_available_category() {
    let (status, bytes) = send(&scenario_state(), get("/categories/999/questions")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_envelope(&bytes, 422, "unprocessable entity");
}

#[tokio::test]
async fn test_get_questions_for_empty_category() {
    let state = scenario_state();
    state.categories.insert(&Category::new(3, "Geography")).unwrap();
    let (status, bytes) = send(&state, get("/categories/3/questions")).await;
    assert_eq!(status, StatusCode::OK);
    let resp: CategoryQuestionsResponse = serde_json::from_slice(&bytes).unwrap();
    assert!(resp.questions.is_empty());
    assert_eq!(resp.current_category, 3);
}

// =============================================================================
// Quizzes
// =============================================================================

fn quiz_body(category_id: &str, previous: &[i64]) -> String {
    format!(
        r#"{{"previous_questions":{:?},"quiz_category":{{"type":"Science","id":{}}}}}"#,
        previous, category_id
    )
}

#[tokio::test]
async fn test_quiz_successfully() {
    let state = scenario_state();
    let (status, bytes) = send(&state, post_json("/quizzes", &quiz_body("\"1\"", &[]))).await;
    assert_eq!(status, StatusCode::OK);

    let resp: QuizResponse = serde_json::from_slice(&bytes).unwrap();
    assert!(resp.success);
    let question = resp.question.unwrap();
    assert_eq!(question.category, 1);
}

#[tokio::test]
async fn test_quiz_returns_only_unseen_candidate() {
    let state = scenario_state();
    for _ in 0..20 {
        let (status, bytes) = send(&state, post_json("/quizzes", &quiz_body("1", &[1]))).await;
        assert_eq!(status, StatusCode::OK);
        let resp: QuizResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(resp.question.map(|q| q.id), Some(2));
    }
}

#[tokio::test]
async fn test_quiz_exhausted_has_no_question_field() {
    let state = scenario_state();
    let (status, bytes) = send(&state, post_json("/quizzes", &quiz_body("1", &[1, 2]))).await;
    assert_eq!(status, StatusCode::OK);

    let raw: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(raw["success"], true);
    assert!(raw.get("question").is_none());
}

#[tokio::test]
async fn test_quiz_round_over_all_categories() {
    let state = scenario_state();
    let mut previous: Vec<i64> = Vec::new();
    loop {
        let (status, bytes) = send(&state, post_json("/quizzes", &quiz_body("0", &previous))).await;
        assert_eq!(status, StatusCode::OK);
        let resp: QuizResponse = serde_json::from_slice(&bytes).unwrap();
        match resp.question {
            Some(q) => {
                assert!(!previous.contains(&q.id));
                previous.push(q.id);
            }
            None => break,
        }
    }
    let unique: HashSet<i64> = previous.iter().copied().collect();
    assert_eq!(unique.len(), 3);
}

#[tokio::test]
async fn test_quiz_fail_id_too_high() {
    let (status, bytes) =
        send(&scenario_state(), post_json("/quizzes", &quiz_body("\"10000\"", &[]))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_envelope(&bytes, 404, "resource not found");
}

#[tokio::test]
async fn test_quiz_fail_no_id() {
    let (status, bytes) =
        send(&scenario_state(), post_json("/quizzes", &quiz_body("null", &[]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_envelope(&bytes, 400, "bad request");
}

#[tokio::test]
async fn test_quiz_wrong_verb_is_405() {
    let (status, bytes) = send(&scenario_state(), get("/quizzes")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_envelope(&bytes, 405, "method not allowed");
}

// =============================================================================
// Store failures
// =============================================================================

#[tokio::test]
async fn test_create_store_failure_is_500() {
    let state = scenario_state();
    drop_questions_table(&state);
    let (status, bytes) = send(&state, post_json("/questions", NEW_QUESTION)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_envelope(&bytes, 500, "internal server error");
}

#[tokio::test]
async fn test_delete_store_failure_is_500() {
    let state = scenario_state();
    drop_questions_table(&state);
    let (status, bytes) = send(&state, delete("/questions/1")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_envelope(&bytes, 500, "internal server error");
}

#[tokio::test]
async fn test_search_store_failure_is_400() {
    let state = scenario_state();
    drop_questions_table(&state);
    let (status, bytes) =
        send(&state, post_json("/questions/search", r#"{"searchTerm":"organ"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_envelope(&bytes, 400, "bad request");
}

#[tokio::test]
async fn test_health_degraded_after_store_failure() {
    let state = scenario_state();
    drop_questions_table(&state);
    let (status, bytes) = send(&state, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health.status, "degraded");
}

// =============================================================================
// Misc
// =============================================================================

#[tokio::test]
async fn test_health() {
    let (status, bytes) = send(&scenario_state(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.total_questions, 3);
    assert_eq!(health.total_categories, 2);
}

#[tokio::test]
async fn test_unknown_path_is_404_envelope() {
    let (status, bytes) = send(&scenario_state(), get("/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_envelope(&bytes, 404, "resource not found");
}

#[tokio::test]
async fn test_cors_headers_present() {
    let req = Request::get("/categories")
        .header("origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let resp = create_router(scenario_state()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn test_custom_page_size() {
    let mut config = TriviaConfig::default();
    config.api.questions_per_page = 4;
    let state = AppState::new(config, Database::in_memory().unwrap());
    state.database.seed_default_categories().unwrap();
    for i in 0..6 {
        insert_question(&state, &format!("question {}", i), 1);
    }
    let (_, bytes) = send(&state, get("/questions?page=2")).await;
    let resp: QuestionsResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(resp.questions.len(), 2);
}
