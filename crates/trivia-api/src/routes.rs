//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, request tracing, the uniform
//! not-found and method-not-allowed fallbacks, and all endpoint handlers.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use trivia_core::config::TriviaConfig;
use trivia_core::error::TriviaError;

use crate::handlers;
use crate::state::AppState;

/// Build the CORS layer from the configured origins. `"*"` allows any
/// origin; entries that are not valid header values are skipped.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!(origin = %o, error = %e, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Create the axum Router with all routes and middleware.
///
/// Every route answers verbs it does not support with the
/// method-not-allowed envelope, and unknown paths get the not-found one.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.api.cors_origins);

    Router::new()
        .route(
            "/categories",
            get(handlers::list_categories).fallback(handlers::method_not_allowed),
        )
        .route(
            "/categories/{id}/questions",
            get(handlers::list_by_category).fallback(handlers::method_not_allowed),
        )
        .route(
            "/questions",
            get(handlers::list_questions)
                .post(handlers::create_question)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/questions/search",
            post(handlers::search_questions).fallback(handlers::method_not_allowed),
        )
        .route(
            "/questions/{id}",
            delete(handlers::delete_question).fallback(handlers::method_not_allowed),
        )
        .route(
            "/quizzes",
            post(handlers::next_quiz_question).fallback(handlers::method_not_allowed),
        )
        .route(
            "/health",
            get(handlers::health).fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the configured port.
pub async fn start_server(config: &TriviaConfig, state: AppState) -> Result<(), TriviaError> {
    let addr = format!("0.0.0.0:{}", config.general.port);

    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TriviaError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| TriviaError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
