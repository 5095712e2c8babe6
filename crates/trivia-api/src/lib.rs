//! Trivia API crate - axum HTTP server, route handlers, error envelope.
//!
//! Exposes category and question listings, search, question creation and
//! deletion, and quiz question drawing over JSON.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod service;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
