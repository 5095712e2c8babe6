//! Trivia core crate - domain types, configuration, errors, and the
//! request-independent engines: pagination, search, and quiz selection.

pub mod config;
pub mod error;
pub mod pagination;
pub mod quiz;
pub mod search;
pub mod types;

pub use config::TriviaConfig;
pub use error::{Result, TriviaError};
pub use pagination::{paginate, Page, QUESTIONS_PER_PAGE};
pub use quiz::{select_next, QuizOutcome, QuizScope};
pub use search::{filter_by_term, SearchTerm};
pub use types::*;
