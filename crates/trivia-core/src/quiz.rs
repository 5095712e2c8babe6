//! Quiz round question selection.
//!
//! A round is stateless on the server: the caller sends the ids it has
//! already been asked on every request, and the selector draws uniformly
//! from whatever is left in scope. An empty remainder ends the round.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use tracing::debug;

use crate::error::TriviaError;
use crate::types::{CategoryId, Question, QuestionId};

/// Which questions a quiz round draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizScope {
    /// Every question in the store.
    All,
    /// Questions of a single category.
    Category(CategoryId),
}

impl QuizScope {
    /// Map a numeric category id onto a scope. The web client sends id 0
    /// for "All".
    pub fn from_id(id: CategoryId) -> Self {
        if id == 0 {
            QuizScope::All
        } else {
            QuizScope::Category(id)
        }
    }
}

impl FromStr for QuizScope {
    type Err = TriviaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(QuizScope::All);
        }
        trimmed
            .parse::<CategoryId>()
            .map(QuizScope::from_id)
            .map_err(|_| TriviaError::Validation(format!("invalid quiz category '{}'", s)))
    }
}

impl fmt::Display for QuizScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizScope::All => write!(f, "all"),
            QuizScope::Category(id) => write!(f, "{}", id),
        }
    }
}

/// Result of drawing the next quiz question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizOutcome {
    Next(Question),
    /// Nothing unseen remains in scope.
    Exhausted,
}

impl QuizOutcome {
    pub fn into_question(self) -> Option<Question> {
        match self {
            QuizOutcome::Next(q) => Some(q),
            QuizOutcome::Exhausted => None,
        }
    }
}

/// Drop every question whose id was already asked. Order is preserved.
pub fn unseen(pool: Vec<Question>, previous: &HashSet<QuestionId>) -> Vec<Question> {
    pool.into_iter()
        .filter(|q| !previous.contains(&q.id))
        .collect()
}

/// Draw one unseen question uniformly at random from `pool`.
pub fn select_next<R: Rng + ?Sized>(
    pool: Vec<Question>,
    previous: &HashSet<QuestionId>,
    rng: &mut R,
) -> QuizOutcome {
    let pool_size = pool.len();
    let mut candidates = unseen(pool, previous);
    if candidates.is_empty() {
        debug!(pool_size, "Quiz scope exhausted");
        return QuizOutcome::Exhausted;
    }
    let idx = rng.random_range(0..candidates.len());
    debug!(pool_size, remaining = candidates.len(), "Quiz question drawn");
    QuizOutcome::Next(candidates.swap_remove(idx))
}
