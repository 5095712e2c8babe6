//! Case-insensitive substring matching over question text.

use crate::types::Question;

/// A normalized search term.
///
/// A blank term matches every question, so searching is total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    needle: Option<String>,
}

impl SearchTerm {
    pub fn new(raw: &str) -> Self {
        let needle = if raw.trim().is_empty() {
            None
        } else {
            Some(raw.to_lowercase())
        };
        Self { needle }
    }

    /// True if the term is blank and matches everything.
    pub fn is_blank(&self) -> bool {
        self.needle.is_none()
    }

    pub fn matches(&self, text: &str) -> bool {
        match &self.needle {
            None => true,
            Some(needle) => text.to_lowercase().contains(needle.as_str()),
        }
    }
}

/// Keep the questions whose text contains `term`, preserving input order.
pub fn filter_by_term(questions: Vec<Question>, term: &SearchTerm) -> Vec<Question> {
    if term.is_blank() {
        return questions;
    }
    questions
        .into_iter()
        .filter(|q| term.matches(&q.question))
        .collect()
}
