use serde::{Deserialize, Serialize};

/// Identifier of a stored question.
pub type QuestionId = i64;

/// Identifier of a stored category.
pub type CategoryId = i64;

/// A trivia question as stored and as sent over the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Assigned by the store on insert.
    pub id: QuestionId,
    /// Question text.
    pub question: String,
    /// Expected answer.
    pub answer: String,
    /// Owning category. Not checked against the categories table.
    pub category: CategoryId,
    /// Difficulty score, conventionally 1 to 5.
    pub difficulty: i32,
}

/// A question that has not been stored yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: CategoryId,
    pub difficulty: i32,
}

impl NewQuestion {
    /// Attach the store-assigned id.
    pub fn with_id(self, id: QuestionId) -> Question {
        Question {
            id,
            question: self.question,
            answer: self.answer,
            category: self.category,
            difficulty: self.difficulty,
        }
    }
}

/// A question category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    /// Display label.
    #[serde(rename = "type")]
    pub kind: String,
}

impl Category {
    pub fn new(id: CategoryId, kind: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
        }
    }
}

/// The categories a fresh store is seeded with.
pub const DEFAULT_CATEGORIES: [(CategoryId, &str); 6] = [
    (1, "Science"),
    (2, "Art"),
    (3, "Geography"),
    (4, "History"),
    (5, "Entertainment"),
    (6, "Sports"),
];
