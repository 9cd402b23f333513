//! Defines the quiz record stored by the application and written to the quiz file.

use serde::{Deserialize, Serialize};

/// One question/answer pair.
///
/// Records carry no identity of their own; a record is addressed by its
/// position in the [`QuizStore`](crate::store::QuizStore).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizRecord {
    pub question: String,
    pub answer: String,
}

impl QuizRecord {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// The quizzes a fresh install starts with when no quiz file exists yet.
pub fn default_quizzes() -> Vec<QuizRecord> {
    vec![
        QuizRecord::new("Capital of Italy", "Rome"),
        QuizRecord::new("Capital of France", "Paris"),
        QuizRecord::new("Capital of Spain", "Madrid"),
        QuizRecord::new("Capital of Portugal", "Lisbon"),
    ]
}
