//! Random play-through of every quiz, without repeats, stopping at the first miss.

use crate::models::QuizRecord;
use crate::store::QuizStore;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Returns `true` if `response` matches `expected`, ignoring case and any
/// whitespace around the response.
pub fn answers_match(response: &str, expected: &str) -> bool {
    response.trim().to_lowercase() == expected.to_lowercase()
}

/// Where a [`RandomSession`] is in its lifecycle.
///
/// `Won`, `Lost` and `NoQuestions` are terminal: once reached, the session
/// presents no further questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    Running,
    Won,
    Lost,
    NoQuestions,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionState::Won | SessionState::Lost | SessionState::NoQuestions
        )
    }
}

/// A question handed out by [`RandomSession::next_question`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Index of the quiz in the store at the time the session started.
    pub index: usize,
    pub text: String,
}

/// The result of answering one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub index: usize,
    pub correct: bool,
    pub score: usize,
    pub state: SessionState,
}

/// One randomized pass over a snapshot of the store.
///
/// Drive it by alternating [`next_question`](Self::next_question) and
/// [`answer`](Self::answer). Every index of the snapshot is presented at most
/// once. A wrong answer ends the session as `Lost`; answering the last
/// remaining question correctly ends it as `Won`.
#[derive(Debug)]
pub struct RandomSession<R = StdRng> {
    quizzes: Vec<QuizRecord>,
    remaining: Vec<usize>,
    pending: Option<usize>,
    score: usize,
    state: SessionState,
    rng: R,
}

impl RandomSession<StdRng> {
    /// Starts a session whose question order is fully determined by `seed`.
    pub fn seeded(store: &QuizStore, seed: u64) -> Self {
        Self::with_rng(store, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSession<R> {
    /// Starts a session over the current content of `store` using `rng` to
    /// pick questions.
    pub fn with_rng(store: &QuizStore, rng: R) -> Self {
        let quizzes = store.records().to_vec();
        let remaining: Vec<usize> = (0..quizzes.len()).collect();
        let state = if remaining.is_empty() {
            SessionState::NoQuestions
        } else {
            SessionState::NotStarted
        };
        debug!("Starting random session over {} quizzes", quizzes.len());

        Self {
            quizzes,
            remaining,
            pending: None,
            score: 0,
            state,
            rng,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn score(&self) -> usize {
        self.score
    }

    /// Total number of quizzes in this session.
    pub fn total(&self) -> usize {
        self.quizzes.len()
    }

    /// Number of quizzes not yet presented.
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Picks the next question uniformly from the pool and removes it.
    ///
    /// If a question is already waiting for an answer, that same question is
    /// returned again. Returns `None` once the session is over.
    pub fn next_question(&mut self) -> Option<Question> {
        if self.state.is_terminal() {
            return None;
        }

        let index = match self.pending {
            Some(index) => index,
            None => {
                let slot = self.rng.gen_range(0..self.remaining.len());
                let index = self.remaining.swap_remove(slot);
                self.pending = Some(index);
                self.state = SessionState::Running;
                index
            },
        };

        Some(Question {
            index,
            text: self.quizzes[index].question.clone(),
        })
    }

    /// Checks `response` against the pending question and advances the session.
    ///
    /// Returns `None` if no question is pending, which includes every
    /// terminal state.
    pub fn answer(&mut self, response: &str) -> Option<Round> {
        let index = self.pending.take()?;
        let correct = answers_match(response, &self.quizzes[index].answer);

        if correct {
            self.score += 1;
            if self.remaining.is_empty() {
                self.state = SessionState::Won;
            }
        } else {
            self.state = SessionState::Lost;
        }
        debug!(
            "Quiz {} answered {}, score {}",
            index,
            if correct { "correctly" } else { "incorrectly" },
            self.score
        );

        Some(Round {
            index,
            correct,
            score: self.score,
            state: self.state,
        })
    }
}
