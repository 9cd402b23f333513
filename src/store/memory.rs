//! The in-memory quiz store with positional addressing.

use crate::error::{AppError, Result};
use crate::models::QuizRecord;
use tracing::debug;

/// Ordered collection of quizzes, addressed by position.
///
/// Indices are always dense: `0..count()`. Deleting index `i` moves every
/// record after it down by one, so an index obtained before a deletion may
/// point at a different record (or nothing) afterwards. Callers holding an
/// index across a mutation must resolve it again.
///
/// Every mutating method checks bounds before touching the backing vector, so
/// a failed call leaves the store unchanged.
#[derive(Debug, Default, Clone)]
pub struct QuizStore {
    quizzes: Vec<QuizRecord>,
}

impl QuizStore {
    /// Creates a store holding `records` in the given order.
    pub fn from_records(records: Vec<QuizRecord>) -> Self {
        debug!("Creating quiz store with {} records", records.len());
        Self { quizzes: records }
    }

    /// Number of quizzes currently stored.
    pub fn count(&self) -> usize {
        self.quizzes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }

    /// All quizzes with their current index, in storage order.
    pub fn get_all(&self) -> impl Iterator<Item = (usize, &QuizRecord)> + '_ {
        self.quizzes.iter().enumerate()
    }

    /// The backing records in storage order, for the persistence layer.
    pub fn records(&self) -> &[QuizRecord] {
        &self.quizzes
    }

    /// Returns the quiz at `index`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if `index >= count()`.
    pub fn get_by_index(&self, index: usize) -> Result<&QuizRecord> {
        self.quizzes
            .get(index)
            .ok_or_else(|| AppError::not_found(index))
    }

    /// Parses raw user text into a valid index of this store.
    ///
    /// Anything that is not a non-negative integer below `count()` fails with
    /// `AppError::NotFound` carrying the text as given.
    pub fn resolve_index(&self, raw: &str) -> Result<usize> {
        let trimmed = raw.trim();
        match trimmed.parse::<usize>() {
            Ok(index) if index < self.count() => Ok(index),
            _ => {
                debug!("Rejecting quiz index {:?}", raw);
                Err(AppError::NotFound(trimmed.to_string()))
            },
        }
    }

    /// Appends a new quiz; it gets index `count() - 1`.
    ///
    /// Empty text is accepted here. Rejecting it is up to the caller.
    pub fn add(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.quizzes.push(QuizRecord::new(question, answer));
        debug!("Added quiz at index {}", self.quizzes.len() - 1);
    }

    /// Replaces the quiz at `index` in place.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if `index >= count()`; nothing is changed.
    pub fn update(
        &mut self,
        index: usize,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Result<()> {
        let slot = self
            .quizzes
            .get_mut(index)
            .ok_or_else(|| AppError::not_found(index))?;
        *slot = QuizRecord::new(question, answer);
        debug!("Updated quiz at index {}", index);
        Ok(())
    }

    /// Removes the quiz at `index`, shifting every later quiz down by one.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if `index >= count()`; nothing is changed.
    pub fn delete_by_index(&mut self, index: usize) -> Result<QuizRecord> {
        if index >= self.quizzes.len() {
            return Err(AppError::not_found(index));
        }
        let removed = self.quizzes.remove(index);
        debug!("Deleted quiz at index {}", index);
        Ok(removed)
    }
}
