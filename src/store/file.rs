//! Loads and saves the quiz sequence as a JSON file using `tokio::fs`.
//!
//! The file holds a pretty-printed JSON array of `{ "question", "answer" }`
//! objects in store order. Saving writes a sibling temporary file first and
//! renames it over the target, so an interrupted save never leaves a
//! truncated quiz file behind.

use crate::error::{AppError, Result};
use crate::models::{default_quizzes, QuizRecord};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Reads and writes the quiz file at a fixed path.
#[derive(Debug, Clone)]
pub struct QuizFile {
    path: PathBuf,
}

impl QuizFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every record from the file.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the file cannot be read and
    /// `AppError::JsonParse` if its content is not a list of quizzes.
    pub async fn load(&self) -> Result<Vec<QuizRecord>> {
        debug!("Reading quiz file {}", self.path.display());
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            error!("Failed to read {}: {}", self.path.display(), e);
            AppError::from(e)
        })?;
        let records: Vec<QuizRecord> = serde_json::from_str(&raw).map_err(|e| {
            error!("Quiz file {} is not valid JSON: {}", self.path.display(), e);
            AppError::from(e)
        })?;
        info!(
            "Loaded {} quizzes from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }

    /// Loads the file if it exists; otherwise writes the default quizzes to it
    /// and returns those.
    pub async fn load_or_seed(&self) -> Result<Vec<QuizRecord>> {
        if tokio::fs::try_exists(&self.path).await? {
            return self.load().await;
        }
        info!(
            "No quiz file at {}, starting from the default quizzes",
            self.path.display()
        );
        let defaults = default_quizzes();
        self.save(&defaults).await?;
        Ok(defaults)
    }

    /// Writes `records` to the file, replacing its previous content.
    pub async fn save(&self, records: &[QuizRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, json).await.map_err(|e| {
            error!("Failed to write {}: {}", tmp.display(), e);
            AppError::from(e)
        })?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(
            "Saved {} quizzes to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "quizzes.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
