//! Line-oriented user input.
//!
//! Commands and quiz sessions never read the terminal directly; they ask a
//! [`Prompter`] for one line at a time. The terminal implementation uses
//! `dialoguer`, tests use `ScriptedPrompter`.

use crate::error::Result;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Input};
#[cfg(test)]
use crate::models::QuizRecord;
#[cfg(test)]
use std::collections::{HashMap, VecDeque};

/// Something that can ask the user for one line of text.
pub trait Prompter {
    /// Asks `prompt` and waits for one line of input.
    fn ask(&mut self, prompt: &str) -> Result<String>;

    /// Like [`ask`](Self::ask), with `initial` already typed into the line so
    /// the user can edit it.
    fn ask_with_initial(&mut self, prompt: &str, initial: &str) -> Result<String>;
}

/// Reads lines from the terminal.
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn input(&self, prompt: &str) -> Input<'_, String> {
        Input::with_theme(&self.theme)
            .with_prompt(prompt.red().to_string())
            .allow_empty(true)
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        Ok(self.input(prompt).interact_text()?)
    }

    fn ask_with_initial(&mut self, prompt: &str, initial: &str) -> Result<String> {
        Ok(self.input(prompt).with_initial_text(initial).interact_text()?)
    }
}

/// Replays canned responses in order and records every prompt it was shown,
/// along with the text each prompt was pre-filled with.
///
/// Once the canned responses run out, a prompt that matches a question in
/// the answer key is answered from the key. Anything else ends the input.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    responses: VecDeque<String>,
    answer_key: HashMap<String, String>,
    pub prompts: Vec<String>,
    pub initials: Vec<Option<String>>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// A prompter that answers every question in `quizzes` correctly.
    pub fn answering(quizzes: &[QuizRecord]) -> Self {
        Self {
            answer_key: quizzes
                .iter()
                .map(|q| (q.question.clone(), q.answer.clone()))
                .collect(),
            ..Self::default()
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.responses.is_empty()
    }

    fn next(&mut self, prompt: &str, initial: Option<&str>) -> Result<String> {
        self.prompts.push(prompt.to_string());
        self.initials.push(initial.map(str::to_string));
        if let Some(response) = self.responses.pop_front() {
            return Ok(response);
        }
        self.answer_key.get(prompt).cloned().ok_or_else(|| {
            crate::error::AppError::Io(std::sync::Arc::new(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "script exhausted",
            )))
        })
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.next(prompt, None)
    }

    fn ask_with_initial(&mut self, prompt: &str, initial: &str) -> Result<String> {
        self.next(prompt, Some(initial))
    }
}
