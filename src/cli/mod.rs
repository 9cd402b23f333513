//! Handles the interactive Command Line Interface.
//!
//! Includes parsing prompt lines into commands, running them against the quiz
//! store, and reading user input through a `Prompter`.

mod commands;
mod prompt;

pub use commands::*;
pub use prompt::*;
