//! Defines the data structures used throughout the application.
//!
//! Currently this is the quiz record shared by the store, the game and the quiz file.

mod quiz;

pub use quiz::*;
