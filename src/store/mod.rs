//! Provides quiz storage.
//!
//! - `memory`: the authoritative in-memory `QuizStore`.
//! - `file`: JSON load/save of the store's records.

mod file;
mod memory;

pub use file::*;
pub use memory::*;
