//! Game logic: answer checking and the random play session.

mod session;

pub use session::*;
