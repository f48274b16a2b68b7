//! Sorting by one active column

mod derive;
mod state;

pub use derive::*;
pub use state::*;
