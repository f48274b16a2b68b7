//! Pagination

mod derive;
mod effects;
mod state;

pub use derive::*;
pub use effects::*;
pub use state::*;
