//! Filtering by category values

mod category;
mod derive;
mod state;

pub use category::*;
pub use derive::*;
pub use state::*;
