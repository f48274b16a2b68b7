//! Row and cell expansion

mod derived;
mod state;

pub use derived::*;
pub use state::*;
