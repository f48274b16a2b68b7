//! Row selection
//!
//! Selected ids are never persisted; the items they refer to are kept in an
//! append-only cache so selections survive paging away from them.

mod derived;
mod effects;
mod state;

pub use derived::*;
pub use effects::*;
pub use state::*;
