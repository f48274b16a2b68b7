//! Active item tracking (e.g. the row shown in a details drawer)

mod derived;
mod effects;
mod state;

pub use derived::*;
pub use effects::*;
pub use state::*;
