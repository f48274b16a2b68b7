//! Per-feature state, derivation and prop modules
//!
//! Each feature owns one persisted state cell (`state`), the pure functions
//! that derive render data from it, and any reconciliation pass it needs.

pub mod active_item;
pub mod expansion;
pub mod filter;
pub mod pagination;
pub mod selection;
pub mod sort;
