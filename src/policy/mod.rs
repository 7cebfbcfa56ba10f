//! Policies used by the search
//!
//! - Selection policies: which action to try next at a visited decision node
//! - Playout policies: how to value a decision node that was never visited

pub mod playout;
pub mod selection;

pub use playout::{PlayoutPolicy, RandomPlayout};
pub use selection::{BoundedUcbPolicy, SelectionPolicy};
