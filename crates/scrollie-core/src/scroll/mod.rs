//! Eased scroll animation
//!
//! - `animator` - per-element sessions, supersession and stop
//! - `completion` - the settle-once outcome handed back to callers

mod animator;
mod completion;

pub use animator::{ScrollAnimator, ScrollOptions, TICK_MS};
pub use completion::Completion;
