//! Host capabilities the animator depends on
//!
//! The scroll core never touches a real UI toolkit. It reads and writes
//! offsets through [`ScrollElement`], arms timers through [`Timer`], and
//! reads time through [`Clock`]. Deterministic implementations live here
//! so the headless tracer and the tests share one virtual run loop.

mod clock;
mod element;
mod frames;
mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use element::{ElementId, ScrollElement, VirtualElement};
pub use frames::FrameQueue;
pub use timer::{Timer, TimerCallback, TimerId, TimerQueue};
