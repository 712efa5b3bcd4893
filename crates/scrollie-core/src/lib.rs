pub mod config;
pub mod easing;
pub mod error;
pub mod frame;
pub mod host;
pub mod scroll;
pub mod trace;

pub use config::{AppConfig, EasingKind, FrameMode, ScrollConfig};
pub use easing::{ease_in_out_quad, Easing};
pub use error::{Error, Result};
pub use frame::{Environment, FrameHandle, FrameScheduler, FrameScheduling};
pub use host::{Clock, ElementId, ScrollElement, Timer, TimerId};
pub use scroll::{Completion, ScrollAnimator, ScrollOptions};
pub use trace::{run_trace, TraceOptions, TraceReport};
