//! Frame scheduling over native per-frame callbacks with a timer fallback
//!
//! - `environment` - host capability table and the pure selection policy
//! - `scheduler` - the scheduler built from that selection

mod environment;
mod scheduler;

pub use environment::{
    is_defective_platform, select_cancel, select_request, CancelApi, CancelFrameFn, Environment,
    FrameBackend, FrameCallback, RequestApi, RequestFrameFn, Vendor,
};
pub use scheduler::{FrameHandle, FrameScheduler, FrameScheduling, FALLBACK_FRAME_MS};
