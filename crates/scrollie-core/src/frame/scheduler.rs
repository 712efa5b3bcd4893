use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, warn};

use super::environment::{
    is_defective_platform, select_cancel, select_request, CancelApi, CancelFrameFn, Environment,
    FrameBackend, FrameCallback, RequestApi, RequestFrameFn,
};
use crate::host::{Clock, Timer, TimerId};

/// Minimum spacing between emulated frames, one frame at 60Hz
pub const FALLBACK_FRAME_MS: f64 = 16.0;

/// Handle of a scheduled frame callback, only good for cancelling it
///
/// Native frame ids and timer ids are separate namespaces, so a handle
/// remembers which backend issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameHandle {
    Native(u64),
    Timer(TimerId),
}

/// Request/cancel pair consumed by the scroll animator
pub trait FrameScheduling {
    /// Run `callback` once at the next rendering opportunity. Never runs it
    /// before returning.
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle;

    /// Same as [`request_frame`](Self::request_frame), carrying the caller's
    /// expected frame interval. Advisory only.
    fn request_frame_with_hint(&self, callback: FrameCallback, _hint_ms: f64) -> FrameHandle {
        self.request_frame(callback)
    }

    /// Prevent a pending callback from running; no-op once it ran or was cancelled
    fn cancel_frame(&self, handle: FrameHandle);
}

enum Requester {
    Native(RequestApi, RequestFrameFn),
    Timer,
}

enum Canceller {
    Native(CancelApi, CancelFrameFn),
    Timer,
}

/// Frame scheduler over native per-frame callbacks with a timer fallback
///
/// The entry points are chosen once, in [`FrameScheduler::new`], from the
/// supplied [`Environment`].
pub struct FrameScheduler {
    requester: Requester,
    canceller: Canceller,
    timer: Rc<dyn Timer>,
    clock: Rc<dyn Clock>,
    last_time: Rc<Cell<Option<f64>>>,
}

impl FrameScheduler {
    pub fn new(env: &Environment, timer: Rc<dyn Timer>, clock: Rc<dyn Clock>) -> Self {
        if is_defective_platform(env.user_agent()) {
            warn!(
                user_agent = env.user_agent(),
                "Native frame callbacks are unreliable on this platform, using timers"
            );
        }

        let requester = match select_request(env) {
            FrameBackend::Native(api) => match env.request(api) {
                Some(request) => Requester::Native(api, Rc::clone(request)),
                None => Requester::Timer,
            },
            FrameBackend::Timer => Requester::Timer,
        };
        let canceller = match select_cancel(env) {
            FrameBackend::Native(api) => match env.cancel(api) {
                Some(cancel) => Canceller::Native(api, Rc::clone(cancel)),
                None => Canceller::Timer,
            },
            FrameBackend::Timer => Canceller::Timer,
        };

        let scheduler = Self {
            requester,
            canceller,
            timer,
            clock,
            last_time: Rc::new(Cell::new(None)),
        };
        debug!(
            request = ?scheduler.request_backend(),
            cancel = ?scheduler.cancel_backend(),
            "Frame scheduler ready"
        );
        scheduler
    }

    pub fn request_backend(&self) -> FrameBackend<RequestApi> {
        match &self.requester {
            Requester::Native(api, _) => FrameBackend::Native(*api),
            Requester::Timer => FrameBackend::Timer,
        }
    }

    pub fn cancel_backend(&self) -> FrameBackend<CancelApi> {
        match &self.canceller {
            Canceller::Native(api, _) => FrameBackend::Native(*api),
            Canceller::Timer => FrameBackend::Timer,
        }
    }

    /// Timestamp handed to the most recent emulated frame
    pub fn last_time(&self) -> Option<f64> {
        self.last_time.get()
    }

    /// Emulate a frame with a timer, never faster than one per 16ms
    fn request_with_timer(&self, callback: FrameCallback) -> FrameHandle {
        let now = self.clock.now_ms();
        let next_time = match self.last_time.get() {
            Some(last) => (last + FALLBACK_FRAME_MS).max(now),
            None => now,
        };
        let delay = Duration::from_secs_f64((next_time - now).max(0.0) / 1000.0);

        let last_time = Rc::clone(&self.last_time);
        let id = self.timer.set_timeout(
            delay,
            Box::new(move || {
                last_time.set(Some(next_time));
                callback(next_time);
            }),
        );
        FrameHandle::Timer(id)
    }
}

impl FrameScheduling for FrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        match &self.requester {
            Requester::Native(_, request) => FrameHandle::Native(request(callback)),
            Requester::Timer => self.request_with_timer(callback),
        }
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        match (handle, &self.canceller) {
            (FrameHandle::Timer(id), _) => self.timer.clear_timeout(id),
            (FrameHandle::Native(id), Canceller::Native(_, cancel)) => cancel(id),
            (FrameHandle::Native(id), Canceller::Timer) => {
                warn!(
                    frame = id,
                    "No native cancel entry point, frame handle dropped"
                );
            }
        }
    }
}

impl<S: FrameScheduling + ?Sized> FrameScheduling for Rc<S> {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        (**self).request_frame(callback)
    }

    fn request_frame_with_hint(&self, callback: FrameCallback, hint_ms: f64) -> FrameHandle {
        (**self).request_frame_with_hint(callback, hint_ms)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        (**self).cancel_frame(handle)
    }
}
