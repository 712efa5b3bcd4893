//! Per-frame callback queue driven by the host's own loop
//!
//! Terminals and headless runs have no compositor to call us back, so the
//! owner's loop plays that role: it calls [`FrameQueue::run_frame`] once per
//! frame. Exposed to the scheduler as the standard native entry points.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::FrameMode;
use crate::frame::{CancelApi, Environment, FrameCallback, RequestApi};

#[derive(Default)]
struct QueueState {
    next_id: u64,
    queued: Vec<(u64, FrameCallback)>,
}

/// Callbacks waiting for the next rendered frame. Clones share the queue.
#[derive(Clone, Default)]
pub struct FrameQueue {
    state: Rc<RefCell<QueueState>>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self, callback: FrameCallback) -> u64 {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = state.next_id;
        state.queued.push((id, callback));
        id
    }

    pub fn cancel(&self, id: u64) {
        self.state.borrow_mut().queued.retain(|(queued, _)| *queued != id);
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().queued.len()
    }

    /// Run the callbacks queued before this frame started
    ///
    /// Callbacks requested while the frame runs wait for the next one.
    pub fn run_frame(&self, timestamp_ms: f64) -> usize {
        let batch = std::mem::take(&mut self.state.borrow_mut().queued);
        let ran = batch.len();
        for (_, callback) in batch {
            callback(timestamp_ms);
        }
        ran
    }

    /// Describe this host to the frame scheduler
    ///
    /// `FrameMode::Timer` hides the queue so the scheduler falls back to timers.
    pub fn environment(&self, user_agent: &str, mode: FrameMode) -> Environment {
        let env = Environment::new(user_agent);
        if mode == FrameMode::Timer {
            return env;
        }

        let requests = self.clone();
        let cancels = self.clone();
        env.with_request(
            RequestApi::Standard,
            Rc::new(move |callback| requests.request(callback)),
        )
        .with_cancel(CancelApi::Standard, Rc::new(move |id| cancels.cancel(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{FrameBackend, FrameScheduler, FrameScheduling};
    use crate::host::{ManualClock, ScrollElement, Timer, TimerQueue, VirtualElement};
    use std::time::Duration;
    use crate::scroll::ScrollAnimator;

    fn scheduler(queue: &FrameQueue, user_agent: &str, mode: FrameMode) -> (FrameScheduler, TimerQueue) {
        let clock = ManualClock::new(0.0);
        let timers = TimerQueue::new(clock.clone());
        let scheduler = FrameScheduler::new(
            &queue.environment(user_agent, mode),
            Rc::new(timers.clone()),
            Rc::new(clock),
        );
        (scheduler, timers)
    }

    #[test]
    fn test_callbacks_requested_during_frame_wait() {
        let queue = FrameQueue::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let inner_queue = queue.clone();
        let sink = Rc::clone(&seen);
        queue.request(Box::new(move |t| {
            sink.borrow_mut().push(t);
            let sink = Rc::clone(&sink);
            inner_queue.request(Box::new(move |t| sink.borrow_mut().push(t)));
        }));

        assert_eq!(queue.run_frame(16.0), 1);
        assert_eq!(*seen.borrow(), vec![16.0]);
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.run_frame(32.0), 1);
        assert_eq!(*seen.borrow(), vec![16.0, 32.0]);
    }

    #[test]
    fn test_cancel_removes_callback() {
        let queue = FrameQueue::new();
        let id = queue.request(Box::new(|_| panic!("cancelled frame ran")));
        queue.cancel(id);
        assert_eq!(queue.run_frame(0.0), 0);
    }

    #[test]
    fn test_environment_modes() {
        let queue = FrameQueue::new();

        let (native, _) = scheduler(&queue, "", FrameMode::Auto);
        assert_eq!(native.request_backend(), FrameBackend::Native(RequestApi::Standard));
        assert_eq!(native.cancel_backend(), FrameBackend::Native(CancelApi::Standard));

        let (forced, _) = scheduler(&queue, "", FrameMode::Timer);
        assert_eq!(forced.request_backend(), FrameBackend::Timer);

        let (defective, _) = scheduler(&queue, "iPhone OS 6", FrameMode::Auto);
        assert_eq!(defective.request_backend(), FrameBackend::Timer);
        assert_eq!(defective.cancel_backend(), FrameBackend::Timer);
    }

    #[test]
    fn test_animation_over_native_frames() {
        let queue = FrameQueue::new();
        let (scheduler, timers) = scheduler(&queue, "", FrameMode::Auto);
        let animator = ScrollAnimator::new(Rc::new(scheduler));
        let element = VirtualElement::new(10.0, 500.0);

        let mut done = animator.to(&element, 300.0, Some(100.0), None).unwrap();
        let mut frames = 0;
        while queue.run_frame(frames as f64 * 16.0) > 0 {
            frames += 1;
        }

        assert_eq!(frames, 4);
        assert_eq!(element.scroll_top(), 300.0);
        assert!(done.try_outcome().unwrap().is_ok());
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn test_request_only_host_cancel_keeps_timers() {
        let queue = FrameQueue::new();
        let clock = ManualClock::new(0.0);
        let timers = TimerQueue::new(clock.clone());
        let requests = queue.clone();
        let env = Environment::new("").with_request(
            RequestApi::Standard,
            Rc::new(move |callback| requests.request(callback)),
        );
        let scheduler = FrameScheduler::new(&env, Rc::new(timers.clone()), Rc::new(clock));

        let fired = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&fired);
        timers.set_timeout(Duration::from_millis(5), Box::new(move || *flag.borrow_mut() = true));

        let ran = Rc::new(RefCell::new(false));
        let sink = Rc::clone(&ran);
        let handle = scheduler.request_frame(Box::new(move |_| *sink.borrow_mut() = true));
        scheduler.cancel_frame(handle);

        // No native cancel: the frame still runs, but the timer is untouched
        queue.run_frame(16.0);
        timers.advance(10.0);
        assert!(*ran.borrow());
        assert!(*fired.borrow());
    }
}
