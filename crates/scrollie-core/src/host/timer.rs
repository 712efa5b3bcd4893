use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use super::clock::{Clock, ManualClock};
use crate::{Error, Result};

/// Upper bound on callbacks run by one `flush`, guards against timers
/// that keep re-arming themselves forever
const MAX_FLUSH_CALLBACKS: usize = 100_000;

/// Identifier of an armed single-shot timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

pub type TimerCallback = Box<dyn FnOnce()>;

/// Delayed single-shot invocation with cancellation
pub trait Timer {
    fn set_timeout(&self, delay: Duration, callback: TimerCallback) -> TimerId;

    /// Cancel a pending timer; unknown or already-fired ids are ignored
    fn clear_timeout(&self, id: TimerId);
}

struct Entry {
    id: TimerId,
    due_ms: f64,
    callback: TimerCallback,
}

#[derive(Default)]
struct QueueState {
    next_id: u64,
    entries: Vec<Entry>,
}

impl QueueState {
    /// Remove and return the earliest entry due at or before `deadline`.
    /// Ties run in arming order.
    fn pop_due(&mut self, deadline: f64) -> Option<Entry> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= deadline)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.id.cmp(&b.id)))
            .map(|(i, _)| i)?;
        Some(self.entries.remove(index))
    }
}

/// Virtual-time timer queue
///
/// Timers fire only when the owner calls [`TimerQueue::advance`] or
/// [`TimerQueue::flush`]; the paired [`ManualClock`] is moved to each
/// timer's due time before its callback runs. Clones share the queue.
#[derive(Clone)]
pub struct TimerQueue {
    state: Rc<RefCell<QueueState>>,
    clock: ManualClock,
}

impl TimerQueue {
    pub fn new(clock: ManualClock) -> Self {
        Self {
            state: Rc::new(RefCell::new(QueueState::default())),
            clock,
        }
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Number of armed timers
    pub fn pending(&self) -> usize {
        self.state.borrow().entries.len()
    }

    /// Move time forward by `ms`, running every timer that falls due,
    /// including timers armed by callbacks within the window.
    /// Returns the number of callbacks run.
    pub fn advance(&self, ms: f64) -> usize {
        let deadline = self.clock.now_ms() + ms;
        let mut ran = 0;
        while let Some(entry) = self.next_due(deadline) {
            self.run(entry);
            ran += 1;
        }
        self.clock.set(deadline);
        ran
    }

    /// Run timers until none are left.
    ///
    /// Fails when nothing was armed, so callers can assert that a
    /// cancelled animation left no work behind.
    pub fn flush(&self) -> Result<usize> {
        if self.pending() == 0 {
            return Err(Error::Timer("no deferred tasks to be flushed".to_string()));
        }
        let mut ran = 0;
        while let Some(entry) = self.next_due(f64::INFINITY) {
            self.run(entry);
            ran += 1;
            if ran >= MAX_FLUSH_CALLBACKS {
                return Err(Error::Timer(format!(
                    "gave up after {} callbacks, timers keep re-arming",
                    ran
                )));
            }
        }
        Ok(ran)
    }

    fn next_due(&self, deadline: f64) -> Option<Entry> {
        self.state.borrow_mut().pop_due(deadline)
    }

    fn run(&self, entry: Entry) {
        if entry.due_ms > self.clock.now_ms() {
            self.clock.set(entry.due_ms);
        }
        tracing::trace!(timer = entry.id.0, at = entry.due_ms, "Timer fired");
        (entry.callback)();
    }
}

impl Timer for TimerQueue {
    fn set_timeout(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let due_ms = self.clock.now_ms() + delay.as_nanos() as f64 / 1_000_000.0;
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = TimerId(state.next_id);
        state.entries.push(Entry {
            id,
            due_ms,
            callback,
        });
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        self.state.borrow_mut().entries.retain(|e| e.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> TimerCallback) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let make = move |name: &'static str| -> TimerCallback {
            let sink = Rc::clone(&sink);
            Box::new(move || sink.borrow_mut().push(name))
        };
        (log, make)
    }

    #[test]
    fn test_advance_runs_due_timers_in_order() {
        let queue = TimerQueue::new(ManualClock::new(0.0));
        let (log, make) = recorder();

        queue.set_timeout(Duration::from_millis(30), make("late"));
        queue.set_timeout(Duration::from_millis(10), make("early"));
        queue.set_timeout(Duration::from_millis(10), make("early-second"));

        assert_eq!(queue.advance(20.0), 2);
        assert_eq!(*log.borrow(), vec!["early", "early-second"]);
        assert_eq!(queue.clock().now_ms(), 20.0);

        assert_eq!(queue.advance(20.0), 1);
        assert_eq!(*log.borrow(), vec!["early", "early-second", "late"]);
    }

    #[test]
    fn test_clock_is_at_due_time_inside_callback() {
        let queue = TimerQueue::new(ManualClock::new(100.0));
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        let clock = queue.clock().clone();
        queue.set_timeout(
            Duration::from_millis(16),
            Box::new(move || *sink.borrow_mut() = Some(clock.now_ms())),
        );
        queue.advance(50.0);
        assert_eq!(*seen.borrow(), Some(116.0));
        assert_eq!(queue.clock().now_ms(), 150.0);
    }

    #[test]
    fn test_clear_timeout_prevents_callback() {
        let queue = TimerQueue::new(ManualClock::default());
        let (log, make) = recorder();

        let id = queue.set_timeout(Duration::from_millis(5), make("cancelled"));
        queue.set_timeout(Duration::from_millis(5), make("kept"));
        queue.clear_timeout(id);
        // Clearing twice is harmless
        queue.clear_timeout(id);

        queue.flush().unwrap();
        assert_eq!(*log.borrow(), vec!["kept"]);
    }

    #[test]
    fn test_flush_runs_rearmed_timers() {
        let queue = TimerQueue::new(ManualClock::default());
        let count = Rc::new(RefCell::new(0));

        fn arm(queue: TimerQueue, count: Rc<RefCell<u32>>) {
            let q = queue.clone();
            queue.set_timeout(
                Duration::from_millis(16),
                Box::new(move || {
                    *count.borrow_mut() += 1;
                    if *count.borrow() < 3 {
                        arm(q, count);
                    }
                }),
            );
        }

        arm(queue.clone(), Rc::clone(&count));
        assert_eq!(queue.flush().unwrap(), 3);
        assert_eq!(*count.borrow(), 3);
        assert_eq!(queue.clock().now_ms(), 48.0);
    }

    #[test]
    fn test_flush_with_nothing_armed_errors() {
        let queue = TimerQueue::new(ManualClock::default());
        assert!(matches!(queue.flush(), Err(Error::Timer(_))));
    }
}
