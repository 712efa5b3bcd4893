//! Per-element scroll animation sessions
//!
//! Each element has at most one live session. A session advances in fixed
//! 20ms steps of animation time, one step per frame callback, regardless of
//! how much wall time actually passed between frames.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use super::completion::{self, Completion, Resolver};
use crate::config::ScrollConfig;
use crate::easing::Easing;
use crate::frame::{FrameHandle, FrameScheduling};
use crate::host::{ElementId, ScrollElement};

/// Animation time added per tick, in milliseconds
pub const TICK_MS: f64 = 20.0;

/// Duration and easing for [`ScrollAnimator::to_with`]
#[derive(Debug, Clone, Default)]
pub struct ScrollOptions {
    /// Milliseconds; `None`, non-finite, or anything truncating to `<= 0`
    /// jumps straight to the target
    pub duration_ms: Option<f64>,
    /// `None` selects quadratic ease-in-out
    pub easing: Option<Easing>,
}

impl From<&ScrollConfig> for ScrollOptions {
    fn from(config: &ScrollConfig) -> Self {
        Self {
            duration_ms: Some(config.duration_ms as f64),
            easing: Some(Easing::from(config.easing)),
        }
    }
}

/// Live state for one element
struct Session {
    id: u64,
    frame: Option<FrameHandle>,
    resolver: Resolver,
}

/// Fixed parameters of one animation run, shared by its tick callbacks
struct Run {
    element: Rc<dyn ScrollElement>,
    key: ElementId,
    session: u64,
    start: f64,
    delta: f64,
    duration: f64,
    easing: Easing,
    elapsed: Cell<f64>,
}

struct Inner {
    scheduler: Rc<dyn FrameScheduling>,
    sessions: RefCell<HashMap<ElementId, Session>>,
    next_session: Cell<u64>,
}

impl Inner {
    fn is_current(&self, key: ElementId, session: u64) -> bool {
        self.sessions
            .borrow()
            .get(&key)
            .is_some_and(|s| s.id == session)
    }

    /// Tear down the live session for `key`: unschedule its frame, reject
    /// its completion. The map entry is gone before either call is made.
    fn stop(&self, key: ElementId) -> bool {
        let Some(session) = self.sessions.borrow_mut().remove(&key) else {
            return false;
        };
        if let Some(frame) = session.frame {
            self.scheduler.cancel_frame(frame);
        }
        session.resolver.reject();
        debug!(element = key.0, session = session.id, "Scroll animation stopped");
        true
    }

    /// Finish `session` on `key` if it is still the live one
    fn settle(&self, key: ElementId, session: u64) {
        let finished = {
            let mut sessions = self.sessions.borrow_mut();
            match sessions.get(&key) {
                Some(s) if s.id == session => sessions.remove(&key),
                _ => None,
            }
        };
        if let Some(finished) = finished {
            finished.resolver.resolve();
            debug!(element = key.0, session, "Scroll animation completed");
        }
    }

    fn record_frame(&self, key: ElementId, session: u64, frame: FrameHandle) {
        if let Some(s) = self.sessions.borrow_mut().get_mut(&key) {
            if s.id == session {
                s.frame = Some(frame);
            }
        }
    }
}

/// Advance `run` by one step, then reschedule or settle
fn tick(inner: &Rc<Inner>, run: &Rc<Run>) {
    if !inner.is_current(run.key, run.session) {
        trace!(element = run.key.0, session = run.session, "Ignoring stale tick");
        return;
    }

    let elapsed = run.elapsed.get() + TICK_MS;
    run.elapsed.set(elapsed);
    let offset = run.easing.apply(elapsed, run.start, run.delta, run.duration);
    run.element.set_scroll_top(offset);
    trace!(element = run.key.0, elapsed, offset, "Scroll tick");

    // The write may have re-entered the animator for this element
    if !inner.is_current(run.key, run.session) {
        return;
    }

    if elapsed < run.duration {
        let weak: Weak<Inner> = Rc::downgrade(inner);
        let next = Rc::clone(run);
        let frame = inner.scheduler.request_frame_with_hint(
            Box::new(move |_timestamp| {
                if let Some(inner) = weak.upgrade() {
                    tick(&inner, &next);
                }
            }),
            TICK_MS,
        );
        inner.record_frame(run.key, run.session, frame);
    } else {
        inner.settle(run.key, run.session);
    }
}

/// Animates the scroll offset of elements over time
///
/// Clones share the same session table.
#[derive(Clone)]
pub struct ScrollAnimator {
    inner: Rc<Inner>,
}

impl ScrollAnimator {
    pub fn new(scheduler: Rc<dyn FrameScheduling>) -> Self {
        Self {
            inner: Rc::new(Inner {
                scheduler,
                sessions: RefCell::new(HashMap::new()),
                next_session: Cell::new(0),
            }),
        }
    }

    /// Scroll `element` to `target` over `duration_ms` along `easing`
    ///
    /// Returns `None` without touching anything when the element is detached
    /// or `target` is not finite. Otherwise any running animation on the
    /// element is stopped first (its completion is rejected), and the
    /// returned completion settles when this animation finishes or is
    /// itself interrupted.
    ///
    /// Without a positive duration the offset is written immediately and
    /// the completion is already fulfilled. Otherwise the first step runs
    /// before this returns and further steps run on scheduled frames.
    /// Steps write through a clone of `element`, see [`ScrollElement`].
    pub fn to<E>(
        &self,
        element: &E,
        target: f64,
        duration_ms: Option<f64>,
        easing: Option<Easing>,
    ) -> Option<Completion>
    where
        E: ScrollElement + Clone + 'static,
    {
        if !element.is_attached() || !target.is_finite() {
            debug!(element = element.id().0, target, "Ignoring scroll request");
            return None;
        }

        let key = element.id();
        self.inner.stop(key);

        let (resolver, completion) = completion::pair();

        let duration = match duration_ms.map(f64::trunc) {
            Some(d) if d.is_finite() && d > 0.0 => d,
            _ => {
                element.set_scroll_top(target);
                resolver.resolve();
                return Some(completion);
            }
        };

        let start = element.scroll_top();
        let session = self.inner.next_session.get() + 1;
        self.inner.next_session.set(session);
        self.inner.sessions.borrow_mut().insert(
            key,
            Session {
                id: session,
                frame: None,
                resolver,
            },
        );
        debug!(
            element = key.0,
            session,
            from = start,
            to = target,
            duration,
            "Scroll animation started"
        );

        let run = Rc::new(Run {
            element: Rc::new(element.clone()),
            key,
            session,
            start,
            delta: target - start,
            duration,
            easing: easing.unwrap_or_default(),
            elapsed: Cell::new(0.0),
        });
        tick(&self.inner, &run);

        Some(completion)
    }

    /// [`to`](Self::to) with duration and easing taken from `options`
    pub fn to_with<E>(&self, element: &E, target: f64, options: &ScrollOptions) -> Option<Completion>
    where
        E: ScrollElement + Clone + 'static,
    {
        self.to(element, target, options.duration_ms, options.easing.clone())
    }

    /// Stop the animation running on `element`, leaving its offset where it is
    ///
    /// No-op when nothing is running.
    pub fn stop<E: ScrollElement + ?Sized>(&self, element: &E) {
        self.inner.stop(element.id());
    }

    /// Stop every running animation
    pub fn stop_all(&self) {
        let keys: Vec<ElementId> = self.inner.sessions.borrow().keys().copied().collect();
        for key in keys {
            self.inner.stop(key);
        }
    }

    pub fn is_animating<E: ScrollElement + ?Sized>(&self, element: &E) -> bool {
        self.inner.sessions.borrow().contains_key(&element.id())
    }

    pub fn active_sessions(&self) -> usize {
        self.inner.sessions.borrow().len()
    }
}
