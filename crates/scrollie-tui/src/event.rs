use std::cell::Cell;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

use scrollie_core::host::SystemClock;
use scrollie_core::Clock;

/// Terminal events interleaved with paced frames
///
/// The handler is the demo's compositor: it decides when a frame is due and
/// stamps it with its own clock, so key presses never stretch the cadence.
pub struct EventHandler {
    interval_ms: f64,
    clock: Box<dyn Clock>,
    next_frame_ms: Cell<f64>,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self::with_clock(tick_rate_ms, Box::new(SystemClock::new()))
    }

    /// The first frame is due immediately
    pub fn with_clock(tick_rate_ms: u64, clock: Box<dyn Clock>) -> Self {
        let now = clock.now_ms();
        Self {
            interval_ms: tick_rate_ms.max(1) as f64,
            clock,
            next_frame_ms: Cell::new(now),
        }
    }

    /// Poll for the next event
    ///
    /// Waits for input only until the next frame deadline. Returns
    /// `Frame` once the deadline has passed, `None` for ignored input.
    pub fn next(&self) -> Result<Option<AppEvent>> {
        if let Some(timestamp) = self.take_frame() {
            return Ok(Some(AppEvent::Frame(timestamp)));
        }
        if event::poll(self.until_next_frame())? {
            Ok(translate(event::read()?))
        } else {
            Ok(self.take_frame().map(AppEvent::Frame))
        }
    }

    fn until_next_frame(&self) -> Duration {
        let left = self.next_frame_ms.get() - self.clock.now_ms();
        Duration::from_secs_f64(left.max(0.0) / 1000.0)
    }

    /// Frame timestamp if a frame is due, moving the deadline on
    ///
    /// A late frame restarts the grid from now instead of bursting to catch up.
    fn take_frame(&self) -> Option<f64> {
        let now = self.clock.now_ms();
        let deadline = self.next_frame_ms.get();
        if now < deadline {
            return None;
        }
        let next = deadline + self.interval_ms;
        self.next_frame_ms
            .set(if next > now { next } else { now + self.interval_ms });
        Some(now)
    }
}

fn translate(event: Event) -> Option<AppEvent> {
    match event {
        // Only handle key press events, ignore release events
        // (crossterm 0.27+ sends release events on some systems)
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        _ => None,
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// A frame is due, carrying its timestamp in ms
    Frame(f64),
}
