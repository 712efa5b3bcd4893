use std::rc::Rc;

use scrollie_core::frame::{FrameBackend, FrameScheduler, RequestApi};
use scrollie_core::host::{FrameQueue, ManualClock, TimerQueue};
use scrollie_core::{
    AppConfig, Clock, Completion, FrameMode, ScrollAnimator, ScrollConfig, ScrollElement,
    ScrollOptions,
};

use crate::input::Action;
use crate::pane::ScrollPane;

const WORDS: &[&str] = &[
    "frame", "offset", "easing", "viewport", "timer", "session", "target", "delta", "tick",
    "element", "native", "fallback", "supersede", "settle", "interval", "budget",
];

/// How the most recent animation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Cancelled,
}

/// Application state for the scroll demo
///
/// All time inside the app is virtual: the render loop reports wall time
/// through [`App::on_frame`], which moves the timer queue's clock forward
/// and runs the frame queue. Nothing fires between calls.
pub struct App {
    pub config: AppConfig,
    pub lines: Vec<String>,
    pub pane: ScrollPane,
    pub frame_mode: FrameMode,
    /// Where the animator's frame requests currently go
    pub backend: FrameBackend<RequestApi>,
    /// Offset the latest animation is heading for
    pub target: f64,
    pub last_outcome: Option<Outcome>,
    pub completed: u32,
    pub cancelled: u32,
    pub should_quit: bool,
    pub status_message: Option<String>,
    frames: FrameQueue,
    timers: TimerQueue,
    animator: ScrollAnimator,
    options: ScrollOptions,
    completion: Option<Completion>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let lines = demo_document(config.ui.lines);
        let pane = ScrollPane::new(lines.len());
        let frames = FrameQueue::new();
        let timers = TimerQueue::new(ManualClock::new(0.0));
        let frame_mode = config.scroll.frames;
        let (animator, backend) = build_animator(&frames, &timers, &config.scroll, frame_mode);
        let options = ScrollOptions::from(&config.scroll);

        Self {
            config,
            lines,
            pane,
            frame_mode,
            backend,
            target: 0.0,
            last_outcome: None,
            completed: 0,
            cancelled: 0,
            should_quit: false,
            status_message: None,
            frames,
            timers,
            animator,
            options,
            completion: None,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating(&self.pane)
    }

    pub fn backend_label(&self) -> String {
        match self.backend {
            FrameBackend::Native(api) => api.to_string(),
            FrameBackend::Timer => "timer fallback".to_string(),
        }
    }

    /// Drive one rendered frame at `now_ms` (milliseconds since start)
    pub fn on_frame(&mut self, now_ms: f64) {
        let behind = now_ms - self.timers.clock().now_ms();
        if behind > 0.0 {
            self.timers.advance(behind);
        }
        self.frames.run_frame(now_ms);
        self.poll_completion();
    }

    /// Animate the pane to `target`, clamped to the scrollable range
    pub fn scroll_to(&mut self, target: f64) {
        let target = target.clamp(0.0, self.pane.max_scroll());
        self.target = target;
        self.status_message = None;

        let previous = self.completion.take();
        self.completion = self.animator.to_with(&self.pane, target, &self.options);

        // Starting a new animation settles the one it replaced
        if let Some(mut previous) = previous {
            if let Some(outcome) = previous.try_outcome() {
                self.record(outcome);
            }
        }
        self.poll_completion();
    }

    /// Move `rows` from where the pane is heading
    pub fn step(&mut self, rows: f64) {
        let base = if self.is_animating() {
            self.target
        } else {
            self.pane.scroll_top()
        };
        self.scroll_to(base + rows);
    }

    pub fn stop(&mut self) {
        self.animator.stop(&self.pane);
        self.target = self.pane.scroll_top();
        self.poll_completion();
    }

    /// Rebuild the scheduler with the other frame mode
    ///
    /// Running animations are stopped first; their pending frames belong
    /// to the old scheduler.
    pub fn toggle_frames(&mut self) {
        self.animator.stop_all();
        self.poll_completion();

        self.frame_mode = match self.frame_mode {
            FrameMode::Auto => FrameMode::Timer,
            FrameMode::Timer => FrameMode::Auto,
        };
        let (animator, backend) =
            build_animator(&self.frames, &self.timers, &self.config.scroll, self.frame_mode);
        self.animator = animator;
        self.backend = backend;
        self.status_message = Some(format!("frames: {}", self.backend_label()));
        tracing::info!(mode = ?self.frame_mode, backend = %self.backend_label(), "Frame source switched");
    }

    pub fn apply(&mut self, action: Action) {
        let step = self.config.ui.step_lines as f64;
        let page = self.pane.viewport().max(1) as f64;
        match action {
            Action::Quit => self.should_quit = true,
            Action::StepDown => self.step(step),
            Action::StepUp => self.step(-step),
            Action::PageDown => self.step(page),
            Action::PageUp => self.step(-page),
            Action::JumpToTop => self.scroll_to(0.0),
            Action::JumpToBottom => self.scroll_to(self.pane.max_scroll()),
            Action::Stop => self.stop(),
            Action::ToggleFrames => self.toggle_frames(),
            Action::None => {}
        }
    }

    fn poll_completion(&mut self) {
        let outcome = match self.completion.as_mut() {
            Some(completion) => completion.try_outcome(),
            None => return,
        };
        if let Some(outcome) = outcome {
            self.completion = None;
            self.record(outcome);
        }
    }

    fn record(&mut self, outcome: scrollie_core::Result<()>) {
        match outcome {
            Ok(()) => {
                self.completed += 1;
                self.last_outcome = Some(Outcome::Completed);
            }
            Err(e) if e.is_cancelled() => {
                self.cancelled += 1;
                self.last_outcome = Some(Outcome::Cancelled);
            }
            Err(e) => {
                tracing::error!("Scroll animation failed: {}", e);
                self.status_message = Some(format!("error: {}", e));
            }
        }
    }
}

fn build_animator(
    frames: &FrameQueue,
    timers: &TimerQueue,
    config: &ScrollConfig,
    mode: FrameMode,
) -> (ScrollAnimator, FrameBackend<RequestApi>) {
    let user_agent = config.user_agent.as_deref().unwrap_or_default();
    let scheduler = FrameScheduler::new(
        &frames.environment(user_agent, mode),
        Rc::new(timers.clone()),
        Rc::new(timers.clock().clone()),
    );
    let backend = scheduler.request_backend();
    (ScrollAnimator::new(Rc::new(scheduler)), backend)
}

/// Numbered filler text with enough variety to see motion
fn demo_document(lines: usize) -> Vec<String> {
    (0..lines)
        .map(|i| {
            let words: Vec<&str> = (0..(4 + i % 7))
                .map(|w| WORDS[(i * 7 + w * 3) % WORDS.len()])
                .collect();
            format!("{:>4}  {}", i + 1, words.join(" "))
        })
        .collect()
}
