//! Headless animation traces on virtual time
//!
//! Runs one animation (optionally interrupted by a second) against a
//! [`VirtualElement`], stepping frames 16ms apart, and records every offset
//! written along the way.

use std::rc::Rc;

use serde::Serialize;
use tracing::debug;

use crate::config::{EasingKind, FrameMode};
use crate::easing::Easing;
use crate::frame::{FrameBackend, FrameScheduler, FALLBACK_FRAME_MS};
use crate::host::{Clock, FrameQueue, ManualClock, ScrollElement, TimerQueue, VirtualElement};
use crate::scroll::{Completion, ScrollAnimator};
use crate::{Error, Result};

/// Upper bound on simulated frames, for supersede times far in the future
const MAX_TRACE_FRAMES: usize = 100_000;

/// Start a second animation once the trace reaches `at_ms`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Supersede {
    pub at_ms: f64,
    pub to: f64,
}

#[derive(Debug, Clone)]
pub struct TraceOptions {
    pub from: f64,
    pub to: f64,
    pub duration_ms: Option<f64>,
    pub easing: EasingKind,
    pub user_agent: String,
    pub frames: FrameMode,
    pub supersede: Option<Supersede>,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            from: 0.0,
            to: 0.0,
            duration_ms: None,
            easing: EasingKind::default(),
            user_agent: String::new(),
            frames: FrameMode::default(),
            supersede: None,
        }
    }
}

/// One offset write
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraceRow {
    /// Virtual time of the frame that produced the write
    pub time_ms: f64,
    /// 1 for the initial animation, 2 for the superseding one
    pub run: usize,
    pub offset: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOutcome {
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize)]
pub struct TraceReport {
    /// Where frame requests went: a native entry point name or `timer`
    pub backend: String,
    pub rows: Vec<TraceRow>,
    /// One per animation started, in start order
    pub outcomes: Vec<RunOutcome>,
}

impl TraceReport {
    pub fn final_offset(&self) -> Option<f64> {
        self.rows.last().map(|row| row.offset)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Run the trace described by `options` to completion
pub async fn run_trace(options: &TraceOptions) -> Result<TraceReport> {
    let clock = ManualClock::new(0.0);
    let timers = TimerQueue::new(clock.clone());
    let frames = FrameQueue::new();
    let scheduler = FrameScheduler::new(
        &frames.environment(options.user_agent.as_str(), options.frames),
        Rc::new(timers.clone()),
        Rc::new(clock.clone()),
    );
    let backend = match scheduler.request_backend() {
        FrameBackend::Native(api) => api.to_string(),
        FrameBackend::Timer => "timer".to_string(),
    };
    let animator = ScrollAnimator::new(Rc::new(scheduler));

    let element = VirtualElement::unbounded();
    element.set_scroll_top(options.from);
    element.clear_writes();

    let mut rows = Vec::new();
    let mut completions = Vec::new();
    let start = |target: f64, completions: &mut Vec<Completion>| -> Result<()> {
        let completion = animator
            .to(
                &element,
                target,
                options.duration_ms,
                Some(Easing::from(options.easing)),
            )
            .ok_or_else(|| Error::Other(format!("cannot scroll to {}", target)))?;
        completions.push(completion);
        Ok(())
    };

    start(options.to, &mut completions)?;
    collect(&element, 0.0, completions.len(), &mut rows);

    let mut supersede = options.supersede;
    let mut now = 0.0;
    let mut frames_run = 0;
    while animator.active_sessions() > 0 || supersede.is_some() {
        if frames_run >= MAX_TRACE_FRAMES {
            return Err(Error::Other(format!(
                "trace did not settle within {} frames",
                MAX_TRACE_FRAMES
            )));
        }
        now += FALLBACK_FRAME_MS;
        timers.advance(now - clock.now_ms());
        frames.run_frame(now);
        frames_run += 1;
        collect(&element, now, completions.len(), &mut rows);

        if let Some(next) = supersede {
            if now >= next.at_ms {
                supersede = None;
                start(next.to, &mut completions)?;
                collect(&element, now, completions.len(), &mut rows);
            }
        }
    }
    debug!(frames = frames_run, writes = rows.len(), %backend, "Trace finished");

    let mut outcomes = Vec::with_capacity(completions.len());
    for completion in completions {
        outcomes.push(match completion.await {
            Ok(()) => RunOutcome::Completed,
            Err(e) if e.is_cancelled() => RunOutcome::Cancelled,
            Err(e) => return Err(e),
        });
    }

    Ok(TraceReport {
        backend,
        rows,
        outcomes,
    })
}

/// Move writes recorded since the last call into `rows`
fn collect(element: &VirtualElement, time_ms: f64, run: usize, rows: &mut Vec<TraceRow>) {
    rows.extend(element.writes().into_iter().map(|offset| TraceRow {
        time_ms,
        run,
        offset,
    }));
    element.clear_writes();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(to: f64, duration_ms: f64) -> TraceOptions {
        TraceOptions {
            to,
            duration_ms: Some(duration_ms),
            ..TraceOptions::default()
        }
    }

    #[tokio::test]
    async fn test_native_trace() {
        let report = run_trace(&options(300.0, 100.0)).await.unwrap();

        assert_eq!(report.backend, "requestAnimationFrame");
        assert_eq!(report.outcomes, vec![RunOutcome::Completed]);
        // One synchronous write, then one per frame
        assert_eq!(report.rows.len(), 5);
        assert_eq!(report.rows[0].time_ms, 0.0);
        assert_eq!(report.final_offset(), Some(300.0));
        assert!(report.rows.windows(2).all(|w| w[0].offset <= w[1].offset));
    }

    #[tokio::test]
    async fn test_defective_platform_trace_uses_timers() {
        let report = run_trace(&TraceOptions {
            user_agent: "Mozilla/5.0 (iPad; CPU OS 6_0 like Mac OS X)".to_string(),
            ..options(300.0, 100.0)
        })
        .await
        .unwrap();

        assert_eq!(report.backend, "timer");
        assert_eq!(report.rows.len(), 5);
        assert_eq!(report.final_offset(), Some(300.0));
    }

    #[tokio::test]
    async fn test_forced_timer_mode() {
        let report = run_trace(&TraceOptions {
            frames: FrameMode::Timer,
            ..options(100.0, 60.0)
        })
        .await
        .unwrap();
        assert_eq!(report.backend, "timer");
        assert_eq!(report.outcomes, vec![RunOutcome::Completed]);
    }

    #[tokio::test]
    async fn test_supersede_cancels_first_run() {
        let report = run_trace(&TraceOptions {
            supersede: Some(Supersede { at_ms: 32.0, to: 0.0 }),
            ..options(300.0, 200.0)
        })
        .await
        .unwrap();

        assert_eq!(
            report.outcomes,
            vec![RunOutcome::Cancelled, RunOutcome::Completed]
        );
        assert!(report.rows.iter().any(|row| row.run == 1));
        assert!(report.rows.iter().any(|row| row.run == 2));
        // Nothing from the first run is written after the second starts
        let first_of_second = report.rows.iter().position(|row| row.run == 2).unwrap();
        assert!(report.rows[first_of_second..].iter().all(|row| row.run == 2));
        assert_eq!(report.final_offset(), Some(0.0));
    }

    #[tokio::test]
    async fn test_zero_duration_jumps() {
        let report = run_trace(&TraceOptions {
            from: 40.0,
            ..options(120.0, 0.0)
        })
        .await
        .unwrap();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.final_offset(), Some(120.0));
        assert_eq!(report.outcomes, vec![RunOutcome::Completed]);
    }

    #[tokio::test]
    async fn test_non_finite_target_errors() {
        let result = run_trace(&options(f64::NAN, 100.0)).await;
        assert!(matches!(result, Err(Error::Other(_))));
    }

    #[tokio::test]
    async fn test_report_json() {
        let report = run_trace(&options(50.0, 40.0)).await.unwrap();
        let json = report.to_json().unwrap();
        assert!(json.contains("\"backend\": \"requestAnimationFrame\""));
        assert!(json.contains("\"completed\""));
    }
}
