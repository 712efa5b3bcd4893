//! Easing curves for scroll animations
//!
//! Every curve uses the four-argument form `(elapsed, start, delta, duration)`
//! and returns the absolute scroll offset for that point in time, so a curve
//! can be handed straight to the animator without normalizing first.

use std::fmt;
use std::rc::Rc;

use crate::config::EasingKind;

/// A shared easing curve: `(elapsed, start, delta, duration) -> offset`
#[derive(Clone)]
pub struct Easing(Rc<dyn Fn(f64, f64, f64, f64) -> f64>);

impl Easing {
    pub fn new(curve: impl Fn(f64, f64, f64, f64) -> f64 + 'static) -> Self {
        Self(Rc::new(curve))
    }

    #[inline]
    pub fn apply(&self, elapsed: f64, start: f64, delta: f64, duration: f64) -> f64 {
        (self.0)(elapsed, start, delta, duration)
    }
}

impl Default for Easing {
    fn default() -> Self {
        Easing::new(ease_in_out_quad)
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Easing(..)")
    }
}

impl From<EasingKind> for Easing {
    fn from(kind: EasingKind) -> Self {
        match kind {
            EasingKind::Linear => Easing::new(linear),
            EasingKind::Quad => Easing::new(ease_in_out_quad),
            EasingKind::Cubic => Easing::new(cubic_ease_out),
            EasingKind::Quintic => Easing::new(quintic_ease_out),
            EasingKind::EaseOut => Easing::new(exponential_ease_out),
        }
    }
}

/// Quadratic ease-in-out, the animator's default curve
///
/// Accelerates over the first half of `duration` and decelerates over the
/// second, landing on `start + delta` at `elapsed == duration`.
pub fn ease_in_out_quad(elapsed: f64, start: f64, delta: f64, duration: f64) -> f64 {
    let mut t = elapsed / (duration / 2.0);
    if t < 1.0 {
        return delta / 2.0 * t * t + start;
    }
    t -= 1.0;
    -delta / 2.0 * (t * (t - 2.0) - 1.0) + start
}

pub fn linear(elapsed: f64, start: f64, delta: f64, duration: f64) -> f64 {
    start + delta * progress(elapsed, duration)
}

/// Cubic ease-out: f(t) = 1 - (1-t)³
pub fn cubic_ease_out(elapsed: f64, start: f64, delta: f64, duration: f64) -> f64 {
    let inv = 1.0 - progress(elapsed, duration);
    start + delta * (1.0 - inv * inv * inv)
}

/// Quintic ease-out: f(t) = 1 - (1-t)⁵
pub fn quintic_ease_out(elapsed: f64, start: f64, delta: f64, duration: f64) -> f64 {
    let inv = 1.0 - progress(elapsed, duration);
    start + delta * (1.0 - inv * inv * inv * inv * inv)
}

/// Exponential ease-out: f(t) = 1 - 2^(-10t)
pub fn exponential_ease_out(elapsed: f64, start: f64, delta: f64, duration: f64) -> f64 {
    let t = progress(elapsed, duration);
    if t >= 1.0 {
        start + delta
    } else {
        start + delta * (1.0 - 2.0_f64.powf(-10.0 * t))
    }
}

/// Normalized progress clamped to [0, 1]
#[inline]
fn progress(elapsed: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return 1.0;
    }
    (elapsed / duration).clamp(0.0, 1.0)
}
