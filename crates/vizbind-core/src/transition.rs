// File: crates/vizbind-core/src/transition.rs
// Summary: Bounded-duration attribute interpolation for visual elements.

use std::time::Duration;

use crate::mark::Attributes;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionSpec {
    pub duration: Duration,
    pub delay: Duration,
}

impl TransitionSpec {
    pub const NONE: TransitionSpec = TransitionSpec { duration: Duration::ZERO, delay: Duration::ZERO };

    pub fn millis(duration_ms: u64) -> Self {
        Self { duration: Duration::from_millis(duration_ms), delay: Duration::ZERO }
    }

    pub fn is_instant(&self) -> bool {
        self.duration.is_zero() && self.delay.is_zero()
    }
}

impl Default for TransitionSpec {
    fn default() -> Self {
        Self::millis(1000)
    }
}

/// Linear interpolation from `from` to `to`, starting at `start` on the chart clock.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    from: Attributes,
    to: Attributes,
    start: Duration,
    spec: TransitionSpec,
}

impl Transition {
    pub fn new(from: Attributes, to: Attributes, start: Duration, spec: TransitionSpec) -> Self {
        Self { from, to, start, spec }
    }

    pub fn spec(&self) -> TransitionSpec {
        self.spec
    }

    /// Progress in `[0, 1]` at time `at`.
    pub fn progress(&self, at: Duration) -> f32 {
        let begin = self.start + self.spec.delay;
        if at <= begin {
            return if self.spec.duration.is_zero() && at == begin { 1.0 } else { 0.0 };
        }
        if self.spec.duration.is_zero() {
            return 1.0;
        }
        ((at - begin).as_secs_f64() / self.spec.duration.as_secs_f64()).min(1.0) as f32
    }

    pub fn is_finished(&self, at: Duration) -> bool {
        self.progress(at) >= 1.0
    }

    pub fn sample(&self, at: Duration) -> Attributes {
        let t = self.progress(at);
        if t >= 1.0 {
            self.to.clone()
        } else {
            self.from.lerp(&self.to, t)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mark::Shape;

    fn circle(r: f32) -> Attributes {
        Attributes::new(Shape::Circle { cx: 0.0, cy: 0.0, r })
    }

    #[test]
    fn samples_over_duration() {
        let t = Transition::new(circle(0.0), circle(10.0), Duration::from_millis(100), TransitionSpec::millis(1000));
        assert_eq!(t.sample(Duration::ZERO), circle(0.0));
        assert_eq!(t.sample(Duration::from_millis(600)), circle(5.0));
        // no easing: a quarter of the time covers a quarter of the distance
        assert_eq!(t.sample(Duration::from_millis(350)), circle(2.5));
        assert_eq!(t.sample(Duration::from_secs(5)), circle(10.0));
        assert!(t.is_finished(Duration::from_millis(1100)));
    }

    #[test]
    fn delay_holds_start_value() {
        let spec = TransitionSpec { duration: Duration::from_millis(100), delay: Duration::from_millis(50) };
        let t = Transition::new(circle(0.0), circle(10.0), Duration::ZERO, spec);
        assert_eq!(t.progress(Duration::from_millis(40)), 0.0);
        assert_eq!(t.progress(Duration::from_millis(100)), 0.5);
    }
}
