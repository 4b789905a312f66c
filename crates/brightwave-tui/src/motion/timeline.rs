//! L3 Molecular Layer: Explicit animation timelines
//!
//! A timeline is a finite list of `(target, duration, easing)` steps run by
//! one interpreter, [`Timeline::sample`]. Sampling is a pure function of the
//! elapsed time (time-driven playback) or of a progress scalar (scrubbing),
//! so a running animation never hides state in a mutable chain.

use std::time::Duration;

use super::easing::{EasingType, EasingTypeExt};
use super::timing::lerp;

/// Presentation transform of one animated subject
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub opacity: f64,
    /// Degrees
    pub rotation: f64,
}

impl VisualState {
    pub const IDENTITY: VisualState = VisualState {
        x: 0.0,
        y: 0.0,
        scale: 1.0,
        opacity: 1.0,
        rotation: 0.0,
    };

    pub fn with_x(mut self, x: f64) -> Self {
        self.x = x;
        self
    }

    pub fn with_y(mut self, y: f64) -> Self {
        self.y = y;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Property-wise linear interpolation
    pub fn lerp(&self, to: &VisualState, t: f64) -> VisualState {
        VisualState {
            x: lerp(self.x, to.x, t),
            y: lerp(self.y, to.y, t),
            scale: lerp(self.scale, to.scale, t),
            opacity: lerp(self.opacity, to.opacity, t),
            rotation: lerp(self.rotation, to.rotation, t),
        }
    }

    /// Close enough to be visually identical
    pub fn approx_eq(&self, other: &VisualState, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.scale - other.scale).abs() <= epsilon
            && (self.opacity - other.opacity).abs() <= epsilon
            && (self.rotation - other.rotation).abs() <= epsilon
    }
}

impl Default for VisualState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub target: VisualState,
    pub duration: Duration,
    pub easing: EasingType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Once,
    Times(u32),
    Infinite,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    from: VisualState,
    steps: Vec<Step>,
    repeat: Repeat,
}

impl Timeline {
    pub fn new(from: VisualState) -> Self {
        Self {
            from,
            steps: Vec::new(),
            repeat: Repeat::Once,
        }
    }

    /// Append a step towards `target`
    pub fn to(mut self, target: VisualState, duration: Duration, easing: EasingType) -> Self {
        self.steps.push(Step {
            target,
            duration,
            easing,
        });
        self
    }

    /// Stay at the current end state for `duration` (a delay)
    pub fn hold(self, duration: Duration) -> Self {
        let target = self.end_state();
        self.to(target, duration, EasingType::Linear)
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// Append a return step to the initial state if the last step ends
    /// elsewhere, so the wrap-around of a repeating timeline has no jump
    pub fn seamless(self, duration: Duration, easing: EasingType) -> Self {
        if self.end_state().approx_eq(&self.from, 1e-9) {
            self
        } else {
            let from = self.from;
            self.to(from, duration, easing)
        }
    }

    pub fn from_state(&self) -> VisualState {
        self.from
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn repeat_mode(&self) -> Repeat {
        self.repeat
    }

    /// State after the last step
    pub fn end_state(&self) -> VisualState {
        self.steps.last().map(|s| s.target).unwrap_or(self.from)
    }

    /// Duration of one pass through the steps
    pub fn iteration_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    /// Total playback time; `None` when repeating forever
    pub fn total_duration(&self) -> Option<Duration> {
        let iteration = self.iteration_duration();
        match self.repeat {
            Repeat::Once => Some(iteration),
            Repeat::Times(n) => Some(iteration * n.max(1)),
            Repeat::Infinite => None,
        }
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        match self.total_duration() {
            Some(total) => elapsed >= total,
            None => false,
        }
    }

    /// Time-driven sample
    pub fn sample(&self, elapsed: Duration) -> VisualState {
        let iteration = self.iteration_duration().as_secs_f64();
        if self.steps.is_empty() || iteration <= 0.0 {
            return self.end_state();
        }
        if self.is_finished(elapsed) {
            return self.end_state();
        }

        let local = elapsed.as_secs_f64() % iteration;
        self.sample_within(local)
    }

    /// Scrubbed sample: position is a pure function of `progress` in [0, 1]
    /// over one iteration
    pub fn sample_progress(&self, progress: f64) -> VisualState {
        let iteration = self.iteration_duration().as_secs_f64();
        if self.steps.is_empty() || iteration <= 0.0 {
            return if progress >= 1.0 { self.end_state() } else { self.from };
        }
        let progress = progress.clamp(0.0, 1.0);
        if progress >= 1.0 {
            return self.end_state();
        }
        self.sample_within(iteration * progress)
    }

    /// Interpret the steps at `local` seconds into one iteration
    fn sample_within(&self, mut local: f64) -> VisualState {
        let mut state = self.from;
        for step in &self.steps {
            let duration = step.duration.as_secs_f64();
            if local < duration {
                let t = step.easing.apply(local / duration);
                return state.lerp(&step.target, t);
            }
            local -= duration;
            state = step.target;
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn fade_in() -> Timeline {
        Timeline::new(VisualState::IDENTITY.with_opacity(0.0).with_y(4.0)).to(
            VisualState::IDENTITY,
            ms(400),
            EasingType::Linear,
        )
    }

    #[test]
    fn test_time_driven_interpolation() {
        let timeline = fade_in();
        let mid = timeline.sample(ms(100));
        assert!((mid.opacity - 0.25).abs() < 1e-9);
        assert!((mid.y - 3.0).abs() < 1e-9);
        assert_eq!(timeline.sample(ms(400)), VisualState::IDENTITY);
        assert_eq!(timeline.sample(ms(10_000)), VisualState::IDENTITY);
        assert!(timeline.is_finished(ms(400)));
    }

    #[test]
    fn test_eased_domain() {
        let timeline = Timeline::new(VisualState::IDENTITY.with_x(0.0)).to(
            VisualState::IDENTITY.with_x(100.0),
            ms(1000),
            EasingType::Cubic,
        );
        let x = timeline.sample(ms(500)).x;
        assert!((x - 87.5).abs() < 1e-9);
    }

    #[test]
    fn test_sequential_steps_and_hold() {
        let timeline = Timeline::new(VisualState::IDENTITY.with_x(0.0))
            .hold(ms(200))
            .to(VisualState::IDENTITY.with_x(10.0), ms(100), EasingType::Linear)
            .to(VisualState::IDENTITY.with_x(10.0).with_scale(2.0), ms(100), EasingType::Linear);

        assert_eq!(timeline.iteration_duration(), ms(400));
        assert_eq!(timeline.sample(ms(150)).x, 0.0);
        assert!((timeline.sample(ms(250)).x - 5.0).abs() < 1e-9);
        assert!((timeline.sample(ms(350)).scale - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_seamless_infinite_loop() {
        let timeline = Timeline::new(VisualState::IDENTITY)
            .to(VisualState::IDENTITY.with_rotation(15.0), ms(300), EasingType::SineInOut)
            .seamless(ms(300), EasingType::SineInOut)
            .repeat(Repeat::Infinite);

        let period = timeline.iteration_duration();
        assert_eq!(period, ms(600));
        assert!(timeline.sample(period).approx_eq(&timeline.sample(Duration::ZERO), 1e-9));
        assert!(timeline.sample(period * 3).approx_eq(&timeline.sample(Duration::ZERO), 1e-9));
        // Just before the wrap the state is already back near the start
        assert!(timeline.sample(ms(599)).rotation < 0.01);
        assert!(!timeline.is_finished(ms(1_000_000)));
    }

    #[test]
    fn test_seamless_is_noop_when_closed() {
        let closed = Timeline::new(VisualState::IDENTITY)
            .to(VisualState::IDENTITY.with_x(1.0), ms(100), EasingType::Linear)
            .to(VisualState::IDENTITY, ms(100), EasingType::Linear);
        let again = closed.clone().seamless(ms(500), EasingType::Linear);
        assert_eq!(again.steps().len(), 2);
    }

    #[test]
    fn test_repeat_times() {
        let timeline = fade_in().repeat(Repeat::Times(2));
        assert_eq!(timeline.total_duration(), Some(ms(800)));
        assert!((timeline.sample(ms(500)).opacity - 0.25).abs() < 1e-9);
        assert_eq!(timeline.sample(ms(800)), VisualState::IDENTITY);
    }

    #[test]
    fn test_scrub_is_pure_in_progress() {
        let timeline = fade_in();
        assert_eq!(timeline.sample_progress(0.0), timeline.from_state());
        assert!((timeline.sample_progress(0.5).opacity - 0.5).abs() < 1e-9);
        assert_eq!(timeline.sample_progress(1.0), VisualState::IDENTITY);
        assert_eq!(timeline.sample_progress(2.0), VisualState::IDENTITY);
        assert_eq!(timeline.sample_progress(0.3), timeline.sample_progress(0.3));
    }

    #[test]
    fn test_empty_timeline() {
        let timeline = Timeline::new(VisualState::IDENTITY.with_x(3.0));
        assert_eq!(timeline.sample(ms(50)).x, 3.0);
        assert_eq!(timeline.sample_progress(0.5).x, 3.0);
    }
}
