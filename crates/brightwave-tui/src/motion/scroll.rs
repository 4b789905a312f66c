//! L3 Molecular Layer: Smooth page scrolling
//!
//! Eases the page scroll offset towards its target. Rapid scroll events are
//! accumulated and applied on the next update, so a burst of wheel ticks
//! becomes one animation towards the combined target.

use std::time::{Duration, Instant};

pub use brightwave_core::ScrollConfig;

use super::easing::{EasingType, EasingTypeExt};
use super::timing::{is_complete, lerp_u16, progress};

/// Extension trait for ScrollConfig with utility methods
pub trait ScrollConfigExt {
    fn animation_duration(&self) -> Duration;

    /// Frame interval while an animation runs
    fn animation_tick_duration(&self) -> Duration;

    fn is_smooth(&self) -> bool;
}

impl ScrollConfigExt for ScrollConfig {
    #[inline]
    fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    #[inline]
    fn animation_tick_duration(&self) -> Duration {
        if self.animation_fps == 0 {
            Duration::from_millis(16)
        } else {
            Duration::from_millis(1000 / self.animation_fps as u64)
        }
    }

    #[inline]
    fn is_smooth(&self) -> bool {
        self.smooth_enabled && self.animation_duration_ms > 0
    }
}

#[derive(Debug, Clone)]
struct ActiveScroll {
    start: Instant,
    from: u16,
    to: u16,
    duration: Duration,
    easing: EasingType,
}

/// Page scroll controller
///
/// Queue movement with `scroll_by` / `scroll_to`, then call `update` each
/// frame to get the interpolated offset.
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    animation: Option<ActiveScroll>,
    config: ScrollConfig,
    current: u16,
    pending_delta: i32,
    reduced_motion: bool,
}

impl Default for SmoothScroll {
    fn default() -> Self {
        Self::new(ScrollConfig::default())
    }
}

impl SmoothScroll {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            animation: None,
            config,
            current: 0,
            pending_delta: 0,
            reduced_motion: false,
        }
    }

    /// Reduced motion forces instant scrolling
    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    fn is_smooth(&self) -> bool {
        self.config.is_smooth() && !self.reduced_motion
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Pending work that needs the fast frame rate
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.animation.is_some() || self.pending_delta != 0
    }

    /// Final position once the current animation completes
    pub fn target(&self) -> u16 {
        self.animation
            .as_ref()
            .map(|a| a.to)
            .unwrap_or(self.current)
    }

    #[inline]
    pub fn current(&self) -> u16 {
        self.current
    }

    /// Jump without animating
    pub fn set(&mut self, scroll: u16) {
        self.animation = None;
        self.current = scroll;
        self.pending_delta = 0;
    }

    pub fn scroll_to(&mut self, target: u16, max_scroll: u16, now: Instant) {
        let target = target.min(max_scroll);
        self.pending_delta = 0;

        if !self.is_smooth() || target == self.current {
            self.current = target;
            self.animation = None;
            return;
        }

        self.animation = Some(ActiveScroll {
            start: now,
            from: self.current,
            to: target,
            duration: self.config.animation_duration(),
            easing: self.config.easing,
        });
    }

    /// Positive scrolls down
    pub fn scroll_by(&mut self, delta: i32, max_scroll: u16) {
        if !self.is_smooth() {
            self.current = (self.current as i32 + delta).clamp(0, max_scroll as i32) as u16;
            self.animation = None;
            return;
        }
        self.pending_delta += delta;
    }

    pub fn scroll_down(&mut self, max_scroll: u16) {
        self.scroll_by(self.config.scroll_lines.max(1) as i32, max_scroll);
    }

    pub fn scroll_up(&mut self, max_scroll: u16) {
        self.scroll_by(-(self.config.scroll_lines.max(1) as i32), max_scroll);
    }

    pub fn page_down(&mut self, viewport_height: u16, max_scroll: u16) {
        self.scroll_by(viewport_height.saturating_sub(2).max(1) as i32, max_scroll);
    }

    pub fn page_up(&mut self, viewport_height: u16, max_scroll: u16) {
        self.scroll_by(-(viewport_height.saturating_sub(2).max(1) as i32), max_scroll);
    }

    /// Advance and return the current offset
    pub fn update(&mut self, max_scroll: u16, now: Instant) -> u16 {
        if self.pending_delta != 0 {
            let new_target =
                (self.target() as i32 + self.pending_delta).clamp(0, max_scroll as i32) as u16;
            self.pending_delta = 0;

            if new_target != self.current {
                self.animation = Some(ActiveScroll {
                    start: now,
                    from: self.current,
                    to: new_target,
                    duration: self.config.animation_duration(),
                    easing: self.config.easing,
                });
            } else {
                self.animation = None;
            }
        }

        if let Some(anim) = &self.animation {
            if is_complete(anim.start, anim.duration, now) {
                self.current = anim.to.min(max_scroll);
                self.animation = None;
            } else {
                let t = anim.easing.apply(progress(anim.start, anim.duration, now));
                self.current = lerp_u16(anim.from, anim.to, t).min(max_scroll);
            }
        }

        self.current = self.current.min(max_scroll);
        self.current
    }

    pub fn cancel(&mut self) {
        self.animation = None;
        self.pending_delta = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smooth(duration_ms: u64) -> SmoothScroll {
        SmoothScroll::new(ScrollConfig {
            smooth_enabled: true,
            animation_duration_ms: duration_ms,
            easing: EasingType::Linear,
            ..Default::default()
        })
    }

    #[test]
    fn test_instant_scroll_when_disabled() {
        let mut scroll = SmoothScroll::new(ScrollConfig {
            smooth_enabled: false,
            ..Default::default()
        });
        scroll.scroll_to(100, 200, Instant::now());
        assert_eq!(scroll.current(), 100);
        assert!(!scroll.is_animating());
    }

    #[test]
    fn test_reduced_motion_is_instant() {
        let mut scroll = smooth(100).with_reduced_motion(true);
        scroll.scroll_by(10, 200);
        assert_eq!(scroll.current(), 10);
        assert!(!scroll.needs_update());
    }

    #[test]
    fn test_scroll_by_batching() {
        let mut scroll = smooth(100);
        let now = Instant::now();
        scroll.scroll_by(10, 200);
        scroll.scroll_by(10, 200);
        scroll.scroll_by(10, 200);
        assert!(scroll.needs_update());

        scroll.update(200, now);
        assert_eq!(scroll.target(), 30);
        assert_eq!(scroll.current(), 0);

        assert_eq!(scroll.update(200, now + Duration::from_millis(50)), 15);
        assert_eq!(scroll.update(200, now + Duration::from_millis(100)), 30);
        assert!(!scroll.is_animating());
    }

    #[test]
    fn test_scroll_clamp_max() {
        let mut scroll = smooth(100);
        let now = Instant::now();
        scroll.set(50);
        scroll.scroll_to(300, 100, now);
        assert_eq!(scroll.target(), 100);
        scroll.update(100, now + Duration::from_secs(1));
        assert_eq!(scroll.current(), 100);
    }

    #[test]
    fn test_tick_duration() {
        let config = ScrollConfig {
            animation_fps: 0,
            ..Default::default()
        };
        assert_eq!(config.animation_tick_duration(), Duration::from_millis(16));
    }
}
