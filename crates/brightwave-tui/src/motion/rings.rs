//! L3 Molecular Layer: Rotating rings with scroll-velocity boost
//!
//! Concentric rings of items rotate at their own base speed and direction.
//! Fast scrolling raises a shared speed multiplier, which then decays back
//! to 1x along the configured curve.

use std::time::Instant;

use brightwave_core::config::RingsConfig;
use brightwave_core::DecayCurve;

use super::lifecycle::{Listener, ListenerKind, ListenerRegistry};
use super::timing::seconds_between;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spin {
    Clockwise,
    CounterClockwise,
}

impl Spin {
    fn sign(&self) -> f64 {
        match self {
            Spin::Clockwise => 1.0,
            Spin::CounterClockwise => -1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ring {
    pub items: Vec<String>,
    /// Degrees per second at 1x
    pub base_speed: f64,
    pub spin: Spin,
    angle: f64,
}

impl Ring {
    pub fn new<I, S>(items: I, base_speed: f64, spin: Spin) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            base_speed,
            spin,
            angle: 0.0,
        }
    }

    /// Current rotation in [0, 360)
    pub fn angle(&self) -> f64 {
        self.angle
    }

    fn advance(&mut self, dt: f64, multiplier: f64) {
        self.angle = (self.angle + self.spin.sign() * self.base_speed * multiplier * dt).rem_euclid(360.0);
    }

    /// Items with their angular position, evenly spaced around the ring
    pub fn item_angles(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        let step = 360.0 / self.items.len().max(1) as f64;
        self.items
            .iter()
            .enumerate()
            .map(move |(i, item)| (item.as_str(), (self.angle + step * i as f64).rem_euclid(360.0)))
    }
}

/// Speed multiplier driven by scroll velocity
#[derive(Debug, Clone)]
pub struct VelocityBoost {
    gain: f64,
    max: f64,
    decay: DecayCurve,
    multiplier: f64,
    last_scroll: Option<(f64, Instant)>,
}

impl VelocityBoost {
    pub fn new(config: &RingsConfig) -> Self {
        Self {
            gain: config.gain,
            max: config.max_multiplier.max(1.0),
            decay: config.decay,
            multiplier: 1.0,
            last_scroll: None,
        }
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Feed a scroll position; velocity is taken from the previous sample
    pub fn on_scroll(&mut self, scroll: f64, now: Instant) {
        if let Some((last, at)) = self.last_scroll {
            let dt = seconds_between(at, now);
            if dt > 0.0 {
                let velocity = (scroll - last).abs() / dt;
                let boosted = (1.0 + self.gain * velocity).min(self.max);
                self.multiplier = self.multiplier.max(boosted);
            }
        }
        self.last_scroll = Some((scroll, now));
    }

    /// Relax towards 1x over `dt` seconds
    pub fn decay(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }
        let excess = self.multiplier - 1.0;
        let remaining = match self.decay {
            DecayCurve::Exponential { half_life_ms } => {
                if half_life_ms == 0 {
                    0.0
                } else {
                    excess * 0.5_f64.powf(dt * 1000.0 / half_life_ms as f64)
                }
            }
            DecayCurve::Linear { per_second } => (excess - per_second * dt).max(0.0),
        };
        self.multiplier = 1.0 + remaining.max(0.0);
    }
}

#[derive(Debug)]
pub struct RingCarousel {
    rings: Vec<Ring>,
    boost: VelocityBoost,
    last_tick: Option<Instant>,
    reduced_motion: bool,
    _listeners: [Listener; 2],
}

impl RingCarousel {
    pub fn new(registry: &ListenerRegistry, rings: Vec<Ring>, config: &RingsConfig) -> Self {
        Self {
            rings,
            boost: VelocityBoost::new(config),
            last_tick: None,
            reduced_motion: false,
            _listeners: [
                registry.register(ListenerKind::Scroll, "ring-carousel"),
                registry.register(ListenerKind::Frame, "ring-carousel"),
            ],
        }
    }

    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn multiplier(&self) -> f64 {
        self.boost.multiplier()
    }

    pub fn on_scroll(&mut self, scroll: f64, now: Instant) {
        self.boost.on_scroll(scroll, now);
    }

    /// Rotate every ring by the time elapsed since the previous tick
    pub fn tick(&mut self, now: Instant) {
        let dt = self
            .last_tick
            .map(|last| seconds_between(last, now))
            .unwrap_or(0.0);
        self.last_tick = Some(now);

        if !self.reduced_motion {
            let multiplier = self.boost.multiplier();
            for ring in &mut self.rings {
                ring.advance(dt, multiplier);
            }
        }
        self.boost.decay(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(decay: DecayCurve) -> RingsConfig {
        RingsConfig {
            gain: 0.02,
            max_multiplier: 4.0,
            decay,
        }
    }

    #[test]
    fn test_boost_is_capped() {
        let mut boost = VelocityBoost::new(&config(DecayCurve::default()));
        let t0 = Instant::now();
        boost.on_scroll(0.0, t0);
        assert_eq!(boost.multiplier(), 1.0);

        boost.on_scroll(1000.0, t0 + Duration::from_millis(100));
        assert_eq!(boost.multiplier(), 4.0);
    }

    #[test]
    fn test_boost_proportional_to_velocity() {
        let mut boost = VelocityBoost::new(&config(DecayCurve::default()));
        let t0 = Instant::now();
        boost.on_scroll(0.0, t0);
        // 50 rows/s
        boost.on_scroll(50.0, t0 + Duration::from_secs(1));
        assert!((boost.multiplier() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_exponential_decay() {
        let mut boost = VelocityBoost::new(&config(DecayCurve::Exponential { half_life_ms: 350 }));
        let t0 = Instant::now();
        boost.on_scroll(0.0, t0);
        boost.on_scroll(1000.0, t0 + Duration::from_millis(100));

        boost.decay(0.35);
        assert!((boost.multiplier() - 2.5).abs() < 1e-9);
        boost.decay(10.0);
        assert!((boost.multiplier() - 1.0).abs() < 1e-6);
        assert!(boost.multiplier() >= 1.0);
    }

    #[test]
    fn test_linear_decay() {
        let mut boost = VelocityBoost::new(&config(DecayCurve::Linear { per_second: 2.0 }));
        let t0 = Instant::now();
        boost.on_scroll(0.0, t0);
        boost.on_scroll(1000.0, t0 + Duration::from_millis(100));

        boost.decay(1.0);
        assert!((boost.multiplier() - 2.0).abs() < 1e-9);
        boost.decay(1.0);
        assert_eq!(boost.multiplier(), 1.0);
        boost.decay(1.0);
        assert_eq!(boost.multiplier(), 1.0);
    }

    #[test]
    fn test_rings_rotate_with_direction() {
        let registry = ListenerRegistry::new();
        let rings = vec![
            Ring::new(["a", "b", "c", "d"], 90.0, Spin::Clockwise),
            Ring::new(["e", "f"], 90.0, Spin::CounterClockwise),
        ];
        let mut carousel = RingCarousel::new(&registry, rings, &config(DecayCurve::default()));
        let t0 = Instant::now();
        carousel.tick(t0);
        carousel.tick(t0 + Duration::from_secs(1));

        assert!((carousel.rings()[0].angle() - 90.0).abs() < 1e-9);
        assert!((carousel.rings()[1].angle() - 270.0).abs() < 1e-9);

        let angles: Vec<f64> = carousel.rings()[0].item_angles().map(|(_, a)| a).collect();
        assert_eq!(angles, vec![90.0, 180.0, 270.0, 0.0]);
    }

    #[test]
    fn test_reduced_motion_stands_still() {
        let registry = ListenerRegistry::new();
        let rings = vec![Ring::new(["a"], 90.0, Spin::Clockwise)];
        let mut carousel =
            RingCarousel::new(&registry, rings, &config(DecayCurve::default())).with_reduced_motion(true);
        let t0 = Instant::now();
        carousel.tick(t0);
        carousel.tick(t0 + Duration::from_secs(3));
        assert_eq!(carousel.rings()[0].angle(), 0.0);
    }

    #[test]
    fn test_drop_releases_listeners() {
        let registry = ListenerRegistry::new();
        let carousel = RingCarousel::new(&registry, Vec::new(), &config(DecayCurve::default()));
        assert_eq!(registry.count(), 2);
        drop(carousel);
        assert_eq!(registry.count(), 0);
    }
}
