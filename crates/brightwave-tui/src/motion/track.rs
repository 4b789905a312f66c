//! L3 Molecular Layer: Looping track (marquee) animator
//!
//! Renders consecutive copies of an item sequence and translates the combined
//! track by the span of one copy over `span / speed` seconds, then restarts
//! from offset 0. Copy N+1 is identical to copy N at the wrap point, so the
//! loop is seamless.
//!
//! # Invariants
//! - No translation before a non-zero span is measured; a zero measurement
//!   means layout has not settled and the measurement is retried later.
//! - A resize cancels the running loop at once and re-measures after a
//!   debounced quiet period. At most one loop handle is active at any time.

use std::time::{Duration, Instant};

use super::debounce::Debouncer;
use super::lifecycle::{Listener, ListenerKind, ListenerRegistry};

/// Translation direction of the track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Translate towards -span (content moves left)
    Left,
    /// Translate towards +span (content moves right)
    Right,
}

impl Direction {
    fn sign(&self) -> f64 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackOptions {
    /// Copies of the sequence rendered back to back (at least 2)
    pub copies: usize,
    /// Delay before re-measuring after a zero-span measurement
    pub retry_delay: Duration,
    /// Quiet period after the last resize before re-measuring
    pub resize_debounce: Duration,
}

impl Default for TrackOptions {
    fn default() -> Self {
        Self {
            copies: 2,
            retry_delay: Duration::from_millis(100),
            resize_debounce: Duration::from_millis(150),
        }
    }
}

/// Identifies one run of the loop; a new one is issued on every restart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackState {
    /// Waiting for the first measurement
    Unmeasured,
    /// Layout not settled; measure again at `retry_at`
    Deferred { retry_at: Instant },
    /// Loop cancelled by a resize; waiting for the debounce
    Resizing,
    Running {
        handle: LoopHandle,
        span: f64,
        started: Instant,
    },
}

#[derive(Debug)]
pub struct LoopingTrack<T> {
    items: Vec<T>,
    speed: f64,
    direction: Direction,
    options: TrackOptions,
    state: TrackState,
    debounce: Debouncer,
    registry: ListenerRegistry,
    next_handle: u64,
    reduced_motion: bool,
    _resize: Listener,
    frame: Option<Listener>,
    timer: Option<Listener>,
}

impl<T> LoopingTrack<T> {
    /// `speed` is in length units per second
    pub fn new(
        registry: &ListenerRegistry,
        items: Vec<T>,
        speed: f64,
        direction: Direction,
        options: TrackOptions,
    ) -> Self {
        Self {
            items,
            speed,
            direction,
            options: TrackOptions {
                copies: options.copies.max(2),
                ..options
            },
            state: TrackState::Unmeasured,
            debounce: Debouncer::new(options.resize_debounce),
            registry: registry.clone(),
            next_handle: 0,
            reduced_motion: false,
            _resize: registry.register(ListenerKind::Resize, "looping-track"),
            frame: None,
            timer: None,
        }
    }

    /// Keep the track still (offset 0) while still measuring it
    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The duplicated content: `copies` back-to-back passes over the items
    pub fn track_items(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.options.copies).flat_map(move |_| self.items.iter())
    }

    pub fn copies(&self) -> usize {
        self.options.copies
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn state(&self) -> TrackState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TrackState::Running { .. })
    }

    /// Measured span of one copy while running
    pub fn span(&self) -> Option<f64> {
        match self.state {
            TrackState::Running { span, .. } => Some(span),
            _ => None,
        }
    }

    pub fn handle(&self) -> Option<LoopHandle> {
        match self.state {
            TrackState::Running { handle, .. } => Some(handle),
            _ => None,
        }
    }

    /// Loops currently driving the track: 0 or 1
    pub fn active_handles(&self) -> usize {
        usize::from(self.is_running())
    }

    /// Seconds for one full cycle
    pub fn period(&self) -> Option<f64> {
        self.span()
            .filter(|_| self.speed > 0.0)
            .map(|span| span / self.speed)
    }

    /// Advance the state machine; `measure` returns the span of one copy and
    /// is only called when a measurement is due. Returns the current offset.
    pub fn tick<F>(&mut self, now: Instant, measure: F) -> f64
    where
        F: FnOnce(&[T]) -> f64,
    {
        let due = match self.state {
            TrackState::Unmeasured => true,
            TrackState::Deferred { retry_at } => now >= retry_at,
            TrackState::Resizing => self.debounce.poll(now),
            TrackState::Running { .. } => false,
        };

        if due {
            let span = measure(&self.items);
            self.start(span, now);
        }

        self.offset(now)
    }

    fn start(&mut self, span: f64, now: Instant) {
        if !(span.is_finite() && span > 0.0) {
            let retry_at = now + self.options.retry_delay;
            tracing::debug!(span, "Track layout not settled, retrying measurement");
            self.state = TrackState::Deferred { retry_at };
            self.frame = None;
            self.timer
                .get_or_insert_with(|| self.registry.register(ListenerKind::Timer, "looping-track"));
            return;
        }

        let handle = LoopHandle(self.next_handle);
        self.next_handle += 1;
        self.state = TrackState::Running {
            handle,
            span,
            started: now,
        };
        self.timer = None;
        self.frame
            .get_or_insert_with(|| self.registry.register(ListenerKind::Frame, "looping-track"));
    }

    /// Container resized: cancel the running loop now, re-measure once the
    /// resize burst has been quiet for the debounce period
    pub fn on_resize(&mut self, now: Instant) {
        if let TrackState::Running { handle, .. } = self.state {
            tracing::debug!(handle = handle.0, "Cancelling track loop for resize");
        }
        self.state = TrackState::Resizing;
        self.frame = None;
        self.debounce.trigger(now);
        self.timer
            .get_or_insert_with(|| self.registry.register(ListenerKind::Timer, "looping-track"));
    }

    /// Translation at `now`: `sign * span * phase / period`, reset to 0 at
    /// each restart
    pub fn offset(&self, now: Instant) -> f64 {
        if self.reduced_motion {
            return 0.0;
        }
        match self.state {
            TrackState::Running { span, started, .. } if self.speed > 0.0 => {
                let period = span / self.speed;
                let elapsed = now.saturating_duration_since(started).as_secs_f64();
                let phase = elapsed % period;
                self.direction.sign() * span * (phase / period)
            }
            _ => 0.0,
        }
    }

    /// Completed cycles since the loop started
    pub fn cycles(&self, now: Instant) -> u64 {
        match (self.state, self.period()) {
            (TrackState::Running { started, .. }, Some(period)) => {
                (now.saturating_duration_since(started).as_secs_f64() / period) as u64
            }
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn track(registry: &ListenerRegistry, direction: Direction) -> LoopingTrack<&'static str> {
        LoopingTrack::new(
            registry,
            vec!["alpha", "beta", "gamma"],
            50.0,
            direction,
            TrackOptions::default(),
        )
    }

    #[test]
    fn test_duplicated_content() {
        let registry = ListenerRegistry::new();
        let track = track(&registry, Direction::Left);
        let rendered: Vec<_> = track.track_items().copied().collect();
        assert_eq!(rendered, vec!["alpha", "beta", "gamma", "alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_seamless_wrap() {
        let registry = ListenerRegistry::new();
        let mut track = track(&registry, Direction::Left);
        let t0 = Instant::now();
        track.tick(t0, |_| 200.0);

        // span / speed = 4s
        assert_eq!(track.period(), Some(4.0));
        let start = track.offset(t0);
        let wrapped = track.offset(t0 + Duration::from_secs(4));
        assert_eq!(start, 0.0);
        assert!((wrapped - start).abs() < 1e-6);

        // Halfway through the cycle
        assert!((track.offset(t0 + ms(2000)) + 100.0).abs() < 1e-6);
        assert_eq!(track.cycles(t0 + ms(8500)), 2);
    }

    #[test]
    fn test_direction_is_sign_flip() {
        let registry = ListenerRegistry::new();
        let mut left = track(&registry, Direction::Left);
        let mut right = track(&registry, Direction::Right);
        let t0 = Instant::now();
        left.tick(t0, |_| 200.0);
        right.tick(t0, |_| 200.0);

        let t = t0 + ms(1000);
        assert!((left.offset(t) + right.offset(t)).abs() < 1e-9);
        assert!(right.offset(t) > 0.0);
    }

    #[test]
    fn test_zero_span_defers_and_retries() {
        let registry = ListenerRegistry::new();
        let mut track = track(&registry, Direction::Left);
        let t0 = Instant::now();

        assert_eq!(track.tick(t0, |_| 0.0), 0.0);
        assert!(matches!(track.state(), TrackState::Deferred { .. }));
        assert_eq!(track.active_handles(), 0);
        assert_eq!(registry.count_kind(ListenerKind::Timer), 1);

        // Not yet due: the measure closure must not run
        track.tick(t0 + ms(50), |_| panic!("measured before retry delay"));

        track.tick(t0 + ms(100), |_| 120.0);
        assert_eq!(track.span(), Some(120.0));
        assert_eq!(registry.count_kind(ListenerKind::Timer), 0);
        assert_eq!(registry.count_kind(ListenerKind::Frame), 1);
    }

    #[test]
    fn test_non_finite_span_is_deferred() {
        let registry = ListenerRegistry::new();
        let mut track = track(&registry, Direction::Left);
        track.tick(Instant::now(), |_| f64::NAN);
        assert!(!track.is_running());
    }

    #[test]
    fn test_resize_never_runs_two_loops() {
        let registry = ListenerRegistry::new();
        let mut track = track(&registry, Direction::Left);
        let t0 = Instant::now();
        track.tick(t0, |_| 200.0);
        let first = track.handle().unwrap();

        // Drag-resize burst
        for i in 0..5 {
            track.on_resize(t0 + ms(1000 + i * 30));
            assert_eq!(track.active_handles(), 0);
            assert_eq!(track.tick(t0 + ms(1010 + i * 30), |_| panic!("measured mid-burst")), 0.0);
        }

        let settled = t0 + ms(1120 + 150);
        track.tick(settled, |_| 300.0);
        assert_eq!(track.active_handles(), 1);
        assert_eq!(track.span(), Some(300.0));
        assert_ne!(track.handle(), Some(first));
        assert_eq!(registry.count_kind(ListenerKind::Frame), 1);
        // Fresh loop restarts from 0
        assert_eq!(track.offset(settled), 0.0);
    }

    #[test]
    fn test_drop_releases_everything() {
        let registry = ListenerRegistry::new();
        let mut track = track(&registry, Direction::Left);
        track.tick(Instant::now(), |_| 0.0);
        assert_eq!(registry.count(), 2);
        drop(track);
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_reduced_motion_holds_still() {
        let registry = ListenerRegistry::new();
        let mut track = track(&registry, Direction::Left).with_reduced_motion(true);
        let t0 = Instant::now();
        track.tick(t0, |_| 200.0);
        assert!(track.is_running());
        assert_eq!(track.offset(t0 + ms(1500)), 0.0);
    }
}
