//! L3 Molecular Layer: Viewport intersection watcher
//!
//! Emits a boolean when an element's visible fraction crosses a threshold.
//! Observation is deferred until the element is mounted, and the watcher's
//! registration is released on unmount, on disconnect (one-shot mode) and on
//! drop.

use super::geometry::{Bounds, Viewport};
use super::lifecycle::{Listener, ListenerKind, ListenerRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserveMode {
    /// Disconnect after the first positive signal (reveal-once, lazy loading)
    Once,
    /// Keep observing and re-trigger when scrolling back
    Continuous,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchConfig {
    /// Visible fraction of the element required to count as visible; 0 means
    /// any overlap
    pub threshold: f64,
    /// Added to both vertical edges of the viewport (negative shrinks it)
    pub margin: f64,
    pub mode: ObserveMode,
}

impl WatchConfig {
    pub fn once(threshold: f64) -> Self {
        Self {
            threshold,
            margin: 0.0,
            mode: ObserveMode::Once,
        }
    }

    pub fn continuous(threshold: f64) -> Self {
        Self {
            threshold,
            margin: 0.0,
            mode: ObserveMode::Continuous,
        }
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }
}

/// Fraction of `bounds` inside the (margin-expanded) viewport at `scroll`
pub fn visible_fraction(bounds: &Bounds, scroll: f64, viewport: &Viewport, margin: f64) -> f64 {
    let view_top = scroll - margin;
    let view_bottom = scroll + viewport.height + margin;
    if view_bottom <= view_top {
        return 0.0;
    }

    if bounds.height <= 0.0 {
        let inside = bounds.top >= view_top && bounds.top < view_bottom;
        return if inside { 1.0 } else { 0.0 };
    }

    let overlap = bounds.bottom().min(view_bottom) - bounds.top.max(view_top);
    (overlap / bounds.height).clamp(0.0, 1.0)
}

#[derive(Debug)]
pub struct IntersectionWatcher {
    config: WatchConfig,
    registry: ListenerRegistry,
    target: Option<Bounds>,
    listener: Option<Listener>,
    visible: bool,
    fired: bool,
}

impl IntersectionWatcher {
    pub fn new(registry: &ListenerRegistry, config: WatchConfig) -> Self {
        Self {
            config,
            registry: registry.clone(),
            target: None,
            listener: None,
            visible: false,
            fired: false,
        }
    }

    /// Start (or move) the observation. A one-shot watcher that already fired
    /// stays disconnected.
    pub fn mount(&mut self, bounds: Bounds) {
        self.target = Some(bounds);
        if self.listener.is_none() && !(self.config.mode == ObserveMode::Once && self.fired) {
            self.listener = Some(
                self.registry
                    .register(ListenerKind::Intersection, "intersection-watcher"),
            );
        }
    }

    /// Stop observing and clear the flag
    pub fn unmount(&mut self) {
        self.target = None;
        self.listener = None;
        self.visible = false;
    }

    /// Re-evaluate; returns `Some(visible)` only when visibility changed
    pub fn update(&mut self, scroll: f64, viewport: &Viewport) -> Option<bool> {
        if self.listener.is_none() {
            return None;
        }
        let bounds = self.target?;

        let fraction = visible_fraction(&bounds, scroll, viewport, self.config.margin);
        let now_visible = if self.config.threshold <= 0.0 {
            fraction > 0.0
        } else {
            fraction >= self.config.threshold
        };

        if now_visible == self.visible {
            return None;
        }

        self.visible = now_visible;
        if now_visible && self.config.mode == ObserveMode::Once {
            self.fired = true;
            self.listener = None;
        }
        Some(now_visible)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_connected(&self) -> bool {
        self.listener.is_some()
    }
}
