//! L3 Molecular Layer: Scroll-progress tracker
//!
//! Maps the scroll offset, relative to a target element's bounds, onto a
//! normalized progress value in [0, 1]. The input range is two anchors, each
//! an (element edge, viewport fraction) pair: `(Top, 0.8) -> (Bottom, 0.2)`
//! reads "from when the element's top reaches 80% of the viewport height
//! until its bottom reaches 20%".

use super::geometry::{Bounds, Viewport};
use super::lifecycle::{Listener, ListenerKind, ListenerRegistry};

/// Edge of the tracked element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Center,
    Bottom,
}

impl Edge {
    fn factor(&self) -> f64 {
        match self {
            Edge::Top => 0.0,
            Edge::Center => 0.5,
            Edge::Bottom => 1.0,
        }
    }
}

/// The moment an element edge meets a fraction of the viewport height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub edge: Edge,
    pub viewport: f64,
}

impl Anchor {
    pub const fn new(edge: Edge, viewport: f64) -> Self {
        Self { edge, viewport }
    }

    /// Scroll offset at which this anchor is reached
    pub fn scroll_offset(&self, bounds: &Bounds, viewport: &Viewport) -> f64 {
        bounds.top + self.edge.factor() * bounds.height - self.viewport * viewport.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRange {
    pub start: Anchor,
    pub end: Anchor,
}

impl ScrollRange {
    pub const fn new(start: Anchor, end: Anchor) -> Self {
        Self { start, end }
    }

    /// Scroll offsets of the start and end anchors
    pub fn offsets(&self, bounds: &Bounds, viewport: &Viewport) -> (f64, f64) {
        (
            self.start.scroll_offset(bounds, viewport),
            self.end.scroll_offset(bounds, viewport),
        )
    }

    /// Progress at a scroll offset, clamped to [0, 1].
    ///
    /// A degenerate range (end <= start) is a step at the start offset.
    pub fn map(&self, bounds: &Bounds, viewport: &Viewport, scroll: f64) -> f64 {
        let (start, end) = self.offsets(bounds, viewport);
        if end <= start {
            return if scroll >= start { 1.0 } else { 0.0 };
        }
        ((scroll - start) / (end - start)).clamp(0.0, 1.0)
    }
}

/// Continuously updated progress for one element
#[derive(Debug)]
pub struct ScrollProgress {
    range: ScrollRange,
    target: Option<Bounds>,
    viewport: Viewport,
    scroll: f64,
    progress: f64,
    _listeners: [Listener; 2],
}

impl ScrollProgress {
    pub fn new(registry: &ListenerRegistry, range: ScrollRange, viewport: Viewport) -> Self {
        Self {
            range,
            target: None,
            viewport,
            scroll: 0.0,
            progress: 0.0,
            _listeners: [
                registry.register(ListenerKind::Scroll, "scroll-progress"),
                registry.register(ListenerKind::Resize, "scroll-progress"),
            ],
        }
    }

    /// Attach (or move) the tracked element
    pub fn mount(&mut self, bounds: Bounds) {
        self.target = Some(bounds);
        self.recompute();
    }

    /// Detach the element; progress falls back to the neutral 0
    pub fn unmount(&mut self) {
        self.target = None;
        self.recompute();
    }

    pub fn set_scroll(&mut self, scroll: f64) -> f64 {
        self.scroll = scroll;
        self.recompute()
    }

    /// Viewport height changes the anchor offsets, so resize recomputes too
    pub fn set_viewport(&mut self, viewport: Viewport) -> f64 {
        self.viewport = viewport;
        self.recompute()
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_mounted(&self) -> bool {
        self.target.is_some()
    }

    fn recompute(&mut self) -> f64 {
        self.progress = match &self.target {
            Some(bounds) => self.range.map(bounds, &self.viewport, self.scroll),
            None => 0.0,
        };
        self.progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> ScrollRange {
        ScrollRange::new(Anchor::new(Edge::Top, 0.8), Anchor::new(Edge::Bottom, 0.2))
    }

    #[test]
    fn test_anchor_offsets() {
        let bounds = Bounds::new(1000.0, 400.0);
        let viewport = Viewport::new(80.0, 100.0);
        // Top reaches 80%: 1000 - 80
        // Bottom reaches 20%: 1400 - 20
        assert_eq!(range().offsets(&bounds, &viewport), (920.0, 1380.0));
    }

    #[test]
    fn test_monotonic_and_clamped() {
        let bounds = Bounds::new(1000.0, 400.0);
        let viewport = Viewport::new(80.0, 100.0);
        let range = range();

        assert_eq!(range.map(&bounds, &viewport, 0.0), 0.0);
        assert_eq!(range.map(&bounds, &viewport, 920.0), 0.0);
        assert_eq!(range.map(&bounds, &viewport, 1380.0), 1.0);
        assert_eq!(range.map(&bounds, &viewport, 5000.0), 1.0);

        let mut prev = 0.0;
        let mut scroll = 850.0;
        while scroll < 1500.0 {
            let p = range.map(&bounds, &viewport, scroll);
            assert!((0.0..=1.0).contains(&p));
            assert!(p >= prev);
            prev = p;
            scroll += 7.5;
        }
    }

    #[test]
    fn test_degenerate_range_steps() {
        let range = ScrollRange::new(Anchor::new(Edge::Top, 0.0), Anchor::new(Edge::Top, 0.0));
        let bounds = Bounds::new(50.0, 10.0);
        let viewport = Viewport::new(10.0, 10.0);
        assert_eq!(range.map(&bounds, &viewport, 49.0), 0.0);
        assert_eq!(range.map(&bounds, &viewport, 50.0), 1.0);
    }

    #[test]
    fn test_unmounted_reports_zero() {
        let registry = ListenerRegistry::new();
        let mut tracker = ScrollProgress::new(&registry, range(), Viewport::new(80.0, 100.0));
        assert_eq!(tracker.set_scroll(5000.0), 0.0);

        tracker.mount(Bounds::new(1000.0, 400.0));
        assert_eq!(tracker.progress(), 1.0);

        tracker.unmount();
        assert_eq!(tracker.progress(), 0.0);
    }

    #[test]
    fn test_resize_recomputes() {
        let registry = ListenerRegistry::new();
        let mut tracker = ScrollProgress::new(&registry, range(), Viewport::new(80.0, 100.0));
        tracker.mount(Bounds::new(1000.0, 400.0));
        let before = tracker.set_scroll(1000.0);
        let after = tracker.set_viewport(Viewport::new(80.0, 300.0));
        assert!(after > before);
    }

    #[test]
    fn test_drop_releases_listeners() {
        let registry = ListenerRegistry::new();
        let tracker = ScrollProgress::new(&registry, range(), Viewport::default());
        assert_eq!(registry.count(), 2);
        drop(tracker);
        assert_eq!(registry.count(), 0);
    }
}
