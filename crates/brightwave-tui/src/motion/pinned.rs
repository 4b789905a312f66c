//! L3 Molecular Layer: Pinned horizontal-scroll section
//!
//! While the page scrolls through the pin range the section stays fixed at
//! the viewport top and its inner track translates horizontally. Vertical
//! scroll distance equals horizontal translation distance, so the translation
//! reaches its maximum exactly when the pin range ends.

use super::geometry::Viewport;
use super::lifecycle::{Listener, ListenerKind, ListenerRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinPhase {
    /// Section not reached yet
    Before,
    /// Fixed at the viewport top, track scrubbing
    Pinned,
    /// Released after the track finished
    After,
}

/// Layout of the section at one scroll offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinnedFrame {
    pub phase: PinPhase,
    /// Horizontal track offset, in [-max_translate, 0]
    pub translate_x: f64,
    /// Fraction of the track scrolled, in [0, 1]
    pub progress: f64,
    /// Top of the section relative to the viewport
    pub top: f64,
}

#[derive(Debug)]
pub struct PinnedSection {
    section_top: f64,
    track_width: f64,
    viewport: Viewport,
    max_translate: f64,
    phase: Option<PinPhase>,
    _listeners: [Listener; 2],
}

impl PinnedSection {
    pub fn new(registry: &ListenerRegistry, section_top: f64, track_width: f64, viewport: Viewport) -> Self {
        let mut section = Self {
            section_top,
            track_width,
            viewport,
            max_translate: 0.0,
            phase: None,
            _listeners: [
                registry.register(ListenerKind::Scroll, "pinned-section"),
                registry.register(ListenerKind::Resize, "pinned-section"),
            ],
        };
        section.recompute();
        section
    }

    fn recompute(&mut self) {
        self.max_translate = (self.track_width - self.viewport.width).max(0.0);
    }

    /// Track content changed width
    pub fn invalidate(&mut self, track_width: f64) {
        self.track_width = track_width;
        self.recompute();
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.recompute();
    }

    pub fn set_section_top(&mut self, section_top: f64) {
        self.section_top = section_top;
    }

    pub fn max_translate(&self) -> f64 {
        self.max_translate
    }

    /// Scroll offsets between which the section is pinned
    pub fn pin_range(&self) -> (f64, f64) {
        (self.section_top, self.section_top + self.max_translate)
    }

    /// Height the section occupies in the document
    pub fn document_height(&self) -> f64 {
        self.viewport.height + self.max_translate
    }

    /// Pure layout at `scroll`
    pub fn frame(&self, scroll: f64) -> PinnedFrame {
        let (start, end) = self.pin_range();

        if scroll < start {
            PinnedFrame {
                phase: PinPhase::Before,
                translate_x: 0.0,
                progress: 0.0,
                top: self.section_top - scroll,
            }
        } else if scroll <= end {
            let travelled = scroll - start;
            let progress = if self.max_translate > 0.0 {
                travelled / self.max_translate
            } else {
                1.0
            };
            PinnedFrame {
                phase: PinPhase::Pinned,
                translate_x: -travelled,
                progress,
                top: 0.0,
            }
        } else {
            PinnedFrame {
                phase: PinPhase::After,
                translate_x: -self.max_translate,
                progress: 1.0,
                top: end - scroll,
            }
        }
    }

    /// Like [`frame`](Self::frame), logging phase transitions
    pub fn update(&mut self, scroll: f64) -> PinnedFrame {
        let frame = self.frame(scroll);
        if self.phase != Some(frame.phase) {
            tracing::debug!(phase = ?frame.phase, scroll, "Pinned section phase changed");
            self.phase = Some(frame.phase);
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(registry: &ListenerRegistry) -> PinnedSection {
        PinnedSection::new(registry, 100.0, 300.0, Viewport::new(80.0, 24.0))
    }

    #[test]
    fn test_ranges() {
        let registry = ListenerRegistry::new();
        let section = section(&registry);
        assert_eq!(section.max_translate(), 220.0);
        assert_eq!(section.pin_range(), (100.0, 320.0));
        assert_eq!(section.document_height(), 244.0);
    }

    #[test]
    fn test_phases() {
        let registry = ListenerRegistry::new();
        let section = section(&registry);

        let before = section.frame(90.0);
        assert_eq!(before.phase, PinPhase::Before);
        assert_eq!(before.top, 10.0);
        assert_eq!(before.translate_x, 0.0);

        let mid = section.frame(210.0);
        assert_eq!(mid.phase, PinPhase::Pinned);
        assert_eq!(mid.top, 0.0);
        assert_eq!(mid.translate_x, -110.0);
        assert!((mid.progress - 0.5).abs() < 1e-9);

        // Translation reaches its maximum exactly at the end of the pin range
        let end = section.frame(320.0);
        assert_eq!(end.phase, PinPhase::Pinned);
        assert_eq!(end.translate_x, -220.0);

        let after = section.frame(330.0);
        assert_eq!(after.phase, PinPhase::After);
        assert_eq!(after.top, -10.0);
        assert_eq!(after.translate_x, -220.0);
    }

    #[test]
    fn test_symmetric_when_scrolling_back() {
        let registry = ListenerRegistry::new();
        let mut section = section(&registry);
        let down: Vec<_> = (0..50).map(|i| section.update(i as f64 * 10.0)).collect();
        let up: Vec<_> = (0..50).rev().map(|i| section.update(i as f64 * 10.0)).collect();
        let up: Vec<_> = up.into_iter().rev().collect();
        assert_eq!(down, up);
    }

    #[test]
    fn test_invalidate_recomputes() {
        let registry = ListenerRegistry::new();
        let mut section = section(&registry);
        section.invalidate(60.0);
        assert_eq!(section.max_translate(), 0.0);
        assert_eq!(section.document_height(), 24.0);

        section.invalidate(200.0);
        section.set_viewport(Viewport::new(100.0, 30.0));
        assert_eq!(section.max_translate(), 100.0);
        assert_eq!(section.frame(1000.0).translate_x, -100.0);
    }

    #[test]
    fn test_drop_releases_listeners() {
        let registry = ListenerRegistry::new();
        let section = section(&registry);
        assert_eq!(registry.count(), 2);
        drop(section);
        assert_eq!(registry.count(), 0);
    }
}
