//! Motion system for the Brightwave terminal site
//!
//! Scroll-linked and time-driven animation primitives. Every component takes
//! the current instant (or scroll offset) as an argument and registers its
//! event listeners through a [`ListenerRegistry`], so dropping a component
//! releases everything it registered.
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `easing` - Pure easing functions (re-exports `EasingType` from core)
//! - `timing` - Progress and interpolation helpers
//! - `geometry` - Element bounds and viewport size
//! - `lifecycle` - Listener registry and RAII guards
//! - `debounce` - Trailing-edge debounce
//! - `hover` - Rest/active interaction variants
//!
//! ## L3 Molecular Layer
//! - `progress` - Scroll-progress tracker
//! - `viewport` - Intersection watcher
//! - `timeline` - Explicit step timelines
//! - `animator` - Per-subject animation slots
//! - `track` - Looping marquee track
//! - `pinned` - Pinned horizontal-scroll section
//! - `rings` - Rotating rings with velocity boost
//! - `theme_override` - Scoped palette overrides
//! - `scroll` - Smooth page scrolling
//!
//! # Usage
//!
//! ```ignore
//! use brightwave_tui::motion::{ListenerRegistry, LoopingTrack, Direction, TrackOptions};
//!
//! let registry = ListenerRegistry::new();
//! let mut marquee = LoopingTrack::new(&registry, clients, 12.0, Direction::Left, TrackOptions::default());
//!
//! // Each frame
//! let offset = marquee.tick(now, |items| measure(items));
//! ```

// L4 Atomic Layer
pub mod debounce;
pub mod easing;
pub mod geometry;
pub mod hover;
pub mod lifecycle;
pub mod timing;

// L3 Molecular Layer
pub mod animator;
pub mod pinned;
pub mod progress;
pub mod rings;
pub mod scroll;
pub mod theme_override;
pub mod timeline;
pub mod track;
pub mod viewport;

pub use animator::{AnimationHandle, Animator, SubjectId};
pub use debounce::Debouncer;
pub use easing::{EasingType, EasingTypeExt};
pub use geometry::{Bounds, Viewport};
pub use hover::{HoverStyle, Variant};
pub use lifecycle::{Listener, ListenerKind, ListenerRegistry};
pub use pinned::{PinPhase, PinnedFrame, PinnedSection};
pub use progress::{Anchor, Edge, ScrollProgress, ScrollRange};
pub use rings::{Ring, RingCarousel, Spin, VelocityBoost};
pub use scroll::{ScrollConfigExt, SmoothScroll};
pub use theme_override::{OverrideGuard, ThemeStack};
pub use timeline::{Repeat, Timeline, VisualState};
pub use track::{Direction, LoopingTrack, TrackOptions, TrackState};
pub use viewport::{IntersectionWatcher, ObserveMode, WatchConfig};
