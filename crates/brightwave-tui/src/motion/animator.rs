//! L3 Molecular Layer: Per-subject animation slots
//!
//! Each mounted subject has at most one active animation. Starting a new one
//! cancels the previous handle before any write from the new timeline, and
//! unmounting a subject cancels its animation before the subject is released,
//! so nothing writes to a detached subject.

use std::collections::BTreeMap;
use std::time::Instant;

use super::lifecycle::{Listener, ListenerKind, ListenerRegistry};
use super::timeline::{Timeline, VisualState};

/// Identifies a mounted subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubjectId(u64);

/// Opaque handle to a running interpolation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationHandle {
    id: u64,
    subject: SubjectId,
}

impl AnimationHandle {
    pub fn subject(&self) -> SubjectId {
        self.subject
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Playback {
    /// Driven by wall-clock time since `started`
    Time { started: Instant },
    /// Driven by a progress scalar
    Scrub { progress: f64 },
}

#[derive(Debug)]
struct Active {
    handle: AnimationHandle,
    timeline: Timeline,
    playback: Playback,
}

#[derive(Debug)]
struct Subject {
    state: VisualState,
    active: Option<Active>,
}

#[derive(Debug)]
pub struct Animator {
    registry: ListenerRegistry,
    subjects: BTreeMap<SubjectId, Subject>,
    next_subject: u64,
    next_handle: u64,
    /// Frame listener, held only while a time-driven animation runs
    frame: Option<Listener>,
    reduced_motion: bool,
    cancelled: u64,
}

impl Animator {
    pub fn new(registry: &ListenerRegistry) -> Self {
        Self {
            registry: registry.clone(),
            subjects: BTreeMap::new(),
            next_subject: 0,
            next_handle: 0,
            frame: None,
            reduced_motion: false,
            cancelled: 0,
        }
    }

    /// Jump every animation straight to its end state
    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    pub fn mount(&mut self, initial: VisualState) -> SubjectId {
        let id = SubjectId(self.next_subject);
        self.next_subject += 1;
        self.subjects.insert(
            id,
            Subject {
                state: initial,
                active: None,
            },
        );
        id
    }

    /// Cancel the subject's animation, then release the subject
    pub fn unmount(&mut self, id: SubjectId) {
        if let Some(mut subject) = self.subjects.remove(&id) {
            if subject.active.take().is_some() {
                self.cancelled += 1;
            }
        }
        self.sync_frame_listener();
    }

    /// Play a time-driven timeline; replaces (cancels) any running one
    pub fn play(&mut self, id: SubjectId, timeline: Timeline, now: Instant) -> Option<AnimationHandle> {
        self.start(id, timeline, Playback::Time { started: now })
    }

    /// Attach a scroll-scrubbed timeline; replaces (cancels) any running one
    pub fn scrub(&mut self, id: SubjectId, timeline: Timeline) -> Option<AnimationHandle> {
        self.start(id, timeline, Playback::Scrub { progress: 0.0 })
    }

    fn start(&mut self, id: SubjectId, timeline: Timeline, playback: Playback) -> Option<AnimationHandle> {
        let handle = AnimationHandle {
            id: self.next_handle,
            subject: id,
        };
        let reduced = self.reduced_motion;
        let subject = self.subjects.get_mut(&id)?;
        self.next_handle += 1;

        if let Some(previous) = subject.active.take() {
            self.cancelled += 1;
            tracing::trace!(subject = id.0, handle = previous.handle.id, "Cancelled superseded animation");
        }

        if reduced && matches!(playback, Playback::Time { .. }) {
            subject.state = timeline.end_state();
            self.sync_frame_listener();
            return None;
        }

        subject.state = match playback {
            Playback::Time { .. } => timeline.sample(std::time::Duration::ZERO),
            Playback::Scrub { progress } => timeline.sample_progress(progress),
        };
        subject.active = Some(Active {
            handle,
            timeline,
            playback,
        });
        self.sync_frame_listener();
        Some(handle)
    }

    /// Drive a scrubbed animation to `progress`
    pub fn set_progress(&mut self, handle: AnimationHandle, progress: f64) {
        let Some(subject) = self.subjects.get_mut(&handle.subject) else {
            return;
        };
        if let Some(active) = subject.active.as_mut() {
            if active.handle == handle {
                if let Playback::Scrub { progress: p } = &mut active.playback {
                    *p = progress;
                    subject.state = if self.reduced_motion {
                        active.timeline.end_state()
                    } else {
                        active.timeline.sample_progress(progress)
                    };
                }
            }
        }
    }

    /// Cancel `handle` if it is still the subject's current animation
    pub fn cancel(&mut self, handle: AnimationHandle) -> bool {
        let cancelled = match self.subjects.get_mut(&handle.subject) {
            Some(subject) if subject.active.as_ref().map(|a| a.handle) == Some(handle) => {
                subject.active = None;
                true
            }
            _ => false,
        };
        if cancelled {
            self.cancelled += 1;
            self.sync_frame_listener();
        }
        cancelled
    }

    pub fn is_active(&self, handle: AnimationHandle) -> bool {
        self.subjects
            .get(&handle.subject)
            .and_then(|s| s.active.as_ref())
            .is_some_and(|a| a.handle == handle)
    }

    /// Advance time-driven animations and write their states
    pub fn tick(&mut self, now: Instant) {
        for subject in self.subjects.values_mut() {
            let finished = match subject.active.as_ref() {
                Some(Active {
                    timeline,
                    playback: Playback::Time { started },
                    ..
                }) => {
                    let elapsed = now.saturating_duration_since(*started);
                    subject.state = timeline.sample(elapsed);
                    timeline.is_finished(elapsed)
                }
                _ => false,
            };
            if finished {
                subject.active = None;
            }
        }
        self.sync_frame_listener();
    }

    pub fn state(&self, id: SubjectId) -> Option<VisualState> {
        self.subjects.get(&id).map(|s| s.state)
    }

    /// Live animations across all subjects
    pub fn active_count(&self) -> usize {
        self.subjects.values().filter(|s| s.active.is_some()).count()
    }

    /// Animations cancelled so far (superseded, cancelled or unmounted)
    pub fn cancelled_count(&self) -> u64 {
        self.cancelled
    }

    pub fn is_mounted(&self, id: SubjectId) -> bool {
        self.subjects.contains_key(&id)
    }

    /// A time-driven animation needs frames
    pub fn needs_frame(&self) -> bool {
        self.subjects.values().any(|s| {
            matches!(
                s.active,
                Some(Active {
                    playback: Playback::Time { .. },
                    ..
                })
            )
        })
    }

    fn sync_frame_listener(&mut self) {
        match (self.needs_frame(), self.frame.is_some()) {
            (true, false) => {
                self.frame = Some(self.registry.register(ListenerKind::Frame, "animator"));
            }
            (false, true) => self.frame = None,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::easing::EasingType;
    use crate::motion::timeline::Repeat;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn slide(to_x: f64) -> Timeline {
        Timeline::new(VisualState::IDENTITY).to(
            VisualState::IDENTITY.with_x(to_x),
            ms(100),
            EasingType::Linear,
        )
    }

    #[test]
    fn test_play_and_finish() {
        let registry = ListenerRegistry::new();
        let mut animator = Animator::new(&registry);
        let id = animator.mount(VisualState::IDENTITY);
        let now = Instant::now();

        let handle = animator.play(id, slide(10.0), now).unwrap();
        assert!(animator.is_active(handle));
        assert_eq!(registry.count_kind(ListenerKind::Frame), 1);

        animator.tick(now + ms(50));
        assert!((animator.state(id).unwrap().x - 5.0).abs() < 1e-9);

        animator.tick(now + ms(100));
        assert_eq!(animator.state(id).unwrap().x, 10.0);
        assert!(!animator.is_active(handle));
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_new_animation_cancels_previous() {
        let registry = ListenerRegistry::new();
        let mut animator = Animator::new(&registry);
        let id = animator.mount(VisualState::IDENTITY);
        let now = Instant::now();

        let first = animator.play(id, slide(10.0), now).unwrap();
        let second = animator.play(id, slide(-10.0), now + ms(20)).unwrap();

        assert!(!animator.is_active(first));
        assert!(animator.is_active(second));
        assert_eq!(animator.active_count(), 1);
        assert_eq!(animator.cancelled_count(), 1);

        // Cancelling a stale handle is a no-op
        assert!(!animator.cancel(first));
        assert!(animator.is_active(second));

        animator.tick(now + ms(70));
        assert!((animator.state(id).unwrap().x + 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_unmount_stops_writes() {
        let registry = ListenerRegistry::new();
        let mut animator = Animator::new(&registry);
        let id = animator.mount(VisualState::IDENTITY);
        let now = Instant::now();

        let handle = animator
            .play(id, slide(10.0).repeat(Repeat::Infinite), now)
            .unwrap();
        animator.unmount(id);

        assert!(!animator.is_active(handle));
        assert!(!animator.is_mounted(id));
        animator.tick(now + ms(50));
        assert_eq!(animator.state(id), None);
        assert_eq!(registry.count(), 0);
        assert!(animator.play(id, slide(1.0), now).is_none());
    }

    #[test]
    fn test_scrub_follows_progress() {
        let registry = ListenerRegistry::new();
        let mut animator = Animator::new(&registry);
        let id = animator.mount(VisualState::IDENTITY);

        let handle = animator.scrub(id, slide(100.0)).unwrap();
        // Scrubbing needs no frame callbacks
        assert_eq!(registry.count(), 0);

        animator.set_progress(handle, 0.25);
        assert!((animator.state(id).unwrap().x - 25.0).abs() < 1e-9);
        animator.tick(Instant::now() + ms(10_000));
        assert!((animator.state(id).unwrap().x - 25.0).abs() < 1e-9);
        animator.set_progress(handle, 0.0);
        assert_eq!(animator.state(id).unwrap().x, 0.0);
    }

    #[test]
    fn test_reduced_motion_jumps_to_end() {
        let registry = ListenerRegistry::new();
        let mut animator = Animator::new(&registry).with_reduced_motion(true);
        let id = animator.mount(VisualState::IDENTITY);

        assert!(animator.play(id, slide(10.0), Instant::now()).is_none());
        assert_eq!(animator.state(id).unwrap().x, 10.0);
        assert_eq!(registry.count(), 0);
    }
}
