//! Animation scheduler
//!
//! Manages all running style animations and samples them each frame.
//! The scheduler is explicitly clocked: the host passes the current time
//! into [`Scheduler::tick`], so tests drive it with a virtual clock
//! instead of a real frame callback.
//!
//! Exactly one animation may own an `(element, property-set)` at a time;
//! [`MotionSlot`] enforces this by cancelling the previous handle before
//! a replacement starts.

use slotmap::{new_key_type, SlotMap};

use crate::easing::Easing;
use crate::keyframe::{sample_keyframes, StyleKeyframe, StyleProps};

new_key_type! {
    /// Handle to a running (or finished) animation.
    pub struct HandleId;
}

/// How a track maps raw time progress to keyframe progress.
#[derive(Clone, Copy, Debug)]
pub enum EasingMode {
    /// A named or bezier curve.
    Curve(Easing),
    /// A caller-supplied easing callback, driven once per frame. This is
    /// the escape hatch for curves not expressible as an easing string.
    Function(fn(f32) -> f32),
}

impl EasingMode {
    fn apply(&self, t: f32) -> f32 {
        match self {
            EasingMode::Curve(easing) => easing.apply(t),
            EasingMode::Function(f) => f(t),
        }
    }
}

struct Track<T> {
    target: T,
    keyframes: Vec<StyleKeyframe>,
    duration_ms: f64,
    easing: EasingMode,
    started_at: f64,
    finished: bool,
}

/// The animation scheduler, generic over the target handles it animates.
///
/// Finished tracks fill forward: they stay registered (so their handles
/// keep reporting finished) until removed or cancelled.
pub struct Scheduler<T: Copy> {
    tracks: SlotMap<HandleId, Track<T>>,
}

impl<T: Copy> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            tracks: SlotMap::with_key(),
        }
    }

    /// Register a keyframe animation starting at `now_ms`.
    ///
    /// A track needs at least two keyframes to interpolate; anything
    /// shorter is registered already finished.
    pub fn add(
        &mut self,
        target: T,
        keyframes: Vec<StyleKeyframe>,
        duration_ms: f64,
        easing: EasingMode,
        now_ms: f64,
    ) -> HandleId {
        let finished = keyframes.len() < 2 || duration_ms <= 0.0;
        self.tracks.insert(Track {
            target,
            keyframes,
            duration_ms,
            easing,
            started_at: now_ms,
            finished,
        })
    }

    /// Register a handle that is already complete.
    ///
    /// Used by the reduced-motion and missing-backend fallbacks, where the
    /// final state has been applied synchronously but callers still expect
    /// a handle they can await.
    pub fn add_finished(&mut self, target: T) -> HandleId {
        self.tracks.insert(Track {
            target,
            keyframes: Vec::new(),
            duration_ms: 0.0,
            easing: EasingMode::Curve(Easing::Linear),
            started_at: 0.0,
            finished: true,
        })
    }

    /// Cancel and remove an animation. No further samples are emitted.
    pub fn cancel(&mut self, id: HandleId) {
        self.tracks.remove(id);
    }

    /// Whether a handle has run to completion.
    ///
    /// A missing handle counts as finished: there is nothing left to wait
    /// for once a track has been cancelled or pruned.
    pub fn is_finished(&self, id: HandleId) -> bool {
        self.tracks.get(id).map(|t| t.finished).unwrap_or(true)
    }

    /// Whether every handle in a set has finished.
    pub fn all_finished(&self, ids: &[HandleId]) -> bool {
        ids.iter().all(|id| self.is_finished(*id))
    }

    /// Number of tracks still animating.
    pub fn active_count(&self) -> usize {
        self.tracks.values().filter(|t| !t.finished).count()
    }

    /// Sample all running tracks at `now_ms`.
    ///
    /// `apply` receives each track's target and its interpolated
    /// properties; a track reaching the end of its duration emits its
    /// exact final keyframe and is marked finished.
    pub fn tick(&mut self, now_ms: f64, mut apply: impl FnMut(T, &StyleProps)) {
        for track in self.tracks.values_mut() {
            if track.finished {
                continue;
            }
            let raw = ((now_ms - track.started_at) / track.duration_ms).clamp(0.0, 1.0) as f32;
            let props = if raw >= 1.0 {
                track.finished = true;
                sample_keyframes(&track.keyframes, 1.0)
            } else {
                sample_keyframes(&track.keyframes, track.easing.apply(raw))
            };
            apply(track.target, &props);
        }
    }
}

impl<T: Copy> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-slot animation owner.
///
/// Components that retrigger an animation on the same target (the nav
/// condense/expand pair, the services preview swap) park the running
/// handle here; storing a new one cancels the old so stale animations
/// never fight the replacement.
#[derive(Clone, Copy, Debug, Default)]
pub struct MotionSlot {
    current: Option<HandleId>,
}

impl MotionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel whatever is running and take ownership of `next`.
    pub fn replace<T: Copy>(&mut self, scheduler: &mut Scheduler<T>, next: HandleId) {
        if let Some(prev) = self.current.take() {
            scheduler.cancel(prev);
        }
        self.current = Some(next);
    }

    /// Cancel the running animation, leaving the slot empty.
    pub fn cancel<T: Copy>(&mut self, scheduler: &mut Scheduler<T>) {
        if let Some(prev) = self.current.take() {
            scheduler.cancel(prev);
        }
    }

    pub fn handle(&self) -> Option<HandleId> {
        self.current
    }

    /// Whether the slot's animation (if any) has completed.
    pub fn is_settled<T: Copy>(&self, scheduler: &Scheduler<T>) -> bool {
        self.current.map(|id| scheduler.is_finished(id)).unwrap_or(true)
    }
}
