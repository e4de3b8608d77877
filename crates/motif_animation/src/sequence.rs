//! Phase sequencing for choreographed timelines
//!
//! A [`Sequence`] is a set of named phases with declared start rules:
//! at the sequence start, at a fixed offset, after a set of predecessors
//! resolves, or a fixed delay after another phase begins. Phases that
//! share a trigger run concurrently and are jointly awaited by anything
//! declared `After` them.
//!
//! The sequence only tracks readiness and completion; the side effects of
//! a phase (starting animations, writing styles) belong to the component
//! driving it, which attaches the resulting animation handles back onto
//! the phase so completion can be observed.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::scheduler::HandleId;

new_key_type! {
    /// Identifier for one phase in a sequence.
    pub struct PhaseId;
}

/// When a phase becomes ready to start.
#[derive(Clone, Debug)]
pub enum StartRule {
    /// Ready as soon as the sequence starts.
    AtStart,
    /// Ready a fixed offset after the sequence starts.
    Offset(f64),
    /// Ready once every predecessor phase has completed.
    After(SmallVec<[PhaseId; 2]>),
    /// Ready a fixed delay after another phase *begins* (not completes).
    AfterStartOf(PhaseId, f64),
}

impl StartRule {
    /// Convenience for a single-predecessor rule.
    pub fn after(phase: PhaseId) -> Self {
        StartRule::After(SmallVec::from_slice(&[phase]))
    }

    /// Convenience for a joint fan-in on several predecessors.
    pub fn after_all(phases: &[PhaseId]) -> Self {
        StartRule::After(SmallVec::from_slice(phases))
    }
}

struct Phase {
    label: &'static str,
    rule: StartRule,
    /// Minimum time the phase stays open after starting, even with no
    /// attached handles (pure holds) or handles that finish early.
    hold_ms: f64,
    handles: SmallVec<[HandleId; 4]>,
    started_at: Option<f64>,
    done: bool,
}

/// A choreographed set of phases with dependency ordering.
pub struct Sequence {
    phases: SlotMap<PhaseId, Phase>,
    order: Vec<PhaseId>,
    started_at: Option<f64>,
}

impl Sequence {
    pub fn new() -> Self {
        Self {
            phases: SlotMap::with_key(),
            order: Vec::new(),
            started_at: None,
        }
    }

    /// Declare a phase. Declaration order is preserved for iteration.
    pub fn phase(&mut self, label: &'static str, rule: StartRule, hold_ms: f64) -> PhaseId {
        let id = self.phases.insert(Phase {
            label,
            rule,
            hold_ms,
            handles: SmallVec::new(),
            started_at: None,
            done: false,
        });
        self.order.push(id);
        id
    }

    /// Begin running the sequence at `now_ms`.
    pub fn start(&mut self, now_ms: f64) {
        self.started_at = Some(now_ms);
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Phases in declaration order.
    pub fn phase_ids(&self) -> Vec<PhaseId> {
        self.order.clone()
    }

    pub fn label(&self, id: PhaseId) -> &'static str {
        self.phases.get(id).map(|p| p.label).unwrap_or("")
    }

    /// Whether a phase may begin: the sequence has started, the phase has
    /// not already begun, and its start rule is satisfied. A phase whose
    /// predecessors have not all resolved is never ready.
    pub fn is_ready(&self, id: PhaseId, now_ms: f64) -> bool {
        let Some(start) = self.started_at else {
            return false;
        };
        let Some(phase) = self.phases.get(id) else {
            return false;
        };
        if phase.started_at.is_some() {
            return false;
        }
        match &phase.rule {
            StartRule::AtStart => true,
            StartRule::Offset(offset) => now_ms - start >= *offset,
            StartRule::After(preds) => preds
                .iter()
                .all(|p| self.phases.get(*p).map(|p| p.done).unwrap_or(true)),
            StartRule::AfterStartOf(pred, delay) => self
                .phases
                .get(*pred)
                .and_then(|p| p.started_at)
                .map(|t| now_ms - t >= *delay)
                .unwrap_or(false),
        }
    }

    /// Mark a phase as begun.
    pub fn begin(&mut self, id: PhaseId, now_ms: f64) {
        if let Some(phase) = self.phases.get_mut(id) {
            tracing::debug!(phase = phase.label, "sequence phase started");
            phase.started_at = Some(now_ms);
        }
    }

    /// Attach an animation handle whose completion gates this phase.
    pub fn attach(&mut self, id: PhaseId, handle: HandleId) {
        if let Some(phase) = self.phases.get_mut(id) {
            phase.handles.push(handle);
        }
    }

    pub fn is_running(&self, id: PhaseId) -> bool {
        self.phases
            .get(id)
            .map(|p| p.started_at.is_some() && !p.done)
            .unwrap_or(false)
    }

    pub fn is_done(&self, id: PhaseId) -> bool {
        self.phases.get(id).map(|p| p.done).unwrap_or(false)
    }

    /// Milliseconds since a phase began, if it has.
    pub fn elapsed(&self, id: PhaseId, now_ms: f64) -> Option<f64> {
        self.phases.get(id)?.started_at.map(|t| now_ms - t)
    }

    /// Complete a running phase once its hold has elapsed and every
    /// attached handle reports finished (per `handle_finished`).
    /// Returns true when the phase completes on this call.
    pub fn try_finish(
        &mut self,
        id: PhaseId,
        now_ms: f64,
        handle_finished: impl Fn(HandleId) -> bool,
    ) -> bool {
        let Some(phase) = self.phases.get_mut(id) else {
            return false;
        };
        let Some(started) = phase.started_at else {
            return false;
        };
        if phase.done {
            return false;
        }
        if now_ms - started < phase.hold_ms {
            return false;
        }
        if !phase.handles.iter().all(|h| handle_finished(*h)) {
            return false;
        }
        phase.done = true;
        tracing::debug!(phase = phase.label, "sequence phase finished");
        true
    }

    /// Force-complete every phase (watchdog path).
    pub fn finish_all(&mut self, now_ms: f64) {
        for phase in self.phases.values_mut() {
            phase.started_at.get_or_insert(now_ms);
            phase.done = true;
        }
    }

    /// Whether every declared phase has completed.
    pub fn is_complete(&self) -> bool {
        self.phases.values().all(|p| p.done)
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_wait_for_sequence_start() {
        let mut seq = Sequence::new();
        let hold = seq.phase("hold", StartRule::AtStart, 100.0);
        assert!(!seq.is_ready(hold, 0.0));
        seq.start(0.0);
        assert!(seq.is_ready(hold, 0.0));
    }

    #[test]
    fn offset_phase_waits_out_its_offset() {
        let mut seq = Sequence::new();
        let late = seq.phase("late", StartRule::Offset(950.0), 0.0);
        seq.start(0.0);
        assert!(!seq.is_ready(late, 949.0));
        assert!(seq.is_ready(late, 950.0));
    }

    #[test]
    fn successor_never_starts_before_predecessors_resolve() {
        let mut seq = Sequence::new();
        let a = seq.phase("a", StartRule::AtStart, 100.0);
        let b = seq.phase("b", StartRule::AtStart, 300.0);
        let c = seq.phase("c", StartRule::after_all(&[a, b]), 0.0);
        seq.start(0.0);
        seq.begin(a, 0.0);
        seq.begin(b, 0.0);

        assert!(seq.try_finish(a, 150.0, |_| true));
        // b is still holding, so c must not be ready.
        assert!(!seq.is_ready(c, 150.0));

        assert!(seq.try_finish(b, 300.0, |_| true));
        assert!(seq.is_ready(c, 300.0));
    }

    #[test]
    fn after_start_of_is_relative_to_phase_begin() {
        let mut seq = Sequence::new();
        let icon = seq.phase("icon", StartRule::Offset(950.0), 0.0);
        let fades = seq.phase("fades", StartRule::AfterStartOf(icon, 200.0), 0.0);
        seq.start(0.0);

        assert!(!seq.is_ready(fades, 1100.0));
        seq.begin(icon, 950.0);
        assert!(!seq.is_ready(fades, 1100.0));
        assert!(seq.is_ready(fades, 1150.0));
    }

    #[test]
    fn phase_completion_gates_on_handles_and_hold() {
        let mut seq = Sequence::new();
        let mut scheduler: crate::Scheduler<u32> = crate::Scheduler::new();
        let phase = seq.phase("reveal", StartRule::AtStart, 100.0);
        seq.start(0.0);
        seq.begin(phase, 0.0);

        let keyframes = vec![
            crate::StyleKeyframe::new(0.0, crate::StyleProps::opacity(0.0)),
            crate::StyleKeyframe::new(1.0, crate::StyleProps::opacity(1.0)),
        ];
        let handle = scheduler.add(
            0,
            keyframes,
            600.0,
            crate::EasingMode::Curve(crate::Easing::Linear),
            0.0,
        );
        seq.attach(phase, handle);

        // Hold elapsed but the animation is still running.
        assert!(!seq.try_finish(phase, 200.0, |h| scheduler.is_finished(h)));

        scheduler.tick(600.0, |_, _| {});
        assert!(seq.try_finish(phase, 600.0, |h| scheduler.is_finished(h)));
        assert!(seq.is_done(phase));
    }

    #[test]
    fn finish_all_completes_everything() {
        let mut seq = Sequence::new();
        let a = seq.phase("a", StartRule::AtStart, 1000.0);
        let b = seq.phase("b", StartRule::after(a), 1000.0);
        seq.start(0.0);
        seq.finish_all(0.0);
        assert!(seq.is_complete());
        assert!(seq.is_done(a) && seq.is_done(b));
    }
}
