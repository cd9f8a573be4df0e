use crate::core::space::StaffMetrics;
use crate::game::note::{NoteHandle, NoteInstance, NoteState};
use crate::game::pitch::Pitch;
use log::debug;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How long a resolved note lingers in the retired list while its exit
/// animation plays on the collaborator side.
pub const REMOVAL_GRACE: Duration = Duration::from_millis(600);

#[derive(Debug)]
struct RetiredNote {
    note: NoteInstance,
    retired_at: Instant,
}

/// Owns the ordered sequence of in-flight notes.
///
/// Insertion order is spawn order is judgment priority: only the head is
/// ever eligible for judgment or timeout, and removal never reorders the
/// remaining elements. The idempotent `timeout`/`remove` pair is the sole
/// race-breaker between "judged" and "timed out" firing near-simultaneously.
#[derive(Debug)]
pub struct NoteField {
    metrics: StaffMetrics,
    /// Capture radius around the judgment line on the scroll axis.
    critical_distance: f32,
    active: VecDeque<NoteInstance>,
    retired: Vec<RetiredNote>,
    next_handle: u64,
}

impl NoteField {
    pub fn new(metrics: StaffMetrics, critical_distance: f32) -> Self {
        Self {
            metrics,
            critical_distance,
            active: VecDeque::new(),
            retired: Vec::new(),
            next_handle: 0,
        }
    }

    #[inline(always)]
    pub const fn metrics(&self) -> &StaffMetrics {
        &self.metrics
    }

    /// Creates a note at the spawn offset with its staff position derived
    /// once, appends it to the tail of the active sequence and returns its
    /// handle.
    pub fn spawn(
        &mut self,
        pitch: Pitch,
        octave: u8,
        travel: Duration,
        now: Instant,
    ) -> NoteHandle {
        let handle = NoteHandle(self.next_handle);
        self.next_handle += 1;
        let note = NoteInstance::new(handle, pitch, octave, now, travel, &self.metrics);
        debug!(
            "Spawned note {pitch} octave {octave} as {handle:?}, travel {:.1}s.",
            travel.as_secs_f32()
        );
        self.active.push_back(note);
        handle
    }

    /// The head of the active sequence, if and only if it is within the
    /// critical distance of the judgment line. Later notes are never
    /// eligible, even when visually close.
    pub fn judgment_candidate(&self, now: Instant) -> Option<&NoteInstance> {
        let head = self.active.front()?;
        let distance = (head.x_at(now, &self.metrics) - self.metrics.judgment_line_x).abs();
        (distance <= self.critical_distance).then_some(head)
    }

    /// Expires `handle` if it is still the head. Returns true on removal
    /// (a miss); false when the note was already judged or is not the head,
    /// which makes a stale deadline a safe no-op instead of a double penalty.
    pub fn timeout(&mut self, handle: NoteHandle, now: Instant) -> bool {
        match self.active.front() {
            Some(head) if head.handle == handle => {
                let mut note = self.active.pop_front().expect("head exists");
                note.state = NoteState::Expired;
                self.retire(note, now);
                true
            }
            _ => false,
        }
    }

    /// Removes `handle` from wherever it sits in the active sequence,
    /// preserving the order of the rest. Returns the removed instance.
    pub fn remove(
        &mut self,
        handle: NoteHandle,
        state: NoteState,
        now: Instant,
    ) -> Option<NoteInstance> {
        let idx = self.active.iter().position(|n| n.handle == handle)?;
        let mut note = self.active.remove(idx).expect("index in range");
        note.state = state;
        self.retire(note.clone(), now);
        Some(note)
    }

    /// Bulk clear on game over: every active note is retired as expired.
    /// Returns the drained instances so the caller can tear down their
    /// visuals.
    pub fn clear_all(&mut self, now: Instant) -> Vec<NoteInstance> {
        let drained: Vec<NoteInstance> = self
            .active
            .drain(..)
            .map(|mut n| {
                n.state = NoteState::Expired;
                n
            })
            .collect();
        for note in &drained {
            self.retire(note.clone(), now);
        }
        drained
    }

    #[inline(always)]
    pub fn has_active(&self) -> bool {
        !self.active.is_empty()
    }

    #[inline(always)]
    pub fn first_pitch(&self) -> Option<Pitch> {
        self.active.front().map(|n| n.pitch)
    }

    #[inline(always)]
    pub fn head(&self) -> Option<&NoteInstance> {
        self.active.front()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NoteInstance> {
        self.active.iter()
    }

    /// Drops retired notes whose removal grace has elapsed.
    pub fn purge_retired(&mut self, now: Instant) {
        self.retired
            .retain(|r| now.saturating_duration_since(r.retired_at) < REMOVAL_GRACE);
    }

    fn retire(&mut self, note: NoteInstance, now: Instant) {
        self.retired.push(RetiredNote {
            note,
            retired_at: now,
        });
    }

    #[cfg(test)]
    fn retired_len(&self) -> usize {
        self.retired.len()
    }
}
