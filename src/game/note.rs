use crate::core::space::StaffMetrics;
use crate::game::pitch::Pitch;
use crate::game::staff::{self, MAX_OCTAVE};
use glam::Vec3;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteState {
    /// Moving toward the judgment line, eligible for judgment while head.
    Active,
    ResolvedCorrect,
    ResolvedIncorrect,
    /// Reached its deadline unjudged.
    Expired,
}

/// Opaque id issued by the note field. Ids are never reused, so a stale
/// timeout callback can never alias a newer note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteHandle(pub(crate) u64);

#[derive(Debug, Clone)]
pub struct NoteInstance {
    pub handle: NoteHandle,
    pub pitch: Pitch,
    pub octave: u8,
    pub spawned_at: Instant,
    pub travel: Duration,
    /// Vertical staff offset, derived once at spawn and immutable after.
    pub staff_y: f32,
    pub state: NoteState,
}

impl NoteInstance {
    /// Octaves outside 0..=MAX_OCTAVE are rejected here (and again in
    /// `staff_position`) as a caller contract violation.
    pub(crate) fn new(
        handle: NoteHandle,
        pitch: Pitch,
        octave: u8,
        spawned_at: Instant,
        travel: Duration,
        metrics: &StaffMetrics,
    ) -> Self {
        assert!(
            octave <= MAX_OCTAVE,
            "octave {octave} outside supported range 0..={MAX_OCTAVE}"
        );
        Self {
            handle,
            pitch,
            octave,
            spawned_at,
            travel,
            staff_y: staff::staff_position(pitch, octave, metrics),
            state: NoteState::Active,
        }
    }

    /// Scroll-axis position at `now`: linear from spawn_x to target_x over
    /// the travel duration, clamped at both ends.
    #[inline(always)]
    pub fn x_at(&self, now: Instant, metrics: &StaffMetrics) -> f32 {
        let travel_s = self.travel.as_secs_f32();
        let progress = if travel_s <= 0.0 {
            1.0
        } else {
            (now.saturating_duration_since(self.spawned_at).as_secs_f32() / travel_s).clamp(0.0, 1.0)
        };
        metrics.spawn_x + (metrics.target_x - metrics.spawn_x) * progress
    }

    #[inline(always)]
    pub fn staff_local_at(&self, now: Instant, metrics: &StaffMetrics) -> Vec3 {
        metrics.note_local(self.x_at(now, metrics), self.staff_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(travel_s: u64) -> NoteInstance {
        NoteInstance::new(
            NoteHandle(1),
            Pitch::G,
            0,
            Instant::now(),
            Duration::from_secs(travel_s),
            &StaffMetrics::default(),
        )
    }

    #[test]
    fn motion_is_linear_and_clamped() {
        let m = StaffMetrics::default();
        let n = note(4);
        assert!((n.x_at(n.spawned_at, &m) - m.spawn_x).abs() < 1e-6);
        let midway = n.x_at(n.spawned_at + Duration::from_secs(2), &m);
        assert!((midway - (m.spawn_x + m.target_x) / 2.0).abs() < 1e-6);
        let late = n.x_at(n.spawned_at + Duration::from_secs(60), &m);
        assert!((late - m.target_x).abs() < 1e-6);
    }

    #[test]
    #[should_panic(expected = "outside supported range")]
    fn bad_octave_rejected_at_construction() {
        NoteInstance::new(
            NoteHandle(1),
            Pitch::C,
            7,
            Instant::now(),
            Duration::from_secs(5),
            &StaffMetrics::default(),
        );
    }
}
