use crate::assets::SoundCue;
use crate::config::Config;
use crate::core::audio::AudioHandle;
use crate::core::space::AnchorPose;
use crate::game::field::NoteField;
use crate::game::judge::{self, PressOutcome};
use crate::game::note::{NoteHandle, NoteState};
use crate::game::pitch::{KEYBOARD_PITCHES, Pitch};
use crate::game::scoring::{Difficulty, GameState, Phase};
use crate::game::staff::MAX_OCTAVE;
use crate::view::{StageView, Verdict, ViewHandle};
use log::{debug, info, warn};
use rand::RngExt;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

/* ----------------------------- Scheduler ----------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeadlineKind {
    /// Recurring spawn pulse. Stale generations are dropped on pop, which
    /// is how a difficulty change "cancels" the old cadence.
    SpawnTick { generation: u64 },
    /// Per-note miss deadline, scheduled once at spawn and never cancelled;
    /// the field's idempotent `timeout` absorbs stale firings.
    NoteTimeout { handle: NoteHandle },
}

// Field order matters: deadlines sort by time, then insertion sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Deadline {
    at: Instant,
    seq: u64,
    kind: DeadlineKind,
}

/// Deadline queue for the session timeline. Everything time-driven goes
/// through here; nothing in the engine busy-waits.
#[derive(Debug, Default)]
pub struct Scheduler {
    heap: BinaryHeap<Reverse<Deadline>>,
    seq: u64,
}

impl Scheduler {
    pub fn schedule(&mut self, at: Instant, kind: DeadlineKind) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Reverse(Deadline { at, seq, kind }));
    }

    /// Earliest pending deadline, for the event loop's wait computation.
    pub fn next_at(&self) -> Option<Instant> {
        self.heap.peek().map(|Reverse(d)| d.at)
    }

    /// Pops the earliest deadline if it is due at `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<DeadlineKind> {
        if self.heap.peek().is_some_and(|Reverse(d)| d.at <= now) {
            self.heap.pop().map(|Reverse(d)| d.kind)
        } else {
            None
        }
    }
}

/* ------------------------------- Engine ------------------------------- */

/// Read-only snapshot for host HUDs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub score: u32,
    pub lives: u32,
    pub difficulty: Difficulty,
    pub phase: Phase,
    pub active_notes: usize,
}

/// The single owner of all game-state mutation.
///
/// Spawn ticks, note timeouts and key presses are serialized through
/// `handle_deadline` and the input methods; every entry point takes an
/// explicit `now` so the event loop passes wall clock and tests pass a
/// synthetic ramp. Audio and plane-sample ingestion live on other threads
/// because they never touch this state.
pub struct Engine {
    config: Config,
    field: NoteField,
    state: GameState,
    sched: Scheduler,
    view: Box<dyn StageView + Send>,
    audio: AudioHandle,
    rng: StdRng,
    anchor: AnchorPose,
    note_views: FxHashMap<NoteHandle, ViewHandle>,
    tick_generation: u64,
}

impl Engine {
    pub fn new(
        config: Config,
        view: Box<dyn StageView + Send>,
        audio: AudioHandle,
        rng: StdRng,
    ) -> Self {
        let field = NoteField::new(config.staff, config.judgment.critical_distance);
        Self {
            config,
            field,
            state: GameState::new(),
            sched: Scheduler::default(),
            view,
            audio,
            rng,
            anchor: AnchorPose::IDENTITY,
            note_views: FxHashMap::default(),
            tick_generation: 0,
        }
    }

    #[inline(always)]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            score: self.state.score(),
            lives: self.state.lives(),
            difficulty: self.state.difficulty(),
            phase: self.state.phase(),
            active_notes: self.field.len(),
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.sched.next_at()
    }

    pub fn pop_due_deadline(&mut self, now: Instant) -> Option<DeadlineKind> {
        self.sched.pop_due(now)
    }

    /* --------------------------- Input events --------------------------- */

    /// Freezes the anchor pose produced by the placement estimator.
    /// One-shot: confirmations outside `initializing` are ignored.
    pub fn placement_confirmed(&mut self, pose: AnchorPose, now: Instant) {
        self.field.purge_retired(now);
        if self.state.placement_confirmed() {
            self.anchor = pose;
        } else {
            debug!("Placement confirm ignored in phase {:?}.", self.state.phase());
        }
    }

    pub fn start_requested(&mut self, now: Instant) {
        self.start(now);
    }

    pub fn restart_requested(&mut self, now: Instant) {
        self.start(now);
    }

    /// Resolves a virtual-keyboard press against the note nearest the
    /// judgment line.
    pub fn key_pressed(&mut self, pitch: Pitch, now: Instant) {
        self.field.purge_retired(now);
        if self.state.phase() != Phase::Playing {
            debug!("Key {pitch} ignored in phase {:?}.", self.state.phase());
            return;
        }

        let outcome =
            judge::resolve_press(pitch, self.field.judgment_candidate(now), self.field.head());
        match outcome {
            PressOutcome::Hit { handle, pitch } => {
                debug!("Hit: {pitch} judged correct.");
                self.retire_with_reveal(handle, NoteState::ResolvedCorrect, Verdict::Correct, now);
                self.audio.play(SoundCue::Correct);
                let correct = self.state.on_correct();
                self.view.on_score_changed(correct.score);
                if let Some(tier) = correct.difficulty_changed {
                    // Deliberate asymmetry versus start(): the cadence
                    // restarts at the new interval with no immediate spawn.
                    self.restart_spawn_tick(tier, now);
                }
            }
            PressOutcome::WrongPitch { handle, actual } => {
                debug!("Wrong key {pitch}; candidate was {actual}.");
                self.retire_with_reveal(handle, NoteState::ResolvedIncorrect, Verdict::Incorrect, now);
                self.audio.play(SoundCue::Incorrect);
                self.apply_incorrect(now);
            }
            PressOutcome::NoCandidateMiss { handle, pitch: head_pitch } => {
                debug!("Key {pitch} with no note at the line; head {head_pitch} pays.");
                self.retire_with_reveal(handle, NoteState::ResolvedIncorrect, Verdict::Incorrect, now);
                self.audio.play(SoundCue::Incorrect);
                self.apply_incorrect(now);
            }
            PressOutcome::Ignored => {
                debug!("Key {pitch} with empty field; no penalty.");
            }
        }
    }

    /// Deterministic spawn for host-driven drills and tests. Only valid
    /// while playing.
    pub fn spawn_scripted(&mut self, pitch: Pitch, octave: u8, now: Instant) -> Option<NoteHandle> {
        if self.state.phase() != Phase::Playing {
            warn!("Scripted spawn of {pitch} ignored in phase {:?}.", self.state.phase());
            return None;
        }
        Some(self.spawn(pitch, octave, now))
    }

    /* ------------------------- Deadline events ------------------------- */

    pub fn handle_deadline(&mut self, kind: DeadlineKind, now: Instant) {
        self.field.purge_retired(now);
        match kind {
            DeadlineKind::SpawnTick { generation } => self.spawn_tick(generation, now),
            DeadlineKind::NoteTimeout { handle } => self.note_timeout(handle, now),
        }
    }

    fn spawn_tick(&mut self, generation: u64, now: Instant) {
        if generation != self.tick_generation {
            debug!("Dropping stale spawn tick (generation {generation}).");
            return;
        }
        if self.state.phase() != Phase::Playing {
            return;
        }
        self.spawn_random(now);
        self.schedule_spawn_tick(now + self.state.difficulty().spawn_interval());
    }

    fn note_timeout(&mut self, handle: NoteHandle, now: Instant) {
        if self.state.phase() != Phase::Playing {
            return;
        }
        // Snapshot the head before the field decides; `timeout` returning
        // true means this snapshot was the note that expired.
        let expired = self
            .field
            .head()
            .filter(|n| n.handle == handle)
            .map(|n| (n.pitch, n.octave, n.staff_local_at(now, self.field.metrics())));
        if self.field.timeout(handle, now)
            && let Some((pitch, octave, local)) = expired
        {
            debug!("Note {pitch} expired unjudged.");
            self.view.show_floating_text(pitch, self.anchor.world_from_staff(local));
            self.audio.play(SoundCue::Note { pitch, octave });
            if let Some(vh) = self.note_views.remove(&handle) {
                self.view.remove_note(vh);
            }
            self.view.highlight_judgment_line(Verdict::Incorrect);
            self.audio.play(SoundCue::Incorrect);
            self.apply_incorrect(now);
        }
    }

    /* ----------------------------- Internals ----------------------------- */

    fn start(&mut self, now: Instant) {
        self.field.purge_retired(now);
        if !self.state.start() {
            debug!("Start ignored in phase {:?}.", self.state.phase());
            return;
        }
        self.tick_generation += 1;
        // First note immediately, so the first play does not sit through a
        // full easy-tier interval.
        self.spawn_random(now);
        self.schedule_spawn_tick(now + self.state.difficulty().spawn_interval());
    }

    fn spawn_random(&mut self, now: Instant) {
        let pitch = KEYBOARD_PITCHES[self.rng.random_range(0..KEYBOARD_PITCHES.len())];
        let octave = self.rng.random_range(0..=MAX_OCTAVE);
        self.spawn(pitch, octave, now);
    }

    fn spawn(&mut self, pitch: Pitch, octave: u8, now: Instant) -> NoteHandle {
        let travel = self.state.difficulty().travel_duration();
        let handle = self.field.spawn(pitch, octave, travel, now);
        let metrics = *self.field.metrics();
        let staff_y = crate::game::staff::staff_position(pitch, octave, &metrics);

        let start = self.anchor.world_from_staff(metrics.note_local(metrics.spawn_x, staff_y));
        let end = self.anchor.world_from_staff(metrics.note_local(metrics.target_x, staff_y));
        let view_handle = self.view.render_note(pitch, octave, start);
        self.note_views.insert(handle, view_handle);
        self.view.animate_move(view_handle, end, travel);
        // Hearing the tone as the note appears is the ear-training half of
        // the game; the staff position is the sight-training half.
        self.audio.play(SoundCue::Note { pitch, octave });

        let lead = Duration::from_secs_f32(self.config.judgment.timeout_lead_s.max(0.0));
        let timeout_at = now + travel.saturating_sub(lead);
        self.sched.schedule(timeout_at, DeadlineKind::NoteTimeout { handle });
        handle
    }

    fn retire_with_reveal(
        &mut self,
        handle: NoteHandle,
        resolved: NoteState,
        verdict: Verdict,
        now: Instant,
    ) {
        let Some(note) = self.field.remove(handle, resolved, now) else {
            return;
        };
        let local = note.staff_local_at(now, self.field.metrics());
        self.view.show_floating_text(note.pitch, self.anchor.world_from_staff(local));
        self.audio.play(SoundCue::Note { pitch: note.pitch, octave: note.octave });
        if let Some(vh) = self.note_views.remove(&handle) {
            self.view.remove_note(vh);
        }
        self.view.highlight_judgment_line(verdict);
    }

    fn apply_incorrect(&mut self, now: Instant) {
        let outcome = self.state.on_incorrect();
        self.view.on_life_lost(outcome.life_lost_index);
        if outcome.game_over {
            self.finish_run(now);
        }
    }

    fn finish_run(&mut self, now: Instant) {
        self.stop_spawn_tick();
        for note in self.field.clear_all(now) {
            if let Some(vh) = self.note_views.remove(&note.handle) {
                self.view.remove_note(vh);
            }
        }
        self.audio.play(SoundCue::GameOver);
        self.view.on_game_over(self.state.score());
        info!("Run over; final score {}.", self.state.score());
    }

    /// Cancels the spawn cadence without touching score or lives.
    /// Idempotent: bumping the generation again changes nothing observable.
    fn stop_spawn_tick(&mut self) {
        self.tick_generation += 1;
    }

    fn restart_spawn_tick(&mut self, tier: Difficulty, now: Instant) {
        self.tick_generation += 1;
        self.schedule_spawn_tick(now + tier.spawn_interval());
    }

    fn schedule_spawn_tick(&mut self, at: Instant) {
        self.sched.schedule(
            at,
            DeadlineKind::SpawnTick { generation: self.tick_generation },
        );
    }
}
