use rand::SeedableRng;
use rand::rngs::StdRng;
use staffsight::core::audio::{self, NullSoundBackend};
use staffsight::game::pitch::Pitch;
use staffsight::view::{RecordingView, ViewCall};
use staffsight::{
    AnchorPose, Config, DeadlineKind, Difficulty, Engine, Phase, SoundBank,
};
use std::time::{Duration, Instant};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Engine with a recording view, placement confirmed and the run started at
/// `t0`. `start()` spawns one random note immediately; its pitch is read
/// back from the recorded render call.
fn started_engine() -> (Engine, RecordingView, Instant, Pitch) {
    init_logging();
    let view = RecordingView::new();
    let audio = audio::spawn(SoundBank::with_defaults(), Box::new(NullSoundBackend));
    let mut engine = Engine::new(
        Config::default(),
        Box::new(view.clone()),
        audio,
        StdRng::seed_from_u64(0xdead),
    );
    let t0 = Instant::now();
    engine.placement_confirmed(AnchorPose::IDENTITY, t0);
    engine.start_requested(t0);
    let first_pitch = view
        .calls()
        .iter()
        .find_map(|c| match c {
            ViewCall::RenderNote { pitch, .. } => Some(*pitch),
            _ => None,
        })
        .expect("start() spawns one note immediately");
    (engine, view, t0, first_pitch)
}

/// Inside the judgment window for an easy-tier (5s travel) note spawned at
/// `spawned_at`.
fn at_the_line(spawned_at: Instant) -> Instant {
    spawned_at + Duration::from_millis(4400)
}

#[test]
fn correct_press_scores_without_costing_lives() {
    let (mut engine, _view, t0, first_pitch) = started_engine();
    assert_eq!(engine.snapshot().lives, 3);

    engine.key_pressed(first_pitch, at_the_line(t0));

    let snap = engine.snapshot();
    assert_eq!(snap.score, 10);
    assert_eq!(snap.lives, 3);
    assert_eq!(snap.active_notes, 0, "judged note leaves the active sequence");
}

#[test]
fn correct_press_reveals_and_removes_the_note() {
    let (mut engine, view, t0, first_pitch) = started_engine();
    view.take_calls();

    engine.key_pressed(first_pitch, at_the_line(t0));

    let calls = view.calls();
    assert!(
        calls.iter().any(|c| matches!(c, ViewCall::ShowFloatingText { pitch, .. } if *pitch == first_pitch)),
        "judged pitch is revealed: {calls:?}"
    );
    assert!(calls.iter().any(|c| matches!(c, ViewCall::RemoveNote { .. })));
    assert!(calls.iter().any(|c| matches!(c, ViewCall::ScoreChanged { score: 10 })));
}

#[test]
fn enharmonic_flat_press_matches_a_sharp_note() {
    let (mut engine, _view, t0, first_pitch) = started_engine();
    // Clear the randomly spawned opener first.
    engine.key_pressed(first_pitch, at_the_line(t0));

    let t1 = at_the_line(t0) + Duration::from_millis(10);
    engine
        .spawn_scripted(Pitch::CSharp, 0, t1)
        .expect("playing, so scripted spawns are accepted");
    engine.key_pressed(Pitch::DFlat, at_the_line(t1));

    let snap = engine.snapshot();
    assert_eq!(snap.score, 20, "Db press judges a C# note correct");
    assert_eq!(snap.lives, 3);
    assert_eq!(snap.active_notes, 0);
}

#[test]
fn three_misses_end_the_run_and_clear_the_field() {
    let (mut engine, view, t0, _) = started_engine();
    // Queue extra notes behind the opener; none are near the line yet, so
    // every press is a no-candidate miss charged to the head.
    engine.spawn_scripted(Pitch::C, 0, t0).unwrap();
    engine.spawn_scripted(Pitch::E, 0, t0).unwrap();
    engine.spawn_scripted(Pitch::G, 1, t0).unwrap();
    assert_eq!(engine.snapshot().active_notes, 4);
    view.take_calls();

    let press_at = t0 + Duration::from_millis(50);
    for _ in 0..3 {
        engine.key_pressed(Pitch::B, press_at);
    }

    let snap = engine.snapshot();
    assert_eq!(snap.phase, Phase::GameOver);
    assert_eq!(snap.lives, 0);
    assert_eq!(snap.active_notes, 0, "game over clears every active note");

    let calls = view.calls();
    let life_indices: Vec<u32> = calls
        .iter()
        .filter_map(|c| match c {
            ViewCall::LifeLost { life_index } => Some(*life_index),
            _ => None,
        })
        .collect();
    assert_eq!(life_indices, vec![2, 1, 0]);
    assert!(calls.iter().any(|c| matches!(c, ViewCall::GameOver { final_score: 0 })));
    // All four rendered notes were torn down: three judged, one bulk-cleared.
    let removed = calls.iter().filter(|c| matches!(c, ViewCall::RemoveNote { .. })).count();
    assert_eq!(removed, 4);
}

#[test]
fn stale_timeout_after_judgment_is_not_double_penalized() {
    let (mut engine, _view, t0, first_pitch) = started_engine();
    engine.key_pressed(first_pitch, at_the_line(t0));

    let t1 = at_the_line(t0) + Duration::from_millis(10);
    let handle = engine.spawn_scripted(Pitch::A, 0, t1).unwrap();
    engine.key_pressed(Pitch::A, at_the_line(t1));
    assert_eq!(engine.snapshot().score, 20);

    // The note's deadline still fires; it must be a safe no-op.
    engine.handle_deadline(
        DeadlineKind::NoteTimeout { handle },
        t1 + Duration::from_millis(4900),
    );

    let snap = engine.snapshot();
    assert_eq!(snap.lives, 3);
    assert_eq!(snap.score, 20);
}

#[test]
fn unjudged_note_expires_into_a_miss_at_its_deadline() {
    let (mut engine, view, t0, first_pitch) = started_engine();
    view.take_calls();

    // Drive the timeline the way the session loop does: pop everything due.
    // At t0+4.95s only the opener's timeout (t0+4.9s) is due; the first
    // spawn tick (t0+5s) is not.
    let now = t0 + Duration::from_millis(4950);
    while let Some(kind) = engine.pop_due_deadline(now) {
        engine.handle_deadline(kind, now);
    }

    let snap = engine.snapshot();
    assert_eq!(snap.lives, 2);
    assert_eq!(snap.score, 0);
    assert_eq!(snap.active_notes, 0);
    assert!(
        view.calls()
            .iter()
            .any(|c| matches!(c, ViewCall::ShowFloatingText { pitch, .. } if *pitch == first_pitch)),
        "an expired note reveals its pitch"
    );
}

#[test]
fn pressing_keys_with_nothing_on_screen_has_no_penalty() {
    let (mut engine, view, t0, first_pitch) = started_engine();
    engine.key_pressed(first_pitch, at_the_line(t0));
    assert_eq!(engine.snapshot().active_notes, 0);
    view.take_calls();

    engine.key_pressed(Pitch::F, at_the_line(t0) + Duration::from_millis(100));

    let snap = engine.snapshot();
    assert_eq!(snap.score, 10);
    assert_eq!(snap.lives, 3);
    assert!(view.calls().is_empty(), "no-op press produces no side effects");
}

#[test]
fn restart_from_game_over_begins_a_fresh_run() {
    let (mut engine, view, t0, _) = started_engine();
    let press_at = t0 + Duration::from_millis(50);
    engine.spawn_scripted(Pitch::C, 0, t0).unwrap();
    engine.spawn_scripted(Pitch::E, 0, t0).unwrap();
    for _ in 0..3 {
        engine.key_pressed(Pitch::B, press_at);
    }
    assert_eq!(engine.snapshot().phase, Phase::GameOver);
    view.take_calls();

    let t1 = press_at + Duration::from_secs(2);
    engine.restart_requested(t1);

    let snap = engine.snapshot();
    assert_eq!(snap.phase, Phase::Playing);
    assert_eq!(snap.score, 0);
    assert_eq!(snap.lives, 3);
    assert_eq!(snap.difficulty, Difficulty::Easy);
    assert_eq!(snap.active_notes, 1, "restart spawns its opener immediately");
    assert_eq!(
        view.calls()
            .iter()
            .filter(|c| matches!(c, ViewCall::RenderNote { .. }))
            .count(),
        1
    );
}

#[test]
fn wrong_key_reveals_the_true_pitch_and_costs_a_life() {
    let (mut engine, view, t0, first_pitch) = started_engine();
    engine.key_pressed(first_pitch, at_the_line(t0));

    let t1 = at_the_line(t0) + Duration::from_millis(10);
    engine.spawn_scripted(Pitch::E, 1, t1).unwrap();
    view.take_calls();
    // F is a semitone off; no enharmonic relation to E.
    engine.key_pressed(Pitch::F, at_the_line(t1));

    let snap = engine.snapshot();
    assert_eq!(snap.score, 10, "wrong key scores nothing");
    assert_eq!(snap.lives, 2);
    assert!(
        view.calls()
            .iter()
            .any(|c| matches!(c, ViewCall::ShowFloatingText { pitch, .. } if *pitch == Pitch::E)),
        "the candidate's true pitch is revealed on a mismatch"
    );
}
