use crate::game::pitch::Pitch;
use glam::Vec3;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Handle to a rendered note object, issued by the view collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewHandle(pub u64);

/// Judgment verdict for visual feedback. Color choice stays on the
/// collaborator side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

/// Outbound surface to the host's rendering/UI layer. All positions are
/// world space; implementations own meshes, materials, labels and layout.
///
/// Calls arrive from the single session timeline, never concurrently.
pub trait StageView {
    fn render_note(&mut self, pitch: Pitch, octave: u8, start: Vec3) -> ViewHandle;
    fn animate_move(&mut self, handle: ViewHandle, end: Vec3, duration: Duration);
    fn remove_note(&mut self, handle: ViewHandle);
    fn highlight_judgment_line(&mut self, verdict: Verdict);
    /// Reveals a judged or expired note's true pitch at its position.
    fn show_floating_text(&mut self, pitch: Pitch, at: Vec3);
    fn on_score_changed(&mut self, score: u32);
    fn on_life_lost(&mut self, life_index: u32);
    fn on_game_over(&mut self, final_score: u32);
}

// --- Recording double ---

/// Every `StageView` call, as data.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
    RenderNote { pitch: Pitch, octave: u8, start: Vec3, handle: ViewHandle },
    AnimateMove { handle: ViewHandle, end: Vec3, duration: Duration },
    RemoveNote { handle: ViewHandle },
    HighlightJudgmentLine { verdict: Verdict },
    ShowFloatingText { pitch: Pitch, at: Vec3 },
    ScoreChanged { score: u32 },
    LifeLost { life_index: u32 },
    GameOver { final_score: u32 },
}

#[derive(Debug, Default)]
struct RecordingInner {
    calls: Vec<ViewCall>,
    next_handle: u64,
}

/// A `StageView` that records every call. Clones share the same log, so a
/// headless host or a test can keep one clone and hand another to the
/// session.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    inner: Arc<Mutex<RecordingInner>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<ViewCall> {
        self.inner.lock().expect("recording view poisoned").calls.clone()
    }

    pub fn take_calls(&self) -> Vec<ViewCall> {
        std::mem::take(&mut self.inner.lock().expect("recording view poisoned").calls)
    }

    fn push(&self, call: ViewCall) {
        self.inner.lock().expect("recording view poisoned").calls.push(call);
    }
}

impl StageView for RecordingView {
    fn render_note(&mut self, pitch: Pitch, octave: u8, start: Vec3) -> ViewHandle {
        let mut inner = self.inner.lock().expect("recording view poisoned");
        let handle = ViewHandle(inner.next_handle);
        inner.next_handle += 1;
        inner.calls.push(ViewCall::RenderNote { pitch, octave, start, handle });
        handle
    }

    fn animate_move(&mut self, handle: ViewHandle, end: Vec3, duration: Duration) {
        self.push(ViewCall::AnimateMove { handle, end, duration });
    }

    fn remove_note(&mut self, handle: ViewHandle) {
        self.push(ViewCall::RemoveNote { handle });
    }

    fn highlight_judgment_line(&mut self, verdict: Verdict) {
        self.push(ViewCall::HighlightJudgmentLine { verdict });
    }

    fn show_floating_text(&mut self, pitch: Pitch, at: Vec3) {
        self.push(ViewCall::ShowFloatingText { pitch, at });
    }

    fn on_score_changed(&mut self, score: u32) {
        self.push(ViewCall::ScoreChanged { score });
    }

    fn on_life_lost(&mut self, life_index: u32) {
        self.push(ViewCall::LifeLost { life_index });
    }

    fn on_game_over(&mut self, final_score: u32) {
        self.push(ViewCall::GameOver { final_score });
    }
}
