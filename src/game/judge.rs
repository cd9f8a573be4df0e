use crate::game::note::{NoteHandle, NoteInstance};
use crate::game::pitch::Pitch;

/// Resolution of a key press against the field, before side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// The candidate matched (directly or through its enharmonic alias).
    Hit { handle: NoteHandle, pitch: Pitch },
    /// A candidate was at the line but the wrong key was pressed; `actual`
    /// is the candidate's true pitch to reveal.
    WrongPitch { handle: NoteHandle, actual: Pitch },
    /// No note is near enough to judge, but notes are in flight: the head
    /// pays for the stray press.
    NoCandidateMiss { handle: NoteHandle, pitch: Pitch },
    /// Nothing on screen; stray presses carry no penalty.
    Ignored,
}

/// Resolves a pressed key against the current judgment candidate and the
/// head of the active sequence. Pure: the session applies the outcome.
///
/// Enharmonic aliasing is honored in both directions even though the
/// on-screen keyboard only emits sharp spellings.
pub fn resolve_press(
    pressed: Pitch,
    candidate: Option<&NoteInstance>,
    head: Option<&NoteInstance>,
) -> PressOutcome {
    match candidate {
        Some(note) => {
            if pressed.matches_key(note.pitch) {
                PressOutcome::Hit {
                    handle: note.handle,
                    pitch: note.pitch,
                }
            } else {
                PressOutcome::WrongPitch {
                    handle: note.handle,
                    actual: note.pitch,
                }
            }
        }
        None => match head {
            Some(note) => PressOutcome::NoCandidateMiss {
                handle: note.handle,
                pitch: note.pitch,
            },
            None => PressOutcome::Ignored,
        },
    }
}
