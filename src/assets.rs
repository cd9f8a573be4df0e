use crate::config::SoundPaths;
use crate::game::pitch::Pitch;
use crate::game::staff::MAX_OCTAVE;

/// The audible cue vocabulary of the game. `Note` cues reveal the true
/// pitch of a judged or spawned note; the rest are result jingles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Correct,
    Incorrect,
    GameOver,
    Note { pitch: Pitch, octave: u8 },
}

/// Maps sound cues to host-side file keys. Built from config so hosts can
/// reskin audio without code; an empty entry disables that cue.
///
/// This is the only asset registry the core carries; meshes, materials and
/// labels belong to the view collaborator.
#[derive(Debug, Clone)]
pub struct SoundBank {
    correct: String,
    incorrect: String,
    game_over: String,
    note_prefix: String,
}

impl SoundBank {
    pub fn from_paths(paths: &SoundPaths) -> Self {
        Self {
            correct: paths.correct.clone(),
            incorrect: paths.incorrect.clone(),
            game_over: paths.game_over.clone(),
            note_prefix: paths.note_prefix.clone(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::from_paths(&SoundPaths::default())
    }

    /// File key for a cue, or `None` when the cue is disabled or out of
    /// range. Missing files are the backend's concern; a `None` here is a
    /// configuration gap the dispatcher logs once.
    pub fn resolve(&self, cue: SoundCue) -> Option<String> {
        let key = match cue {
            SoundCue::Correct => self.correct.clone(),
            SoundCue::Incorrect => self.incorrect.clone(),
            SoundCue::GameOver => self.game_over.clone(),
            SoundCue::Note { pitch, octave } => {
                if octave > MAX_OCTAVE || self.note_prefix.is_empty() {
                    return None;
                }
                format!("{}{}_{}.ogg", self.note_prefix, pitch.file_stem(), octave)
            }
        };
        (!key.is_empty()).then_some(key)
    }
}

impl Default for SoundBank {
    fn default() -> Self {
        Self::with_defaults()
    }
}
