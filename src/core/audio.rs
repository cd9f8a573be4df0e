use crate::assets::{SoundBank, SoundCue};
use log::{debug, warn};
use rustc_hash::FxHashSet;
use std::sync::mpsc::{Sender, channel};
use std::thread;

/* ============================== Public API ============================== */

/// Platform audio collaborator. `play_file` must be fire-and-forget and
/// tolerant of missing files: log and return, never fail the game.
pub trait SoundBackend: Send {
    fn play_file(&self, file_key: &str);
}

/// A backend that plays nothing. Useful for headless hosts and tests.
pub struct NullSoundBackend;

impl SoundBackend for NullSoundBackend {
    fn play_file(&self, _file_key: &str) {}
}

// Commands to the dispatcher thread.
enum AudioCommand {
    Play(SoundCue),
}

/// Cheap cloneable sender into the dispatcher thread. The thread exits once
/// every handle is dropped.
#[derive(Clone)]
pub struct AudioHandle {
    command_sender: Sender<AudioCommand>,
}

impl AudioHandle {
    /// Fire-and-forget. A dead dispatcher only costs the sound.
    pub fn play(&self, cue: SoundCue) {
        if self.command_sender.send(AudioCommand::Play(cue)).is_err() {
            debug!("Audio dispatcher gone; dropping cue {cue:?}.");
        }
    }
}

/// Starts the dispatcher worker. Cue resolution and backend calls happen off
/// the game timeline; unresolvable cues are logged once per file key and
/// skipped.
pub fn spawn(bank: SoundBank, backend: Box<dyn SoundBackend>) -> AudioHandle {
    let (command_sender, receiver) = channel::<AudioCommand>();
    thread::Builder::new()
        .name("staffsight-audio".to_string())
        .spawn(move || {
            let mut warned: FxHashSet<String> = FxHashSet::default();
            for command in receiver {
                match command {
                    AudioCommand::Play(cue) => match bank.resolve(cue) {
                        Some(file_key) => backend.play_file(&file_key),
                        None => {
                            let tag = format!("{cue:?}");
                            if warned.insert(tag) {
                                warn!("No sound mapped for cue {cue:?}; continuing without it.");
                            }
                        }
                    },
                }
            }
        })
        .expect("failed to spawn audio dispatcher thread");
    AudioHandle { command_sender }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::pitch::Pitch;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::mpsc;
    use std::time::Duration;

    struct CollectingBackend {
        played: Arc<Mutex<Vec<String>>>,
        done: mpsc::Sender<()>,
    }

    impl SoundBackend for CollectingBackend {
        fn play_file(&self, file_key: &str) {
            self.played.lock().unwrap().push(file_key.to_string());
            let _ = self.done.send(());
        }
    }

    #[test]
    fn cues_reach_the_backend_with_resolved_keys() {
        let played = Arc::new(Mutex::new(Vec::new()));
        let (done_tx, done_rx) = mpsc::channel();
        let handle = spawn(
            SoundBank::with_defaults(),
            Box::new(CollectingBackend { played: Arc::clone(&played), done: done_tx }),
        );

        handle.play(SoundCue::Correct);
        handle.play(SoundCue::Note { pitch: Pitch::A, octave: 0 });
        for _ in 0..2 {
            done_rx
                .recv_timeout(Duration::from_secs(5))
                .expect("dispatcher should play both cues");
        }

        let played = played.lock().unwrap();
        assert_eq!(
            *played,
            vec!["sounds/correct.ogg".to_string(), "sounds/notes/a_0.ogg".to_string()]
        );
    }

    #[test]
    fn unresolvable_cues_are_swallowed() {
        let bank = SoundBank::from_paths(&crate::config::SoundPaths {
            correct: String::new(),
            ..Default::default()
        });
        let handle = spawn(bank, Box::new(NullSoundBackend));
        // Must not panic or error; the cue simply vanishes.
        handle.play(SoundCue::Correct);
        handle.play(SoundCue::Correct);
    }
}
