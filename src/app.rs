use crate::config::Config;
use crate::core::audio::AudioHandle;
use crate::core::space::AnchorPose;
use crate::game::pitch::Pitch;
use crate::game::session::Engine;
use crate::view::StageView;
use log::{debug, info};
use rand::rngs::StdRng;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::thread::{self, JoinHandle};
use std::time::Instant;

/* -------------------- session events -------------------- */

#[derive(Debug, Clone)]
pub enum Event {
    PlacementConfirmed(AnchorPose),
    StartRequested,
    RestartRequested,
    KeyPressed(Pitch),
    Shutdown,
}

/// Cheap cloneable input surface for UI and input collaborators. Sends are
/// non-blocking; events are serialized by the session thread.
#[derive(Clone)]
pub struct SessionHandle {
    sender: Sender<Event>,
}

impl SessionHandle {
    #[inline(always)]
    fn send(&self, event: Event) {
        if self.sender.send(event).is_err() {
            debug!("Session gone; dropping event.");
        }
    }

    pub fn placement_confirmed(&self, pose: AnchorPose) {
        self.send(Event::PlacementConfirmed(pose));
    }

    pub fn start_requested(&self) {
        self.send(Event::StartRequested);
    }

    pub fn restart_requested(&self) {
        self.send(Event::RestartRequested);
    }

    pub fn key_pressed(&self, pitch: Pitch) {
        self.send(Event::KeyPressed(pitch));
    }

    pub fn shutdown(&self) {
        self.send(Event::Shutdown);
    }
}

/// Owns the session thread: one cooperative timeline on which every
/// game-state mutation happens. Spawn ticks and note timeouts are
/// deadline-based (`recv_timeout` until the nearest deadline), never
/// busy-waited.
pub struct Session {
    handle: SessionHandle,
    thread: Option<JoinHandle<()>>,
}

impl Session {
    pub fn spawn(config: Config, view: Box<dyn StageView + Send>, audio: AudioHandle) -> Self {
        let (sender, receiver) = channel::<Event>();
        let thread = thread::Builder::new()
            .name("staffsight-session".to_string())
            .spawn(move || {
                let engine = Engine::new(config, view, audio, rand::make_rng::<StdRng>());
                run_loop(engine, receiver);
            })
            .expect("failed to spawn session thread");
        Self {
            handle: SessionHandle { sender },
            thread: Some(thread),
        }
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Shuts the timeline down and waits for it to finish.
    pub fn join(mut self) {
        self.handle.shutdown();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.handle.shutdown();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn run_loop(mut engine: Engine, receiver: Receiver<Event>) {
    info!("Session timeline running.");
    loop {
        // Fire everything that is due before waiting again.
        let now = Instant::now();
        while let Some(kind) = engine.pop_due_deadline(now) {
            engine.handle_deadline(kind, now);
        }

        let received = match engine.next_deadline() {
            Some(at) => {
                let wait = at.saturating_duration_since(Instant::now());
                match receiver.recv_timeout(wait) {
                    Ok(event) => Some(event),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match receiver.recv() {
                Ok(event) => Some(event),
                Err(_) => break,
            },
        };

        if let Some(event) = received {
            let now = Instant::now();
            match event {
                Event::PlacementConfirmed(pose) => engine.placement_confirmed(pose, now),
                Event::StartRequested => engine.start_requested(now),
                Event::RestartRequested => engine.restart_requested(now),
                Event::KeyPressed(pitch) => engine.key_pressed(pitch, now),
                Event::Shutdown => break,
            }
        }
    }
    info!("Session timeline stopped.");
}
