pub mod app;
pub mod assets;
pub mod config;
pub mod core;
pub mod game;
pub mod view;

pub use crate::app::{Event, Session, SessionHandle};
pub use crate::assets::{SoundBank, SoundCue};
pub use crate::config::Config;
pub use crate::core::audio::{AudioHandle, NullSoundBackend, SoundBackend};
pub use crate::core::placement::{PlacementEstimator, PlacementState, SAMPLE_WINDOW};
pub use crate::core::space::{AnchorPose, PlaneSample, StaffMetrics};
pub use crate::game::pitch::{ALL_PITCHES, KEYBOARD_PITCHES, Letter, Pitch, is_enharmonic_match};
pub use crate::game::scoring::{Difficulty, GameState, Phase};
pub use crate::game::session::{DeadlineKind, Engine, Snapshot};
pub use crate::game::staff::{MAX_OCTAVE, staff_position};
pub use crate::view::{RecordingView, StageView, Verdict, ViewCall, ViewHandle};
