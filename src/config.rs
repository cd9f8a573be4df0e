use crate::core::space::StaffMetrics;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Judgment-line tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgmentTuning {
    /// Capture radius around the judgment line on the scroll axis, metres.
    pub critical_distance: f32,
    /// The note-timeout deadline fires this long before the travel ends.
    pub timeout_lead_s: f32,
}

impl Default for JudgmentTuning {
    fn default() -> Self {
        Self {
            critical_distance: 0.12,
            timeout_lead_s: 0.1,
        }
    }
}

/// Host-side file keys for the sound cues. Empty string disables a cue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundPaths {
    pub correct: String,
    pub incorrect: String,
    pub game_over: String,
    /// Per-note samples are looked up as `{prefix}{stem}_{octave}.ogg`.
    pub note_prefix: String,
}

impl Default for SoundPaths {
    fn default() -> Self {
        Self {
            correct: "sounds/correct.ogg".to_string(),
            incorrect: "sounds/incorrect.ogg".to_string(),
            game_over: "sounds/game_over.ogg".to_string(),
            note_prefix: "sounds/notes/".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub staff: StaffMetrics,
    pub judgment: JudgmentTuning,
    pub sounds: SoundPaths,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read '{}': {e}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| format!("failed to parse '{}': {e}", path.display()))?;
        Ok(config.validated())
    }

    /// Loads `path`, falling back to defaults on any failure. A missing or
    /// malformed file degrades the experience, it does not stop the game.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{e}; using default config.");
                Self::default().validated()
            }
        }
    }

    /// Repairs out-of-range values in place of rejecting the whole file.
    pub fn validated(mut self) -> Self {
        let defaults = StaffMetrics::default();
        if self.staff.half_step_height <= 0.0 {
            warn!(
                "Config: non-positive half_step_height {}; using {}.",
                self.staff.half_step_height, defaults.half_step_height
            );
            self.staff.half_step_height = defaults.half_step_height;
        }
        if self.staff.line_spacing <= 0.0 {
            warn!(
                "Config: non-positive line_spacing {}; using {}.",
                self.staff.line_spacing, defaults.line_spacing
            );
            self.staff.line_spacing = defaults.line_spacing;
        }
        if self.staff.spawn_x <= self.staff.judgment_line_x {
            warn!("Config: spawn_x must lie before the judgment line; using defaults.");
            self.staff.spawn_x = defaults.spawn_x;
            self.staff.target_x = defaults.target_x;
            self.staff.judgment_line_x = defaults.judgment_line_x;
        }
        if self.judgment.critical_distance <= 0.0 {
            let d = JudgmentTuning::default().critical_distance;
            warn!(
                "Config: non-positive critical_distance {}; using {d}.",
                self.judgment.critical_distance
            );
            self.judgment.critical_distance = d;
        }
        if self.judgment.timeout_lead_s < 0.0 {
            warn!(
                "Config: negative timeout_lead_s {}; using 0.",
                self.judgment.timeout_lead_s
            );
            self.judgment.timeout_lead_s = 0.0;
        }
        self
    }
}
