use log::info;
use std::fmt;
use std::time::Duration;

pub const SCORE_PER_CORRECT: u32 = 10;
pub const STARTING_LIVES: u32 = 3;

// Upward score crossings that promote the difficulty tier. There is no
// downward path: a run only ever gets harder until restart.
pub const MEDIUM_SCORE_AT: u32 = 50;
pub const HARD_SCORE_AT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Pause between spawn ticks. Independent of travel duration so notes
    /// may overlap on screen at higher tiers.
    #[inline(always)]
    pub const fn spawn_interval(self) -> Duration {
        match self {
            Self::Easy => Duration::from_secs(5),
            Self::Medium => Duration::from_secs(3),
            Self::Hard => Duration::from_secs(2),
        }
    }

    /// Time a note takes from the spawn offset to the target offset.
    #[inline(always)]
    pub const fn travel_duration(self) -> Duration {
        match self {
            Self::Easy => Duration::from_secs(5),
            Self::Medium => Duration::from_secs(4),
            Self::Hard => Duration::from_secs(3),
        }
    }

    /// Tier for a given score. Score never decreases during a run, so the
    /// derived tier never reverts.
    #[inline(always)]
    pub const fn for_score(score: u32) -> Self {
        if score >= HARD_SCORE_AT {
            Self::Hard
        } else if score >= MEDIUM_SCORE_AT {
            Self::Medium
        } else {
            Self::Easy
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Easy => write!(f, "Easy"),
            Self::Medium => write!(f, "Medium"),
            Self::Hard => write!(f, "Hard"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the player to confirm staff placement.
    Initializing,
    ReadyToStart,
    Playing,
    GameOver,
}

/// Outcome of a correct judgment, for the session to apply side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrectOutcome {
    pub score: u32,
    /// Set when the score crossing promoted the tier; the spawn tick must be
    /// restarted at the new interval without an immediate spawn.
    pub difficulty_changed: Option<Difficulty>,
}

/// Outcome of an incorrect judgment or a timeout miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncorrectOutcome {
    /// Index of the life that was just lost (equals lives remaining).
    pub life_lost_index: u32,
    pub game_over: bool,
}

/// Score, lives, difficulty tier and game phase. Mutated only through the
/// transition methods below; every other component reads it through the
/// accessors.
#[derive(Debug, Clone)]
pub struct GameState {
    score: u32,
    lives: u32,
    difficulty: Difficulty,
    phase: Phase,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            score: 0,
            lives: STARTING_LIVES,
            difficulty: Difficulty::Easy,
            phase: Phase::Initializing,
        }
    }

    #[inline(always)]
    pub const fn score(&self) -> u32 {
        self.score
    }

    #[inline(always)]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    #[inline(always)]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[inline(always)]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// `initializing -> ready_to_start` once the anchor is frozen. Returns
    /// false (and changes nothing) from any other phase.
    pub fn placement_confirmed(&mut self) -> bool {
        if self.phase != Phase::Initializing {
            return false;
        }
        self.phase = Phase::ReadyToStart;
        info!("Placement confirmed; ready to start.");
        true
    }

    /// `ready_to_start -> playing` on first start, `game_over -> playing`
    /// on restart. Resets score, lives and difficulty either way. Returns
    /// false from any other phase.
    pub fn start(&mut self) -> bool {
        match self.phase {
            Phase::ReadyToStart | Phase::GameOver => {
                self.score = 0;
                self.lives = STARTING_LIVES;
                self.difficulty = Difficulty::Easy;
                self.phase = Phase::Playing;
                info!("Run started at {} difficulty.", self.difficulty);
                true
            }
            _ => false,
        }
    }

    /// Applies a correct judgment: score increment, then tier re-derivation
    /// from the new score.
    pub fn on_correct(&mut self) -> CorrectOutcome {
        debug_assert_eq!(self.phase, Phase::Playing);
        self.score += SCORE_PER_CORRECT;
        let tier = Difficulty::for_score(self.score);
        let difficulty_changed = (tier != self.difficulty).then_some(tier);
        if let Some(new_tier) = difficulty_changed {
            self.difficulty = new_tier;
            info!("Score {} promoted difficulty to {}.", self.score, new_tier);
        }
        CorrectOutcome {
            score: self.score,
            difficulty_changed,
        }
    }

    /// Applies a miss: one life down; at zero the run is over.
    pub fn on_incorrect(&mut self) -> IncorrectOutcome {
        debug_assert_eq!(self.phase, Phase::Playing);
        self.lives = self.lives.saturating_sub(1);
        let game_over = self.lives == 0;
        if game_over {
            self.phase = Phase::GameOver;
            info!("Out of lives; game over at score {}.", self.score);
        }
        IncorrectOutcome {
            life_lost_index: self.lives,
            game_over,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
