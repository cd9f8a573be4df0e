use crate::core::space::{AnchorPose, PlaneSample};
use glam::Vec3;
use log::{debug, info};
use smallvec::SmallVec;

/// Number of most-recent plane samples the estimate is computed over.
/// Older samples are discarded, bounding both memory and recency bias.
pub const SAMPLE_WINDOW: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementState {
    /// No valid plane sample has ever arrived.
    Initializing,
    /// At least one sample is buffered; an estimate is available.
    Detecting,
}

/// Smooths the noisy plane-detection stream into a stable anchor pose.
///
/// The estimate is the arithmetic mean of the buffered sample positions with
/// the latest sample's orientation; orientation is not smoothed. Absence of
/// an estimate is the normal "not yet ready" signal, not an error; callers
/// poll once per frame.
#[derive(Debug)]
pub struct PlacementEstimator {
    samples: SmallVec<[PlaneSample; SAMPLE_WINDOW]>,
    state: PlacementState,
}

impl PlacementEstimator {
    pub fn new() -> Self {
        Self {
            samples: SmallVec::new(),
            state: PlacementState::Initializing,
        }
    }

    #[inline(always)]
    pub const fn state(&self) -> PlacementState {
        self.state
    }

    /// Appends one raw detected-plane pose, evicting the oldest sample once
    /// the window is full. Re-entering `Detecting` is a no-op.
    pub fn submit_sample(&mut self, sample: PlaneSample) {
        if self.state == PlacementState::Initializing {
            self.state = PlacementState::Detecting;
            info!("Placement estimator: first plane sample received.");
        }
        if self.samples.len() == SAMPLE_WINDOW {
            self.samples.remove(0);
        }
        self.samples.push(sample);
    }

    /// Mean-position / latest-orientation estimate, once at least one sample
    /// exists.
    pub fn current_estimate(&self) -> Option<AnchorPose> {
        let latest = self.samples.last()?;
        let sum: Vec3 = self.samples.iter().map(|s| s.position).sum();
        Some(AnchorPose {
            position: sum / self.samples.len() as f32,
            orientation: latest.orientation,
        })
    }

    /// Freezes and consumes the current estimate. The sample buffer is
    /// discarded; a second confirm yields `None` until new samples arrive.
    pub fn confirm(&mut self) -> Option<AnchorPose> {
        let estimate = self.current_estimate();
        if let Some(pose) = &estimate {
            debug!(
                "Placement confirmed from {} samples at {:?}.",
                self.samples.len(),
                pose.position
            );
        }
        self.reset();
        estimate
    }

    /// Clears the buffer and exits `Detecting`.
    pub fn reset(&mut self) {
        self.samples.clear();
        self.state = PlacementState::Initializing;
    }
}

impl Default for PlacementEstimator {
    fn default() -> Self {
        Self::new()
    }
}
