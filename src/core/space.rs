use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// One raw plane-detection sample as reported by the host AR session,
/// in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneSample {
    pub position: Vec3,
    pub orientation: Quat,
}

/// The frozen placement the staff is anchored to. Produced once by the
/// placement estimator and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorPose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl AnchorPose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    /// Composes a staff-local offset into world space: rotate by the anchor
    /// orientation, then translate to the anchor position.
    #[inline(always)]
    pub fn world_from_staff(&self, local: Vec3) -> Vec3 {
        self.position + self.orientation * local
    }
}

impl Default for AnchorPose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// --- Staff geometry ---
//
// The staff lives in anchor-local space: x is the scroll axis (notes travel
// from spawn_x toward target_x), y is vertical staff position, z is zero.
// All distances are metres.

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffMetrics {
    /// Vertical distance between adjacent staff lines.
    pub line_spacing: f32,
    /// Half the line spacing: one staff step (line to space).
    pub half_step_height: f32,
    /// y of natural index 0, two half-steps below the lowest staff line.
    pub base_offset: f32,
    /// x where notes appear.
    pub spawn_x: f32,
    /// x where the travel animation ends.
    pub target_x: f32,
    /// x of the judgment line.
    pub judgment_line_x: f32,
}

impl Default for StaffMetrics {
    fn default() -> Self {
        let line_spacing = 0.06;
        Self {
            line_spacing,
            half_step_height: line_spacing / 2.0,
            base_offset: -line_spacing,
            spawn_x: 0.5,
            target_x: -0.5,
            judgment_line_x: -0.4,
        }
    }
}

impl StaffMetrics {
    /// Staff-local position of a note at scroll offset `x` and staff
    /// height `y`.
    #[inline(always)]
    pub const fn note_local(&self, x: f32, y: f32) -> Vec3 {
        Vec3::new(x, y, 0.0)
    }
}
