use std::fmt;

use glam::{Quat, Vec3};

use crate::errors::{AnimationError, Result};

/// One discrete TRS sample.
///
/// Poses are written as-is: the displayed motion is only as smooth as the
/// sampled pose density, there is no interpolation between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Pose {
    #[must_use]
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Writes all three components onto a target, in TRS order.
    pub fn apply_to(&self, target: &mut impl PoseTarget) {
        target.set_position(self.position);
        target.set_rotation(self.rotation);
        target.set_scale(self.scale);
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// Narrow mutation interface for externally-owned transformable objects.
///
/// Playback never assumes a concrete math-object shape beyond these three
/// setters. [`Transform`](crate::scene::Transform) implements it; so can any
/// renderer-side object.
pub trait PoseTarget {
    fn set_position(&mut self, position: Vec3);
    fn set_rotation(&mut self, rotation: Quat);
    fn set_scale(&mut self, scale: Vec3);
}

/// Which of the three pose sequences a table error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoseComponent {
    Position,
    Rotation,
    Scale,
}

impl fmt::Display for PoseComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoseComponent::Position => f.write_str("position"),
            PoseComponent::Rotation => f.write_str("rotation"),
            PoseComponent::Scale => f.write_str("scale"),
        }
    }
}

/// Fixed-shape pose table: three parallel sequences, one entry per frame
/// index, indexed identically across all bodies of a clip.
///
/// Coverage of the clip's frame window is validated when the clip is
/// assembled (see [`PoseTrack::validate_coverage`]), which is what makes
/// [`pose_at`](PoseTrack::pose_at) a plain index during playback.
#[derive(Debug, Clone)]
pub struct PoseTrack {
    positions: Vec<Vec3>,
    rotations: Vec<Quat>,
    scales: Vec<Vec3>,
}

impl PoseTrack {
    #[must_use]
    pub fn new(positions: Vec<Vec3>, rotations: Vec<Quat>, scales: Vec<Vec3>) -> Self {
        Self {
            positions,
            rotations,
            scales,
        }
    }

    /// Builds a table from whole poses.
    #[must_use]
    pub fn from_poses(poses: &[Pose]) -> Self {
        Self {
            positions: poses.iter().map(|p| p.position).collect(),
            rotations: poses.iter().map(|p| p.rotation).collect(),
            scales: poses.iter().map(|p| p.scale).collect(),
        }
    }

    /// Checks that every sequence covers frame indices `0..=last_frame`.
    ///
    /// `body` names the owning body track in the error.
    pub fn validate_coverage(&self, body: &str, last_frame: u32) -> Result<()> {
        let required = last_frame as usize + 1;
        let sequences = [
            (PoseComponent::Position, self.positions.len()),
            (PoseComponent::Rotation, self.rotations.len()),
            (PoseComponent::Scale, self.scales.len()),
        ];
        for (component, len) in sequences {
            if len < required {
                return Err(AnimationError::MismatchedPoseTable {
                    body: body.to_owned(),
                    component,
                    len,
                    required,
                });
            }
        }
        Ok(())
    }

    /// The pose at a frame index.
    ///
    /// # Panics
    /// If `frame` exceeds the validated coverage. Playback guards the frame
    /// window before indexing, so this is unreachable through the player.
    #[must_use]
    pub fn pose_at(&self, frame: u32) -> Pose {
        let i = frame as usize;
        Pose {
            position: self.positions[i],
            rotation: self.rotations[i],
            scale: self.scales[i],
        }
    }
}
