use std::time::Duration;

use crate::animation::pose::PoseTrack;
use crate::errors::{AnimationError, Result};

/// A body bound to a clip: the name of the scene node it drives plus its
/// per-frame pose table.
#[derive(Debug, Clone)]
pub struct BodyTrack {
    /// Scene node name resolved at bind time.
    pub node_name: String,
    /// One pose per frame index, covering the clip's whole window.
    pub poses: PoseTrack,
}

impl BodyTrack {
    #[must_use]
    pub fn new(node_name: impl Into<String>, poses: PoseTrack) -> Self {
        Self {
            node_name: node_name.into(),
            poses,
        }
    }
}

/// A named animation clip: an inclusive frame window, playback pacing, and
/// the body pose tables sampled during playback.
///
/// Clips are immutable once assembled and shared between players via `Arc`.
/// All invariants are checked in [`AnimationClip::new`], so playback never
/// revalidates:
/// - `first_frame <= last_frame`
/// - `frame_step >= 1`
/// - `frames_per_second` positive and finite
/// - every body's pose table covers the window
#[derive(Debug, Clone)]
pub struct AnimationClip {
    name: String,
    first_frame: u32,
    last_frame: u32,
    frame_step: u32,
    frames_per_second: f32,
    bodies: Vec<BodyTrack>,
}

impl AnimationClip {
    pub fn new(
        name: impl Into<String>,
        first_frame: u32,
        last_frame: u32,
        frame_step: u32,
        frames_per_second: f32,
        bodies: Vec<BodyTrack>,
    ) -> Result<Self> {
        if first_frame > last_frame {
            return Err(AnimationError::InvalidFrameWindow {
                first: first_frame,
                last: last_frame,
            });
        }
        if frame_step == 0 {
            return Err(AnimationError::InvalidFrameStep);
        }
        if !(frames_per_second.is_finite() && frames_per_second > 0.0) {
            return Err(AnimationError::InvalidFrameRate(frames_per_second));
        }
        for body in &bodies {
            body.poses.validate_coverage(&body.node_name, last_frame)?;
        }

        Ok(Self {
            name: name.into(),
            first_frame,
            last_frame,
            frame_step,
            frames_per_second,
            bodies,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn first_frame(&self) -> u32 {
        self.first_frame
    }

    #[must_use]
    pub fn last_frame(&self) -> u32 {
        self.last_frame
    }

    #[must_use]
    pub fn frame_step(&self) -> u32 {
        self.frame_step
    }

    #[must_use]
    pub fn frames_per_second(&self) -> f32 {
        self.frames_per_second
    }

    /// Body tracks in their stored order, which is also the write order
    /// during playback.
    #[must_use]
    pub fn bodies(&self) -> &[BodyTrack] {
        &self.bodies
    }

    /// Number of playable frames in the window.
    #[must_use]
    pub fn frame_count(&self) -> u32 {
        self.last_frame - self.first_frame + 1
    }

    /// Whether `frame` lies inside the playable window.
    #[must_use]
    pub fn contains_frame(&self, frame: u32) -> bool {
        (self.first_frame..=self.last_frame).contains(&frame)
    }

    /// Wrap-to-start frame progression.
    ///
    /// Stepping past `last_frame` resets to `first_frame` unconditionally;
    /// with a step that does not divide the window length the frame before
    /// the wrap may land short of `last_frame`.
    #[must_use]
    pub fn next_frame(&self, frame: u32) -> u32 {
        match frame.checked_add(self.frame_step) {
            Some(next) if next <= self.last_frame => next,
            _ => self.first_frame,
        }
    }

    /// Wall-clock pause between displayed frames.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frames_per_second))
    }
}
