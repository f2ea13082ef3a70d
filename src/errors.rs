//! Error Types
//!
//! The main error type [`AnimationError`] covers all failure modes of the
//! animation subsystem:
//! - Clip construction and validation errors
//! - Playback errors (out-of-window frame indices)
//! - Scheduler failures surfaced while (re)scheduling an advance
//!
//! All public APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, AnimationError>`.

use thiserror::Error;

use crate::animation::PoseComponent;
use crate::scheduler::SchedulerError;

/// The main error type for the animation subsystem.
#[derive(Error, Debug)]
pub enum AnimationError {
    // ========================================================================
    // Clip Construction Errors
    // ========================================================================
    /// The clip's frame window is inverted.
    #[error("invalid frame window: first frame {first} > last frame {last}")]
    InvalidFrameWindow {
        /// First frame of the window
        first: u32,
        /// Last frame of the window
        last: u32,
    },

    /// The frame step must advance playback by at least one frame.
    #[error("frame step must be a positive integer")]
    InvalidFrameStep,

    /// The playback rate must be a positive, finite frames-per-second value.
    #[error("frames per second must be positive and finite, got {0}")]
    InvalidFrameRate(f32),

    /// A body's pose table does not cover the clip's frame window.
    ///
    /// Raised when the clip is assembled, never mid-playback.
    #[error(
        "{component} track for body '{body}' holds {len} poses, window requires {required}"
    )]
    MismatchedPoseTable {
        /// Name of the body whose table is short
        body: String,
        /// Which of the three pose sequences is short
        component: PoseComponent,
        /// Actual sequence length
        len: usize,
        /// Required sequence length (`last_frame + 1`)
        required: usize,
    },

    // ========================================================================
    // Playback Errors
    // ========================================================================
    /// A frame index outside the clip's window was passed to playback.
    #[error("frame index {frame} outside clip window [{first}, {last}]")]
    InvalidFrameIndex {
        /// The offending frame index
        frame: u32,
        /// First frame of the window
        first: u32,
        /// Last frame of the window
        last: u32,
    },

    /// No clip with the given name is registered on the controller.
    #[error("no clip named '{0}' is registered")]
    UnknownClip(String),

    /// The controller handle no longer points at a live controller.
    #[error("animation controller handle is stale")]
    StaleController,

    // ========================================================================
    // Scheduler Errors
    // ========================================================================
    /// The scheduler refused to queue the next advance.
    #[error("scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),
}

/// Alias for `Result<T, AnimationError>`.
pub type Result<T> = std::result::Result<T, AnimationError>;
