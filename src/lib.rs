#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod errors;
pub mod scene;
pub mod scheduler;
pub mod utils;

pub use animation::{
    AnimationClip, AnimationController, AnimationSystem, Binder, BodyBinding, BodyTrack,
    ClipPlayer, Pose, PoseComponent, PoseTarget, PoseTrack,
};
pub use errors::{AnimationError, Result};
pub use scene::{ControllerHandle, Node, NodeHandle, Scene, Transform};
pub use scheduler::{AnimationScheduler, ScheduleHandle, SchedulerError, TimerQueue};
pub use utils::time::Timer;
