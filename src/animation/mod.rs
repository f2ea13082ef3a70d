pub mod binder;
pub mod binding;
pub mod clip;
pub mod controller;
pub mod player;
pub mod pose;
pub mod system;

pub use binder::Binder;
pub use binding::BodyBinding;
pub use clip::{AnimationClip, BodyTrack};
pub use controller::AnimationController;
pub use player::ClipPlayer;
pub use pose::{Pose, PoseComponent, PoseTarget, PoseTrack};
pub use system::AnimationSystem;
