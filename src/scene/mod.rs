//! Minimal scene slice the animation subsystem binds onto:
//! - Node: named scene node (hierarchy and transform)
//! - Transform: TRS component with cached matrices
//! - Scene: node and controller storage

pub mod node;
pub mod scene;
pub mod transform;

pub use node::Node;
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    /// Handle to a [`Node`] stored in a [`Scene`].
    pub struct NodeHandle;
    /// Handle to an [`AnimationController`](crate::animation::AnimationController)
    /// stored in a [`Scene`].
    pub struct ControllerHandle;
}
