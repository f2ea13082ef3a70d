use smallvec::SmallVec;

use crate::animation::binding::BodyBinding;
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

/// Resolves a clip's body tracks to actual scene nodes by name.
pub struct Binder;

impl Binder {
    /// Walks the subtree under `root` and binds every body track whose
    /// `node_name` matches a node.
    ///
    /// Names that resolve to nothing are skipped with a warning; a clip may
    /// legitimately carry tracks for parts an entity variant does not have.
    #[must_use]
    pub fn bind(
        scene: &Scene,
        root: NodeHandle,
        clip: &AnimationClip,
    ) -> SmallVec<[BodyBinding; 4]> {
        let mut bindings = SmallVec::new();

        for (body_index, body) in clip.bodies().iter().enumerate() {
            if let Some(node) = scene.find_node_by_name(root, &body.node_name) {
                bindings.push(BodyBinding { body_index, node });
            } else {
                log::warn!(
                    "clip '{}': no node named '{}' under bind root, track skipped",
                    clip.name(),
                    body.node_name
                );
            }
        }

        bindings
    }
}
