use crate::scene::NodeHandle;

/// Binding relationship: maps body track `body_index` of a clip to a
/// resolved scene node.
#[derive(Debug, Clone, Copy)]
pub struct BodyBinding {
    pub body_index: usize,
    pub node: NodeHandle,
}
