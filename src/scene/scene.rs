use glam::Affine3A;
use slotmap::SlotMap;

use crate::animation::AnimationController;
use crate::errors::{AnimationError, Result};
use crate::scene::node::Node;
use crate::scene::{ControllerHandle, NodeHandle};
use crate::scheduler::AnimationScheduler;

/// Scene container.
///
/// Pure data layer: node storage, hierarchy bookkeeping, and the animation
/// controllers that write into the nodes each tick.
pub struct Scene {
    pub(crate) nodes: SlotMap<NodeHandle, Node>,
    root_nodes: Vec<NodeHandle>,

    pub(crate) controllers: SlotMap<ControllerHandle, AnimationController>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            controllers: SlotMap::with_key(),
        }
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    /// Adds a node as a root, returning its handle.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Re-parents `child` under `parent`, keeping both sides in sync.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if !self.nodes.contains_key(child) || !self.nodes.contains_key(parent) {
            log::error!("attach called with a stale node handle");
            return;
        }

        self.detach_from_current_parent(child);
        self.root_nodes.retain(|&h| h != child);

        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    fn detach_from_current_parent(&mut self, child: NodeHandle) {
        if let Some(old_parent) = self.nodes[child].parent
            && let Some(parent_node) = self.nodes.get_mut(old_parent)
        {
            parent_node.children.retain(|&h| h != child);
        }
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[must_use]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    /// Root node handles, in insertion order.
    #[must_use]
    pub fn root_nodes(&self) -> &[NodeHandle] {
        &self.root_nodes
    }

    /// Depth-first name lookup in the subtree under `root`.
    #[must_use]
    pub fn find_node_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        let node = self.nodes.get(root)?;
        if node.name == name {
            return Some(root);
        }
        for &child in &node.children {
            if let Some(found) = self.find_node_by_name(child, name) {
                return Some(found);
            }
        }
        None
    }

    // ========================================================================
    // Animation controllers
    // ========================================================================

    pub fn add_controller(&mut self, controller: AnimationController) -> ControllerHandle {
        self.controllers.insert(controller)
    }

    #[must_use]
    pub fn controller(&self, handle: ControllerHandle) -> Option<&AnimationController> {
        self.controllers.get(handle)
    }

    #[must_use]
    pub fn controller_mut(
        &mut self,
        handle: ControllerHandle,
    ) -> Option<&mut AnimationController> {
        self.controllers.get_mut(handle)
    }

    /// Removes a controller; its pending timers are the caller's to cancel.
    pub fn remove_controller(
        &mut self,
        handle: ControllerHandle,
    ) -> Option<AnimationController> {
        self.controllers.remove(handle)
    }

    /// Switches a stored controller to the named clip.
    ///
    /// The controller is temporarily taken out of the scene so it can write
    /// node poses while the scene is mutably borrowed.
    pub fn play_clip(
        &mut self,
        handle: ControllerHandle,
        name: &str,
        frame: u32,
        scheduler: &mut dyn AnimationScheduler,
    ) -> Result<()> {
        let Some(slot) = self.controllers.get_mut(handle) else {
            return Err(AnimationError::StaleController);
        };
        let mut controller = std::mem::take(slot);
        let result = controller.play(name, frame, self, scheduler);
        if let Some(slot) = self.controllers.get_mut(handle) {
            *slot = controller;
        }
        result
    }

    /// Stops a stored controller's active clip. No-op on a stale handle.
    pub fn stop_clip(
        &mut self,
        handle: ControllerHandle,
        scheduler: &mut dyn AnimationScheduler,
    ) {
        if let Some(controller) = self.controllers.get_mut(handle) {
            controller.stop(scheduler);
        }
    }

    // ========================================================================
    // Transform propagation
    // ========================================================================

    /// Recomputes local matrices and propagates world matrices through the
    /// hierarchy. Called once per tick after animation has written poses.
    pub fn update_world_matrices(&mut self) {
        let roots: Vec<NodeHandle> = self.root_nodes.clone();
        for root in roots {
            self.propagate(root, Affine3A::IDENTITY);
        }
    }

    fn propagate(&mut self, handle: NodeHandle, parent_world: Affine3A) {
        let Some(node) = self.nodes.get_mut(handle) else {
            return;
        };
        node.transform.update_local_matrix();
        let world = parent_world * node.transform.local_matrix;
        node.transform.world_matrix = world;

        let children: Vec<NodeHandle> = node.children.clone();
        for child in children {
            self.propagate(child, world);
        }
    }
}
