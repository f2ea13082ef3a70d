use smallvec::SmallVec;

use crate::scene::Scene;
use crate::scheduler::{AnimationScheduler, ScheduleHandle};

/// Animation system.
///
/// Drains the scheduler once per tick and pumps every
/// [`AnimationController`](crate::animation::AnimationController) stored in
/// the scene. Uses the `std::mem::take` technique to avoid borrow conflicts
/// between the controllers and the nodes they write.
pub struct AnimationSystem;

impl AnimationSystem {
    /// Runs one animation tick.
    ///
    /// Expired handles are collected first so every controller sees the same
    /// batch. A controller that fails (scheduler exhaustion, despawned clip
    /// state) is logged and left idle; animation is best-effort visual
    /// behavior and must not abort the host tick.
    pub fn update(scene: &mut Scene, scheduler: &mut dyn AnimationScheduler) {
        let mut fired: SmallVec<[ScheduleHandle; 8]> = SmallVec::new();
        while let Some(handle) = scheduler.poll_expired() {
            fired.push(handle);
        }
        if fired.is_empty() {
            return;
        }

        // Temporarily take all controllers out to avoid borrow conflicts
        let mut controllers = std::mem::take(&mut scene.controllers);

        for (_handle, controller) in &mut controllers {
            if let Err(err) = controller.on_timers_fired(&fired, scene, scheduler) {
                log::warn!("animation controller halted: {err}");
            }
        }

        // Return controllers after update
        scene.controllers = controllers;
    }
}
