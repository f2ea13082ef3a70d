use std::sync::Arc;

use smallvec::SmallVec;

use crate::animation::binding::BodyBinding;
use crate::animation::clip::AnimationClip;
use crate::errors::{AnimationError, Result};
use crate::scene::Scene;
use crate::scheduler::{AnimationScheduler, ScheduleHandle};

/// Playback state: either nothing is queued, or exactly one advance is
/// pending in the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlaybackState {
    Idle,
    Playing {
        pending: ScheduleHandle,
        next_frame: u32,
    },
}

/// Plays one clip against a set of bound scene nodes.
///
/// Each advance writes every bound body's pose at the current frame, then
/// queues the next advance `frame_interval` later; self-rescheduling is the
/// sole progression mechanism. Looping wraps to the first frame
/// unconditionally. [`cancel`](ClipPlayer::cancel) is idempotent and
/// synchronous: once it returns, no queued advance will execute, including
/// one that already expired inside the scheduler (stale handles no longer
/// match the pending state and are dropped on delivery).
///
/// The last applied frame stays observable through
/// [`current_frame`](ClipPlayer::current_frame), also while idle, so other
/// systems can save/resume or synchronize against playback.
#[derive(Debug, Clone)]
pub struct ClipPlayer {
    clip: Arc<AnimationClip>,
    bindings: SmallVec<[BodyBinding; 4]>,
    state: PlaybackState,
    current_frame: Option<u32>,
}

impl ClipPlayer {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>, bindings: SmallVec<[BodyBinding; 4]>) -> Self {
        Self {
            clip,
            bindings,
            state: PlaybackState::Idle,
            current_frame: None,
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        matches!(self.state, PlaybackState::Playing { .. })
    }

    /// Last frame whose poses were written, if playback ever ran.
    #[must_use]
    pub fn current_frame(&self) -> Option<u32> {
        self.current_frame
    }

    /// The handle of the queued advance while playing.
    #[must_use]
    pub fn pending_handle(&self) -> Option<ScheduleHandle> {
        match self.state {
            PlaybackState::Playing { pending, .. } => Some(pending),
            PlaybackState::Idle => None,
        }
    }

    /// Starts playback at `frame`, cancelling any active playback first.
    ///
    /// Fails with [`AnimationError::InvalidFrameIndex`] when `frame` is
    /// outside the clip window, and propagates scheduler failures; in the
    /// latter case the frame's poses are already written and the player is
    /// left idle (a static pose, not a crash).
    pub fn start(
        &mut self,
        frame: u32,
        scene: &mut Scene,
        scheduler: &mut dyn AnimationScheduler,
    ) -> Result<()> {
        self.cancel(scheduler);
        self.advance(frame, scene, scheduler)
    }

    /// Stops playback. Idempotent; the current frame stays observable.
    pub fn cancel(&mut self, scheduler: &mut dyn AnimationScheduler) {
        if let PlaybackState::Playing { pending, .. } =
            std::mem::replace(&mut self.state, PlaybackState::Idle)
        {
            scheduler.cancel_scheduled(pending);
        }
    }

    /// Delivers an expired scheduler handle.
    ///
    /// Advances to the stored next frame iff `handle` is the pending one;
    /// stale or foreign handles return `Ok(false)` untouched.
    pub fn on_timer_fired(
        &mut self,
        handle: ScheduleHandle,
        scene: &mut Scene,
        scheduler: &mut dyn AnimationScheduler,
    ) -> Result<bool> {
        match self.state {
            PlaybackState::Playing {
                pending,
                next_frame,
            } if pending == handle => {
                self.state = PlaybackState::Idle;
                self.advance(next_frame, scene, scheduler)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// One playback step: write poses at `frame`, then queue the next step.
    fn advance(
        &mut self,
        frame: u32,
        scene: &mut Scene,
        scheduler: &mut dyn AnimationScheduler,
    ) -> Result<()> {
        if !self.clip.contains_frame(frame) {
            return Err(AnimationError::InvalidFrameIndex {
                frame,
                first: self.clip.first_frame(),
                last: self.clip.last_frame(),
            });
        }

        // All bodies are written, in stored order, before the next advance
        // is queued.
        for binding in &self.bindings {
            let pose = self.clip.bodies()[binding.body_index].poses.pose_at(frame);
            if let Some(node) = scene.get_node_mut(binding.node) {
                pose.apply_to(&mut node.transform);
                node.transform.mark_dirty();
            } else {
                log::warn!(
                    "clip '{}': bound node for body {} despawned, write skipped",
                    self.clip.name(),
                    binding.body_index
                );
            }
        }
        self.current_frame = Some(frame);

        let next_frame = self.clip.next_frame(frame);
        match scheduler.schedule_after(self.clip.frame_interval()) {
            Ok(pending) => {
                self.state = PlaybackState::Playing {
                    pending,
                    next_frame,
                };
                Ok(())
            }
            Err(err) => {
                // Degrade to the pose just written.
                self.state = PlaybackState::Idle;
                Err(err.into())
            }
        }
    }
}
