use rustc_hash::FxHashMap;

use crate::animation::player::ClipPlayer;
use crate::errors::{AnimationError, Result};
use crate::scene::Scene;
use crate::scheduler::{AnimationScheduler, ScheduleHandle};

/// Per-entity clip set: named players, at most one playing.
///
/// Entities hold one player per activity ("walk", "drill", ...) and switch
/// between them; `play` cancels whatever is active before starting the
/// requested clip, so two clips never write the same nodes concurrently.
#[derive(Debug, Default)]
pub struct AnimationController {
    players: FxHashMap<String, ClipPlayer>,
    active: Option<String>,
}

impl AnimationController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a player under its clip's name, replacing any previous
    /// entry with that name.
    pub fn insert(&mut self, player: ClipPlayer) {
        self.players.insert(player.clip().name().to_owned(), player);
    }

    /// Name of the clip that was last started, if any.
    #[must_use]
    pub fn active_clip(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Current frame of the active clip's player.
    #[must_use]
    pub fn current_frame(&self) -> Option<u32> {
        self.active_player().and_then(ClipPlayer::current_frame)
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.active_player().is_some_and(ClipPlayer::is_playing)
    }

    #[must_use]
    pub fn player(&self, name: &str) -> Option<&ClipPlayer> {
        self.players.get(name)
    }

    fn active_player(&self) -> Option<&ClipPlayer> {
        self.players.get(self.active.as_deref()?)
    }

    /// Switches playback to the named clip, starting at `frame`.
    pub fn play(
        &mut self,
        name: &str,
        frame: u32,
        scene: &mut Scene,
        scheduler: &mut dyn AnimationScheduler,
    ) -> Result<()> {
        if !self.players.contains_key(name) {
            return Err(AnimationError::UnknownClip(name.to_owned()));
        }

        self.stop(scheduler);

        let player = self
            .players
            .get_mut(name)
            .ok_or_else(|| AnimationError::UnknownClip(name.to_owned()))?;
        player.start(frame, scene, scheduler)?;
        self.active = Some(name.to_owned());
        Ok(())
    }

    /// Cancels the active player. The active clip name and its last frame
    /// stay observable for save/resume.
    pub fn stop(&mut self, scheduler: &mut dyn AnimationScheduler) {
        if let Some(active) = self.active.as_deref()
            && let Some(player) = self.players.get_mut(active)
        {
            player.cancel(scheduler);
        }
    }

    /// Routes a drained batch of expired handles to this controller's
    /// players. Returns how many advances ran.
    pub fn on_timers_fired(
        &mut self,
        fired: &[ScheduleHandle],
        scene: &mut Scene,
        scheduler: &mut dyn AnimationScheduler,
    ) -> Result<usize> {
        let mut advanced = 0;
        for &handle in fired {
            for player in self.players.values_mut() {
                if player.on_timer_fired(handle, scene, scheduler)? {
                    advanced += 1;
                    break;
                }
            }
        }
        Ok(advanced)
    }
}
