//! Deferred-callback scheduling for clip playback.
//!
//! Playback progression is driven entirely by timers: every advance queues
//! the next one through an [`AnimationScheduler`]. The trait is the narrow
//! capability a player needs (queue a wakeup, cancel it, deliver
//! expirations), so tests can drive playback with a hand-advanced clock
//! instead of wall time.

pub mod timer_queue;

use std::time::Duration;

use thiserror::Error;

pub use timer_queue::TimerQueue;

/// Opaque handle for a queued wakeup.
///
/// Owned exclusively by the player that scheduled it; comparing handles is
/// how stale deliveries are told apart from the live pending advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleHandle(pub(crate) u64);

/// Scheduler failure surfaced to the caller that started playback.
///
/// Not retried automatically: playback degrades to a static last pose.
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// The queue's configured capacity is exhausted.
    #[error("timer queue is full ({capacity} entries)")]
    QueueFull {
        /// Configured maximum of outstanding timers
        capacity: usize,
    },
}

/// The scheduling capability injected into clip playback.
///
/// Single-threaded and cooperative: the host pumps the scheduler, then
/// routes expired handles back to whoever scheduled them.
pub trait AnimationScheduler {
    /// Queues a wakeup `delay` from the scheduler's current time.
    fn schedule_after(&mut self, delay: Duration) -> Result<ScheduleHandle, SchedulerError>;

    /// Cancels a queued wakeup.
    ///
    /// Idempotent; a handle that already fired or was never queued is a
    /// no-op. After this returns, `poll_expired` will never yield `handle`.
    fn cancel_scheduled(&mut self, handle: ScheduleHandle);

    /// Pops the next expired wakeup, if any.
    ///
    /// Expirations are delivered in deadline order; wakeups sharing a
    /// deadline are delivered in the order they were scheduled.
    fn poll_expired(&mut self) -> Option<ScheduleHandle>;
}
