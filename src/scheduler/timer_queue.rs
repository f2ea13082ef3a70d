use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

use rustc_hash::FxHashSet;

use crate::scheduler::{AnimationScheduler, ScheduleHandle, SchedulerError};

/// A queued deadline. Ordered by due time, then by handle so that wakeups
/// sharing a deadline fire in scheduling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    due: Duration,
    handle: ScheduleHandle,
}

/// Deterministic delay queue over a virtual monotonic clock.
///
/// The clock only moves when the host calls [`TimerQueue::advance_by`],
/// typically with the render loop's frame delta (see
/// [`Timer`](crate::utils::time::Timer)). Tests feed it hand-written
/// durations, which makes every playback sequence reproducible.
///
/// Cancellation is synchronous: a cancelled handle is dropped from the live
/// set immediately and will never come out of [`poll_expired`], even if its
/// deadline has already passed.
///
/// [`poll_expired`]: AnimationScheduler::poll_expired
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_handle: u64,
    deadlines: BinaryHeap<Reverse<Entry>>,
    /// Handles that are scheduled and neither fired nor cancelled.
    live: FxHashSet<ScheduleHandle>,
    capacity: Option<usize>,
}

impl TimerQueue {
    /// Creates an unbounded queue starting at virtual time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a queue that holds at most `capacity` outstanding timers.
    ///
    /// Scheduling beyond the bound fails with [`SchedulerError::QueueFull`].
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Moves the virtual clock forward.
    pub fn advance_by(&mut self, dt: Duration) {
        self.now += dt;
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of outstanding (scheduled, unexpired, uncancelled) timers.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.live.len()
    }
}

impl AnimationScheduler for TimerQueue {
    fn schedule_after(&mut self, delay: Duration) -> Result<ScheduleHandle, SchedulerError> {
        if let Some(capacity) = self.capacity
            && self.live.len() >= capacity
        {
            return Err(SchedulerError::QueueFull { capacity });
        }

        let handle = ScheduleHandle(self.next_handle);
        self.next_handle += 1;

        self.deadlines.push(Reverse(Entry {
            due: self.now + delay,
            handle,
        }));
        self.live.insert(handle);
        Ok(handle)
    }

    fn cancel_scheduled(&mut self, handle: ScheduleHandle) {
        // Lazy cancellation: the heap entry stays behind and is skipped on pop.
        self.live.remove(&handle);
    }

    fn poll_expired(&mut self) -> Option<ScheduleHandle> {
        while let Some(Reverse(entry)) = self.deadlines.peek() {
            if entry.due > self.now {
                return None;
            }
            let entry = self.deadlines.pop().map(|Reverse(e)| e)?;
            if self.live.remove(&entry.handle) {
                return Some(entry.handle);
            }
            // Cancelled entry, keep draining.
        }
        None
    }
}
