//! Single-threaded scheduler of cancellable delayed tasks.
//!
//! DESIGN
//! ======
//! Replica timers (the animation tick, the deceleration timeout) are owned
//! by one queue the caller advances with its own clock: the cli drives it
//! from tokio time, tests drive it by hand. A task fires at most once;
//! recurring work re-schedules itself from the handler. Cancellation is by
//! id, so superseded tasks (an old cycle's resolution, a stale tick) are
//! dropped without ever firing.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::HashSet;

/// Handle to a scheduled task, used only for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

/// Work the replica performs when a deadline passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Advance the Spinning animation counter.
    Tick,
    /// Resolve the deceleration of the given spin cycle.
    Resolve { cycle: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    due_ms: u64,
    seq: u64,
    task: Task,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Deadline first, insertion order as the tiebreak — firing order is
        // deterministic for equal deadlines.
        (self.due_ms, self.seq).cmp(&(other.due_ms, other.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// The task queue. `now` only moves forward via [`Scheduler::advance_to`].
#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_seq: u64,
    queue: BinaryHeap<Reverse<Entry>>,
    cancelled: HashSet<u64>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The scheduler's current clock, in caller-defined milliseconds.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `task` to fire `after_ms` from now.
    pub fn schedule(&mut self, after_ms: u64, task: Task) -> TaskId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue
            .push(Reverse(Entry { due_ms: self.now_ms + after_ms, seq, task }));
        TaskId(seq)
    }

    /// Cancel a task. Cancelling an already-fired or unknown id is a no-op.
    pub fn cancel(&mut self, id: TaskId) {
        self.cancelled.insert(id.0);
    }

    /// Earliest pending deadline, for callers that sleep between advances.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        // Skip cancelled entries without disturbing the heap.
        self.queue
            .iter()
            .filter(|Reverse(e)| !self.cancelled.contains(&e.seq))
            .map(|Reverse(e)| e.due_ms)
            .min()
    }

    /// Move the clock to `now_ms` and return every task that came due, in
    /// deadline order. A clock that does not move returns nothing new.
    pub fn advance_to(&mut self, now_ms: u64) -> Vec<Task> {
        self.now_ms = self.now_ms.max(now_ms);
        let mut due = Vec::new();
        while let Some(Reverse(entry)) = self.queue.peek().copied() {
            if entry.due_ms > self.now_ms {
                break;
            }
            self.queue.pop();
            if self.cancelled.remove(&entry.seq) {
                continue;
            }
            due.push(entry.task);
        }
        due
    }

    /// Drop every pending task. Used on teardown so nothing mutates state
    /// after the session leaves the channel.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.cancelled.clear();
    }
}

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod tests;
