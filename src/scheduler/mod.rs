//! Deferred continuations on a virtual clock.
//!
//! Timer-driven UI sequencing ("show a spinner, reveal the result later") is
//! modelled as payloads due at a point in virtual time. Each scheduled payload
//! gets a [`TaskHandle`]; cancelling the handle guarantees the payload is never
//! returned by [`Scheduler::advance`], which is how torn-down views drop their
//! pending work.

use std::time::Duration;

use tracing::trace;

/// Opaque handle to a scheduled continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug)]
struct Scheduled<T> {
    handle: TaskHandle,
    due: Duration,
    payload: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 1,
            pending: Vec::new(),
        }
    }

    /// Virtual time elapsed since the scheduler was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, payload: T) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        let due = self.now + delay;
        trace!(task = handle.0, due_ms = due.as_millis() as u64, "scheduled continuation");
        self.pending.push(Scheduled {
            handle,
            due,
            payload,
        });
        handle
    }

    /// Invalidates a pending continuation. Returns `false` if it already ran or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|task| task.handle != handle);
        before != self.pending.len()
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.pending.iter().any(|task| task.handle == handle)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Moves the clock forward and returns every payload now due, earliest first.
    ///
    /// Payloads due at the same instant come back in scheduling order.
    pub fn advance(&mut self, by: Duration) -> Vec<(TaskHandle, T)> {
        self.now += by;
        let now = self.now;
        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|task| task.due <= now);
        self.pending = waiting;
        due.sort_by(|a, b| a.due.cmp(&b.due).then(a.handle.0.cmp(&b.handle.0)));
        due.into_iter()
            .map(|task| (task.handle, task.payload))
            .collect()
    }
}
