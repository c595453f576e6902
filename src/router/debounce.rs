use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScheduledTask {
    id: u64,
    due: Instant,
}

/// At most one pending delayed task. Scheduling again replaces it.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<ScheduledTask>,
    next_id: u64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            next_id: 0,
        }
    }

    /// Cancel any pending task and schedule a new one `delay` after `now`.
    /// Returns the new task's id.
    pub fn schedule(&mut self, now: Instant) -> u64 {
        self.next_id += 1;
        self.pending = Some(ScheduledTask {
            id: self.next_id,
            due: now + self.delay,
        });
        self.next_id
    }

    /// Drop the pending task, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Take the pending task when it is due at `now`.
    pub fn fire_if_due(&mut self, now: Instant) -> Option<u64> {
        match self.pending {
            Some(task) if task.due <= now => {
                self.pending = None;
                Some(task.id)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|task| task.due)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}
