//! Deadline queue for delayed orchestrator work

use std::time::Instant;

/// Work that becomes due at a deadline. Each task carries the token that
/// was current when it was scheduled so late arrivals can be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    TimerTick { generation: u64 },
    Reset { epoch: u64 },
}

#[derive(Debug, Default)]
pub struct Scheduler {
    entries: Vec<(Instant, Task)>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, at: Instant, task: Task) {
        let pos = self.entries.partition_point(|(t, _)| *t <= at);
        self.entries.insert(pos, (at, task));
    }

    /// Drop pending tasks matching `pred`
    pub fn cancel(&mut self, pred: impl Fn(&Task) -> bool) {
        self.entries.retain(|(_, task)| !pred(task));
    }

    /// Remove and return the tasks due at `now`, earliest first
    pub fn take_due(&mut self, now: Instant) -> Vec<Task> {
        let split = self.entries.partition_point(|(t, _)| *t <= now);
        self.entries.drain(..split).map(|(_, task)| task).collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.first().map(|(t, _)| *t)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
