//! Cancellable one-shot tasks on a virtual clock
//!
//! The session owns one `Scheduler`. Callers push tasks with a delay, then
//! drain them in deadline order with [`Scheduler::pop_due`]. Nothing fires
//! on its own; time only moves when the owner says so.

use std::time::Duration;

/// What a scheduled task does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Periodic gravity step, re-armed by the owner after each firing
    Gravity,
    /// Grace period before a grounded piece is committed
    LockDelay,
    /// Highlight window before full rows are removed
    ClearAnimation,
}

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
struct ScheduledTask {
    id: TaskId,
    kind: TaskKind,
    due: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: Duration,
    next_id: u64,
    tasks: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time on the virtual clock
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule a task to fire `delay` from now
    pub fn schedule(&mut self, kind: TaskKind, delay: Duration) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(ScheduledTask {
            id,
            kind,
            due: self.now + delay,
        });
        id
    }

    /// Cancel a task, returns false if it already fired or was cancelled
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    /// Cancel every pending task of a kind, returns how many were dropped
    pub fn cancel_kind(&mut self, kind: TaskKind) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.kind != kind);
        before - self.tasks.len()
    }

    pub fn is_pending(&self, kind: TaskKind) -> bool {
        self.tasks.iter().any(|task| task.kind == kind)
    }

    /// Remove and return the earliest task due at or before `until`
    ///
    /// Ties go to the task scheduled first. The clock moves to the task's
    /// deadline so anything scheduled while handling it is timed from there.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TaskId, TaskKind)> {
        let (pos, _) = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due <= until)
            .min_by_key(|(_, task)| (task.due, task.id))?;
        let task = self.tasks.remove(pos);
        self.now = self.now.max(task.due);
        Some((task.id, task.kind))
    }

    /// Move the clock forward without firing anything
    pub fn advance_to(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }

    /// Drop every pending task and rewind the clock
    pub fn reset(&mut self) {
        self.tasks.clear();
        self.now = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_pop_in_deadline_order() {
        let mut scheduler = Scheduler::new();
        let late = scheduler.schedule(TaskKind::ClearAnimation, ms(500));
        let early = scheduler.schedule(TaskKind::LockDelay, ms(300));

        assert_eq!(scheduler.pop_due(ms(250)), None);
        assert_eq!(scheduler.pop_due(ms(1000)), Some((early, TaskKind::LockDelay)));
        assert_eq!(scheduler.now(), ms(300));
        assert_eq!(scheduler.pop_due(ms(1000)), Some((late, TaskKind::ClearAnimation)));
        assert_eq!(scheduler.pop_due(ms(1000)), None);
    }

    #[test]
    fn test_ties_fire_in_schedule_order() {
        let mut scheduler = Scheduler::new();
        let first = scheduler.schedule(TaskKind::Gravity, ms(300));
        let second = scheduler.schedule(TaskKind::LockDelay, ms(300));
        assert_eq!(scheduler.pop_due(ms(300)).map(|(id, _)| id), Some(first));
        assert_eq!(scheduler.pop_due(ms(300)).map(|(id, _)| id), Some(second));
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(TaskKind::LockDelay, ms(300));
        assert!(scheduler.is_pending(TaskKind::LockDelay));
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(!scheduler.is_pending(TaskKind::LockDelay));
        assert_eq!(scheduler.pop_due(ms(1000)), None);
    }

    #[test]
    fn test_cancel_kind_and_reset() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(TaskKind::Gravity, ms(300));
        let lock = scheduler.schedule(TaskKind::LockDelay, ms(300));
        scheduler.advance_to(ms(100));
        assert_eq!(scheduler.cancel_kind(TaskKind::Gravity), 1);
        assert_eq!(scheduler.pop_due(ms(1000)), Some((lock, TaskKind::LockDelay)));
        assert_eq!(scheduler.now(), ms(300));

        scheduler.schedule(TaskKind::Gravity, ms(300));
        scheduler.reset();
        assert_eq!(scheduler.now(), Duration::ZERO);
        assert!(!scheduler.is_pending(TaskKind::Gravity));
    }

    #[test]
    fn test_clock_never_moves_backwards() {
        let mut scheduler = Scheduler::new();
        scheduler.advance_to(ms(400));
        scheduler.advance_to(ms(100));
        assert_eq!(scheduler.now(), ms(400));
    }
}
