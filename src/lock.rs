//! Lock delay state machine
//!
//! ```text
//! Falling --grounded tick--> LockPending --timer, still grounded--> Locked
//!    ^                           |
//!    +----timer, can fall again--+
//! ```
//!
//! The lock timer is the authority: ticks while it is pending never re-arm
//! or cancel it, and only its expiry decides between committing and falling.

use crate::scheduler::{Scheduler, TaskId, TaskKind};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LockPhase {
    #[default]
    Falling,
    LockPending,
    Locked,
}

/// What the owner should do once the lock timer has fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockOutcome {
    /// The piece found room below; keep falling
    Cancelled,
    /// The piece is still grounded; copy it into the board
    Commit,
}

#[derive(Debug, Clone)]
pub struct LockScheduler {
    phase: LockPhase,
    timer: Option<TaskId>,
    delay: Duration,
}

impl LockScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            phase: LockPhase::Falling,
            timer: None,
            delay,
        }
    }

    pub fn phase(&self) -> LockPhase {
        self.phase
    }

    /// A gravity tick found no room below the piece
    ///
    /// Arms the lock timer and returns true, or returns false when a timer is
    /// already outstanding.
    pub fn on_grounded(&mut self, scheduler: &mut Scheduler) -> bool {
        if self.timer.is_some() {
            return false;
        }
        self.timer = Some(scheduler.schedule(TaskKind::LockDelay, self.delay));
        self.phase = LockPhase::LockPending;
        debug!(delay_ms = self.delay.as_millis() as u64, "lock armed");
        true
    }

    /// The lock timer fired; `can_move_down` is re-evaluated by the caller
    pub fn on_timer_fired(&mut self, can_move_down: bool) -> LockOutcome {
        self.timer = None;
        if can_move_down {
            self.phase = LockPhase::Falling;
            debug!("lock cancelled, piece can fall again");
            LockOutcome::Cancelled
        } else {
            self.phase = LockPhase::Locked;
            LockOutcome::Commit
        }
    }

    /// The lock timer fired while play was suspended; drop it without committing
    pub fn abandon(&mut self) {
        self.timer = None;
        self.phase = LockPhase::Falling;
    }

    /// Forget the current piece's lock state and cancel its timer
    pub fn reset(&mut self, scheduler: &mut Scheduler) {
        if let Some(id) = self.timer.take() {
            scheduler.cancel(id);
        }
        self.phase = LockPhase::Falling;
    }
}
