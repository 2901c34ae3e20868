//! Client-side table hold with a fixed countdown.
//!
//! DESIGN
//! ======
//! [`HoldTimer`] is a pure state machine advanced one second per `tick()`.
//! It knows nothing about clocks so it can be driven deterministically.
//! The real one-second schedule is a [`CountdownGuard`]: a tokio task that
//! lives exactly as long as the guard value. Dropping the guard aborts the
//! task, so every exit from `Holding` that drops the guard also stops the
//! ticks.
//!
//! A hold is optimistic UI only. The backend decides at submission time
//! whether the table is still free; nothing here locks anything server-side.

#[cfg(test)]
#[path = "hold_test.rs"]
mod hold_test;

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use crate::config::DEFAULT_HOLD_SECS;
use crate::net::types::Id;

/// Identifies one hold so ticks scheduled for an earlier hold are ignored.
pub type HoldGeneration = u64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HoldPhase {
    #[default]
    Idle,
    Holding { table_id: Id, remaining_secs: u32 },
}

/// Emitted by [`HoldTimer::tick`] on the tick that exhausts the countdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoldEvent {
    Expired { table_id: Id },
}

#[derive(Clone, Debug)]
pub struct HoldTimer {
    duration_secs: u32,
    phase: HoldPhase,
    generation: HoldGeneration,
}

impl Default for HoldTimer {
    fn default() -> Self {
        Self::new(DEFAULT_HOLD_SECS)
    }
}

impl HoldTimer {
    /// A timer whose holds last `duration_secs` (at least one second).
    #[must_use]
    pub fn new(duration_secs: u32) -> Self {
        Self { duration_secs: duration_secs.max(1), phase: HoldPhase::Idle, generation: 0 }
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    #[must_use]
    pub fn phase(&self) -> HoldPhase {
        self.phase
    }

    #[must_use]
    pub fn generation(&self) -> HoldGeneration {
        self.generation
    }

    #[must_use]
    pub fn is_holding(&self) -> bool {
        matches!(self.phase, HoldPhase::Holding { .. })
    }

    #[must_use]
    pub fn table_id(&self) -> Option<Id> {
        match self.phase {
            HoldPhase::Holding { table_id, .. } => Some(table_id),
            HoldPhase::Idle => None,
        }
    }

    #[must_use]
    pub fn remaining_secs(&self) -> Option<u32> {
        match self.phase {
            HoldPhase::Holding { remaining_secs, .. } => Some(remaining_secs),
            HoldPhase::Idle => None,
        }
    }

    /// Enter `Holding` for `table_id` with the full duration, replacing any
    /// hold in progress.
    pub fn start(&mut self, table_id: Id) -> HoldGeneration {
        self.generation += 1;
        self.phase = HoldPhase::Holding { table_id, remaining_secs: self.duration_secs };
        debug!(table_id, generation = self.generation, secs = self.duration_secs, "hold started");
        self.generation
    }

    /// Advance one second. Returns `Expired` once, on the tick that reaches
    /// zero; the timer is then `Idle` and further ticks do nothing.
    pub fn tick(&mut self) -> Option<HoldEvent> {
        let HoldPhase::Holding { table_id, remaining_secs } = self.phase else {
            return None;
        };
        let remaining_secs = remaining_secs.saturating_sub(1);
        if remaining_secs == 0 {
            self.phase = HoldPhase::Idle;
            debug!(table_id, generation = self.generation, "hold expired");
            return Some(HoldEvent::Expired { table_id });
        }
        self.phase = HoldPhase::Holding { table_id, remaining_secs };
        None
    }

    /// Like [`tick`](Self::tick), but ignores ticks scheduled for another hold.
    pub fn tick_for(&mut self, generation: HoldGeneration) -> Option<HoldEvent> {
        if generation != self.generation {
            return None;
        }
        self.tick()
    }

    /// Leave `Holding` without an expiry event. Returns whether a hold was
    /// active.
    pub fn release(&mut self) -> bool {
        let was_holding = self.is_holding();
        if was_holding {
            debug!(generation = self.generation, "hold released");
        }
        self.phase = HoldPhase::Idle;
        was_holding
    }
}

/// Format remaining seconds as `MM:SS` for the countdown banner.
#[must_use]
pub fn format_remaining(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Recurring countdown tick bound to one hold.
///
/// Sends `make(generation)` on `tx` every `period` until dropped.
#[derive(Debug)]
pub struct CountdownGuard {
    generation: HoldGeneration,
    handle: JoinHandle<()>,
}

impl CountdownGuard {
    pub fn spawn<T, F>(generation: HoldGeneration, period: Duration, tx: mpsc::UnboundedSender<T>, make: F) -> Self
    where
        T: Send + 'static,
        F: Fn(HoldGeneration) -> T + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(make(generation)).is_err() {
                    break;
                }
            }
        });
        debug!(generation, "countdown started");
        Self { generation, handle }
    }

    #[must_use]
    pub fn generation(&self) -> HoldGeneration {
        self.generation
    }
}

impl Drop for CountdownGuard {
    fn drop(&mut self) {
        self.handle.abort();
        debug!(generation = self.generation, "countdown cancelled");
    }
}
