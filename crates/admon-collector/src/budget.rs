//! Failure budget: decides when the collection loop gives up.
//!
//! Tracks consecutive failed cycles against a fixed budget, with a reset
//! window that periodically clears the counter no matter how the recent
//! cycles went.

use tracing::{debug, warn};

/// Outcome of one collection cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleVerdict {
    Succeeded,
    Failed,
}

/// Lifecycle of the collection loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    /// The failure budget was exhausted. Terminal.
    Terminated,
}

#[derive(Debug, Clone)]
pub struct FailureBudget {
    consecutive_failed_cycles: u32,
    cycles_since_reset: u32,
    budget: u32,
    reset_window: u32,
    state: LoopState,
}

impl FailureBudget {
    /// `budget` and `reset_window` must be positive; config validation
    /// guarantees this for loaded configs.
    pub fn new(budget: u32, reset_window: u32) -> Self {
        Self {
            consecutive_failed_cycles: 0,
            cycles_since_reset: 0,
            budget: budget.max(1),
            reset_window: reset_window.max(1),
            state: LoopState::Running,
        }
    }

    /// Fold one cycle's verdict into the budget and return the new state.
    ///
    /// Once `Terminated`, further verdicts are ignored.
    pub fn record(&mut self, verdict: CycleVerdict) -> LoopState {
        if self.state == LoopState::Terminated {
            return self.state;
        }

        if verdict == CycleVerdict::Failed {
            self.consecutive_failed_cycles = self.consecutive_failed_cycles.saturating_add(1);
        }

        self.cycles_since_reset += 1;
        if self.cycles_since_reset >= self.reset_window {
            if self.consecutive_failed_cycles > 0 {
                debug!(
                    forgiven = self.consecutive_failed_cycles,
                    window = self.reset_window,
                    "reset window reached, clearing failure count"
                );
            }
            self.consecutive_failed_cycles = 0;
            self.cycles_since_reset = 0;
        }

        if self.consecutive_failed_cycles >= self.budget {
            warn!(
                failures = self.consecutive_failed_cycles,
                budget = self.budget,
                "failure budget exhausted"
            );
            self.state = LoopState::Terminated;
        }

        self.state
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn consecutive_failed_cycles(&self) -> u32 {
        self.consecutive_failed_cycles
    }

    pub fn cycles_since_reset(&self) -> u32 {
        self.cycles_since_reset
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn reset_window(&self) -> u32 {
        self.reset_window
    }

    /// Failed cycles still tolerated before termination.
    pub fn remaining(&self) -> u32 {
        self.budget.saturating_sub(self.consecutive_failed_cycles)
    }
}
